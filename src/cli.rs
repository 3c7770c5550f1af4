//! Command-line surface

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "activity-desk")]
#[command(about = "Manage language-course activities from the terminal", long_about = None)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse and edit activities in the interactive UI (default)
    Ui,
    /// List proficiency levels
    Levels,
    /// Print the activity page for a level
    List {
        /// Level id
        #[arg(short = 'l', long)]
        level: i64,
    },
    /// Create a new activity
    Add {
        #[command(flatten)]
        fields: ActivityFields,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Edit an existing activity
    Edit {
        /// Activity id
        #[arg(short = 'i', long)]
        id: i64,

        #[command(flatten)]
        fields: ActivityFields,

        /// Detach the current resource file
        #[arg(long, conflicts_with = "file")]
        remove_file: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Log in and store the access token
    Login {
        /// Account email
        #[arg(short = 'e', long)]
        email: String,
    },
    /// Show or change the saved configuration
    Config {
        /// Base URL of the teacher API
        #[arg(long)]
        api_url: Option<String>,

        /// Access token to store
        #[arg(long)]
        token: Option<String>,
    },
}

/// Activity fields shared by `add` and `edit`
///
/// For `edit`, every given field overrides the stored value, so `--level`
/// moves the activity to another level.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ActivityFields {
    /// Title
    #[arg(short = 't', long)]
    pub title: Option<String>,

    /// Short description shown on the card
    #[arg(short = 'd', long)]
    pub description: Option<String>,

    /// Level id
    #[arg(short = 'l', long)]
    pub level: Option<i64>,

    /// Category, as a label (Gramática) or a code (GRAMMAR)
    #[arg(short = 'c', long)]
    pub category: Option<String>,

    /// Free-text content
    #[arg(long)]
    pub content: Option<String>,

    /// Resource file to upload (jpg, jpeg, png, webp, pdf, mp3, mp4)
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,
}

impl Cli {
    /// Interactive mode owns the terminal and logs to a file
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Ui))
    }
}

/// Show the first four characters of a secret and mask the rest
pub fn mask_token(token: &str) -> String {
    let count = token.chars().count();
    if count <= 4 {
        "*".repeat(count)
    } else {
        let visible: String = token.chars().take(4).collect();
        format!("{}{}", visible, "*".repeat(count - 4))
    }
}
