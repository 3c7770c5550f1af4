use activity_desk::api::TeacherApiClient;
use activity_desk::cli::{mask_token, Cli, Commands};
use activity_desk::config::Config;
use activity_desk::error::ConfigError;
use activity_desk::{add, interactive, logging, query};
use anyhow::{anyhow, Result};
use clap::Parser;
use std::io;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.is_interactive() {
        if let Err(e) = logging::init_with_file("activity-desk.log", cli.verbose) {
            eprintln!("Warning: file logging unavailable: {}", e);
        }
    } else {
        logging::init(cli.verbose);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        // Works without a reachable backend
        Some(Commands::Config { api_url, token }) => handle_config_command(api_url, token),
        command => run_with_client(command, cli.verbose).await,
    }
}

async fn run_with_client(command: Option<Commands>, verbose: bool) -> Result<()> {
    let config = load_or_create_config(verbose).await?;
    if verbose {
        println!("API URL: {}", config.api_url);
        match &config.token {
            Some(token) => println!("Token: {}", mask_token(token)),
            None => println!("Token: not set"),
        }
    }

    let client = TeacherApiClient::new(config.api_url.clone(), config.token.clone());

    match command {
        None | Some(Commands::Ui) => interactive::run_interactive(client).await?,
        Some(Commands::Levels) => query::handle_levels_command(&client, verbose).await?,
        Some(Commands::List { level }) => {
            query::handle_list_command(&client, level, verbose).await?
        }
        Some(Commands::Add { fields, yes }) => {
            config.require_token()?;
            add::handle_add_command(&client, fields, yes).await?
        }
        Some(Commands::Edit {
            id,
            fields,
            remove_file,
            yes,
        }) => {
            config.require_token()?;
            add::handle_edit_command(&client, id, fields, remove_file, yes).await?
        }
        Some(Commands::Login { email }) => handle_login_command(&client, config, &email).await?,
        Some(Commands::Config { api_url, token }) => handle_config_command(api_url, token)?,
    }

    Ok(())
}

/// Load the saved configuration, or ask for the API URL on first run
async fn load_or_create_config(verbose: bool) -> Result<Config> {
    match Config::load_with_env() {
        Ok(config) => Ok(config),
        Err(ConfigError::ApiUrlNotFound) => {
            println!("No API URL found. Let's set one up!");
            let api_url = Config::prompt_for_api_url()?;
            if api_url.is_empty() {
                return Err(anyhow!("API URL cannot be empty"));
            }
            let config = Config::new(&api_url)?;

            // Test the URL before saving
            println!("Testing connection to {}...", config.api_url);
            let client = TeacherApiClient::new(config.api_url.clone(), None);
            match client.list_levels().await {
                Ok(levels) => {
                    if verbose {
                        println!("Found {} levels", levels.len());
                    }
                    config.save()?;
                    println!("API URL validated and saved successfully!");
                    Ok(config)
                }
                Err(e) => Err(anyhow!(
                    "Failed to reach the API: {}. Please check the URL and try again.",
                    e
                )),
            }
        }
        Err(e) => Err(e.into()),
    }
}

async fn handle_login_command(
    client: &TeacherApiClient,
    config: Config,
    email: &str,
) -> Result<()> {
    println!("Password for {}:", email);
    let mut password = String::new();
    io::stdin().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']);

    let token = client.login(email, password).await?;
    tracing::info!(%email, "Logged in");

    // Keep environment overrides out of the saved file
    let mut stored = Config::load().unwrap_or(config);
    stored.token = Some(token);
    stored.save()?;
    println!("✅ Logged in. Token saved.");
    Ok(())
}

fn handle_config_command(api_url: Option<String>, token: Option<String>) -> Result<()> {
    let path = Config::get_config_path().ok_or(ConfigError::NoConfigDirectory)?;

    if api_url.is_none() && token.is_none() {
        let config = Config::load_from(&path)?;
        println!("Config file: {}", path.display());
        println!("API URL:     {}", config.api_url);
        println!(
            "Token:       {}",
            config.token.as_deref().map(mask_token).unwrap_or_else(|| "not set".to_string())
        );
        return Ok(());
    }

    let mut config = match (Config::load_from(&path), api_url.as_deref()) {
        (Ok(config), _) => config,
        (Err(ConfigError::ApiUrlNotFound), Some(url)) => Config::new(url)?,
        (Err(e), _) => return Err(e.into()),
    };
    config.apply_overrides(api_url.as_deref(), token)?;
    config.save_to(&path)?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}
