//! Interactive terminal UI for browsing and editing activities
//!
//! Browse a level's activities as a card grid and create or edit them in an
//! editor dialog drawn over the page.

pub mod activity_details;
pub mod activity_page;
pub mod app;
pub mod events;
pub mod form_ui;
pub mod messages;
pub mod ui;
pub mod utils;

pub use app::App;
pub use events::EventHandler;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::api::TeacherApiClient;

/// Run the interactive UI application
pub async fn run_interactive(client: TeacherApiClient) -> Result<()> {
    // Load levels before taking over the terminal so errors print normally
    let mut app = App::new(client).await?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("Interactive session ended with error: {:?}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Main application loop
///
/// Network work queued by a key press runs after the next draw, so the
/// loading state is on screen while the request is in flight.
async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    let event_handler = EventHandler::new();

    loop {
        app.set_viewport_width(terminal.size()?.width);
        terminal.draw(|f| ui::draw(f, app))?;

        if app.has_pending_work() {
            app.run_pending_work().await;
            continue;
        }

        if let Some(event) = event_handler.next()? {
            if !app.handle_event(event) {
                break;
            }
        }
    }

    Ok(())
}
