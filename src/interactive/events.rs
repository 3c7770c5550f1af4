//! Event handling for the interactive UI

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::time::Duration;

/// Terminal events the app reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    /// The terminal was resized; the next draw picks up the new size
    Resize,
}

/// Polls crossterm for input
pub struct EventHandler {
    timeout: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_millis(100),
        }
    }

    /// Get the next event, if one arrived within the poll timeout
    pub fn next(&self) -> Result<Option<AppEvent>> {
        if event::poll(self.timeout)? {
            match event::read()? {
                // Windows reports releases too
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    return Ok(Some(AppEvent::Key(key)))
                }
                Event::Resize(_, _) => return Ok(Some(AppEvent::Resize)),
                _ => {}
            }
        }
        Ok(None)
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
