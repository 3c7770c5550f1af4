//! Application state and logic for the interactive UI

use std::collections::VecDeque;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tui_input::backend::crossterm::EventHandler as _;
use tui_input::Input;

use crate::api::{FileBackend, TeacherApiClient};
use crate::editor::{ActivityEditor, EditorCallbacks, EditorMode, FormField};
use crate::list_view::{grid_columns, ActivityPage};
use crate::model::{Activity, Level, UploadedFile};
use crate::resource::PendingFile;

use super::events::AppEvent;
use super::messages::{Message, MessageType};

const MAX_MESSAGES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Browsing the activity page of a level
    Browse,
    /// Editor dialog is open
    Editor,
    /// Typing a file path for the editor
    FilePrompt,
    Help,
}

/// Network work queued by key handlers, run by the main loop after a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingWork {
    LoadActivities,
    SubmitEditor,
    DeleteOrphanedUploads,
}

/// Records what the editor asked of its parent
#[derive(Debug, Default)]
struct DialogEvents {
    saved: bool,
    closed: bool,
}

impl EditorCallbacks for DialogEvents {
    fn activity_saved(&mut self) {
        self.saved = true;
    }

    fn close_requested(&mut self) {
        self.closed = true;
    }
}

pub struct App {
    pub client: TeacherApiClient,
    pub levels: Vec<Level>,
    pub selected_level: usize,
    /// Activities of the selected level, in backend order
    pub activities: Vec<Activity>,
    pub selected_card: Option<usize>,
    pub editor: ActivityEditor,
    pub mode: AppMode,
    pub messages: Vec<Message>,
    pub loading: bool,
    pub loading_message: String,
    pub file_input: Input,
    pub viewport_width: u16,
    pending: VecDeque<PendingWork>,
    orphans_to_delete: Vec<UploadedFile>,
}

impl App {
    /// Fetch levels and the first level's activities
    pub async fn new(client: TeacherApiClient) -> Result<Self> {
        let levels = client.list_levels().await?;
        tracing::info!(levels = levels.len(), "Loaded levels");

        let mut app = Self::with_levels(client, levels);
        if app.levels.is_empty() {
            app.push_message(Message::warning("No hay niveles configurados en el servidor"));
        } else {
            app.load_activities().await;
        }
        Ok(app)
    }

    pub fn with_levels(client: TeacherApiClient, levels: Vec<Level>) -> Self {
        if !client.is_authenticated() {
            tracing::warn!("No token configured; saving activities will fail");
        }
        App {
            client,
            editor: ActivityEditor::new(levels.clone()),
            levels,
            selected_level: 0,
            activities: Vec::new(),
            selected_card: None,
            mode: AppMode::Browse,
            messages: Vec::new(),
            loading: false,
            loading_message: String::new(),
            file_input: Input::default(),
            viewport_width: 120,
            pending: VecDeque::new(),
            orphans_to_delete: Vec::new(),
        }
    }

    pub fn current_level(&self) -> Option<&Level> {
        self.levels.get(self.selected_level)
    }

    pub fn page(&self) -> Option<ActivityPage> {
        self.current_level()
            .map(|level| ActivityPage::build(level, &self.activities))
    }

    pub fn selected_activity(&self) -> Option<&Activity> {
        self.selected_card.and_then(|i| self.activities.get(i))
    }

    pub fn set_viewport_width(&mut self, width: u16) {
        self.viewport_width = width;
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.retain(|m| !m.is_expired());
        self.messages.push(message);
        if self.messages.len() > MAX_MESSAGES {
            let excess = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(..excess);
        }
    }

    /// True from the moment a save is requested until it finishes
    pub fn is_saving(&self) -> bool {
        self.editor.is_submitting() || self.pending.contains(&PendingWork::SubmitEditor)
    }

    pub fn has_pending_work(&self) -> bool {
        !self.pending.is_empty()
    }

    fn queue(&mut self, work: PendingWork, loading_message: &str) {
        if !self.pending.contains(&work) {
            self.pending.push_back(work);
        }
        self.loading = true;
        self.loading_message = loading_message.to_string();
    }

    /// Run one queued job
    pub async fn run_pending_work(&mut self) {
        if let Some(work) = self.pending.pop_front() {
            match work {
                PendingWork::LoadActivities => self.load_activities().await,
                PendingWork::SubmitEditor => self.submit_editor().await,
                PendingWork::DeleteOrphanedUploads => self.delete_orphaned_uploads().await,
            }
        }
        if self.pending.is_empty() {
            self.loading = false;
        }
    }

    /// Fetch the activities of the selected level
    pub async fn load_activities(&mut self) {
        let Some(level) = self.current_level().cloned() else {
            return;
        };

        match self.client.list_activities_for_level(level.id).await {
            Ok(activities) => {
                tracing::debug!(level_id = level.id, count = activities.len(), "Loaded activities");
                self.activities = activities;
                self.clamp_selection();
            }
            Err(e) => {
                tracing::error!(level_id = level.id, "Failed to load activities: {}", e);
                self.activities.clear();
                self.selected_card = None;
                self.push_message(Message::error(format!(
                    "No se pudieron cargar las actividades de {}: {}",
                    level.name, e
                )));
            }
        }
    }

    async fn submit_editor(&mut self) {
        let creating = self.editor.mode() == EditorMode::Create;
        let mut events = DialogEvents::default();

        match self.editor.submit(&self.client, &mut events).await {
            Ok(_) => {
                self.push_message(Message::success(if creating {
                    "Actividad creada"
                } else {
                    "Actividad actualizada"
                }));
            }
            Err(e) => {
                // The dialog shows the error itself; keep a trace in the bar
                self.push_message(Message::error(e.to_string()));
            }
        }

        if events.saved {
            self.queue(PendingWork::LoadActivities, "Actualizando actividades...");
        }
        if events.closed {
            self.mode = AppMode::Browse;
        }
        self.queue_orphan_cleanup();
    }

    fn queue_orphan_cleanup(&mut self) {
        self.orphans_to_delete
            .extend(self.editor.take_orphaned_uploads());
        if !self.orphans_to_delete.is_empty() {
            self.queue(PendingWork::DeleteOrphanedUploads, "Limpiando archivos...");
        }
    }

    async fn delete_orphaned_uploads(&mut self) {
        for upload in std::mem::take(&mut self.orphans_to_delete) {
            match self.client.delete_activity_file(upload.stored_name()).await {
                Ok(()) => tracing::info!(file = %upload.stored_name(), "Deleted unused upload"),
                Err(e) => tracing::warn!(file = %upload.stored_name(), "Could not delete unused upload: {}", e),
            }
        }
    }

    fn clamp_selection(&mut self) {
        self.selected_card = match (self.activities.len(), self.selected_card) {
            (0, _) => None,
            (len, Some(i)) => Some(i.min(len - 1)),
            (_, None) => Some(0),
        };
    }

    // -- event handling --------------------------------------------------

    /// Handle one event. Returns `false` when the app should exit.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        let AppEvent::Key(key) = event else {
            return true;
        };
        match self.mode {
            AppMode::Browse => return self.handle_browse_mode(key),
            AppMode::Help => self.handle_help_mode(key),
            AppMode::Editor => self.handle_editor_mode(key),
            AppMode::FilePrompt => self.handle_file_prompt(key),
        }
        true
    }

    fn handle_browse_mode(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return false,
            KeyCode::Char('?') => self.mode = AppMode::Help,
            KeyCode::Tab => self.select_level(true),
            KeyCode::BackTab => self.select_level(false),
            KeyCode::Left => self.move_card(-1),
            KeyCode::Right => self.move_card(1),
            KeyCode::Up => self.move_card(-(grid_columns(self.viewport_width) as isize)),
            KeyCode::Down => self.move_card(grid_columns(self.viewport_width) as isize),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.queue(PendingWork::LoadActivities, "Cargando actividades...");
            }
            KeyCode::Char('a') | KeyCode::Char('A') => self.open_editor(None),
            KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Enter => {
                if let Some(activity) = self.selected_activity().cloned() {
                    self.open_editor(Some(activity));
                }
            }
            KeyCode::Char('c') | KeyCode::Char('C') => self.copy_selected_resource(),
            _ => {}
        }
        true
    }

    fn handle_help_mode(&mut self, key: KeyEvent) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')
        ) {
            self.mode = AppMode::Browse;
        }
    }

    fn handle_editor_mode(&mut self, key: KeyEvent) {
        if self.is_saving() {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let field = self.editor.current_field();

        match key.code {
            KeyCode::Esc => self.cancel_editor(),
            KeyCode::Char('s') if ctrl => {
                self.queue(PendingWork::SubmitEditor, "Guardando...");
            }
            KeyCode::Char('f') if ctrl => self.open_file_prompt(),
            KeyCode::Char('r') if ctrl => self.editor.remove_file(),
            KeyCode::Tab | KeyCode::Down => self.editor.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.editor.previous_field(),
            KeyCode::Left if field.is_text() => self.editor.move_cursor_left(),
            KeyCode::Right if field.is_text() => self.editor.move_cursor_right(),
            KeyCode::Left => self.editor.cycle_choice(false),
            KeyCode::Right => self.editor.cycle_choice(true),
            KeyCode::Home => self.editor.move_cursor_to_start(),
            KeyCode::End => self.editor.move_cursor_to_end(),
            KeyCode::Enter if field == FormField::Resource => self.open_file_prompt(),
            KeyCode::Enter => self.editor.next_field(),
            KeyCode::Backspace => self.editor.delete_char_before(),
            KeyCode::Delete if field == FormField::Resource => self.editor.remove_file(),
            KeyCode::Delete => self.editor.delete_char_at(),
            KeyCode::Char(c) if !ctrl => self.editor.insert_char(c),
            _ => {}
        }
    }

    fn handle_file_prompt(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.mode = AppMode::Editor,
            KeyCode::Enter => {
                let path = self.file_input.value().trim().to_string();
                self.mode = AppMode::Editor;
                if path.is_empty() {
                    return;
                }
                self.select_file_path(&path);
            }
            _ => {
                self.file_input.handle_event(&Event::Key(key));
            }
        }
    }

    pub fn select_file_path(&mut self, path: &str) {
        let path = expand_home(path);
        match PendingFile::from_path(&path) {
            Ok(file) => {
                // A rejection is shown inside the dialog
                let _ = self.editor.select_file(file);
            }
            Err(e) => self.editor.reject_file(&e),
        }
    }

    fn open_file_prompt(&mut self) {
        self.file_input.reset();
        self.mode = AppMode::FilePrompt;
    }

    pub fn open_editor(&mut self, existing: Option<Activity>) {
        self.editor.set_levels(self.levels.clone());
        self.editor.open(existing.as_ref());
        self.mode = AppMode::Editor;
    }

    fn cancel_editor(&mut self) {
        let mut events = DialogEvents::default();
        self.editor.close(&mut events);
        if events.closed {
            self.mode = AppMode::Browse;
            self.push_message(Message::new(MessageType::Info, "Edición cancelada"));
        }
        self.queue_orphan_cleanup();
    }

    fn select_level(&mut self, forward: bool) {
        if self.levels.is_empty() {
            return;
        }
        let len = self.levels.len();
        self.selected_level = if forward {
            (self.selected_level + 1) % len
        } else {
            (self.selected_level + len - 1) % len
        };
        self.activities.clear();
        self.selected_card = None;
        self.queue(PendingWork::LoadActivities, "Cargando actividades...");
    }

    fn move_card(&mut self, delta: isize) {
        let len = self.activities.len();
        if len == 0 {
            self.selected_card = None;
            return;
        }
        let current = self.selected_card.unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.selected_card = Some(next as usize);
    }

    fn copy_selected_resource(&mut self) {
        let Some(resource) = self.selected_activity().and_then(|a| a.resource()) else {
            self.push_message(Message::warning("La actividad seleccionada no tiene recurso"));
            return;
        };
        let url = self.client.resolve_url(&resource.url);
        let copied = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(url.clone()));
        match copied {
            Ok(()) => self.push_message(Message::success(format!("URL copiada: {}", url))),
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {}", e);
                self.push_message(Message::error(format!("No se pudo copiar la URL: {}", e)));
            }
        }
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> std::path::PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(dirs) = directories::BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    std::path::PathBuf::from(path)
}
