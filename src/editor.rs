//! Activity editor: form state, file selection and the two-phase submit
//!
//! The editor is opened either for a new activity or for an existing one and
//! keeps that mode until it is opened again. Submitting first resolves the
//! resource file (uploading a pending selection), then persists the record.

use crate::api::{ActivityBackend, FileBackend};
use crate::category;
use crate::error::{ApiError, AppError, FileError, ValidationError};
use crate::model::{Activity, ActivityRecord, Level, ResourceRef, UploadedFile};
use crate::resource::{validate_selection, PendingFile};

/// Form field types, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Level,
    Category,
    Resource,
    Content,
}

impl FormField {
    pub fn all() -> Vec<FormField> {
        vec![
            FormField::Title,
            FormField::Description,
            FormField::Level,
            FormField::Category,
            FormField::Resource,
            FormField::Content,
        ]
    }

    pub fn next(&self) -> FormField {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Level,
            FormField::Level => FormField::Category,
            FormField::Category => FormField::Resource,
            FormField::Resource => FormField::Content,
            FormField::Content => FormField::Title,
        }
    }

    pub fn previous(&self) -> FormField {
        match self {
            FormField::Title => FormField::Content,
            FormField::Description => FormField::Title,
            FormField::Level => FormField::Description,
            FormField::Category => FormField::Level,
            FormField::Resource => FormField::Category,
            FormField::Content => FormField::Resource,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Título *",
            FormField::Description => "Descripción *",
            FormField::Level => "Nivel *",
            FormField::Category => "Tipo *",
            FormField::Resource => "Recurso",
            FormField::Content => "Contenido",
        }
    }

    /// Free-text fields accept typed characters
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FormField::Title | FormField::Description | FormField::Content
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit { id: i64 },
}

/// Parent hooks fired by the editor
pub trait EditorCallbacks {
    /// An activity was created or updated; the caller should re-fetch its list
    fn activity_saved(&mut self);

    /// The dialog wants to be dismissed
    fn close_requested(&mut self);
}

/// Field values of the form. Each setter replaces one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorForm {
    pub title: String,
    pub description: String,
    pub content: String,
    /// Selected level id as entered; parsed on submit
    pub level_id: String,
    /// Category display label
    pub category: String,
    /// Currently attached resource
    pub resource: Option<ResourceRef>,
}

impl EditorForm {
    fn from_activity(activity: &Activity) -> Self {
        EditorForm {
            title: activity.title.clone(),
            description: activity.description.clone(),
            content: activity.content.clone().unwrap_or_default(),
            level_id: activity.level_id.to_string(),
            category: category::label_for_code(&activity.category).to_string(),
            resource: activity.resource(),
        }
    }

    pub fn text(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Description => &self.description,
            FormField::Content => &self.content,
            FormField::Level => &self.level_id,
            FormField::Category => &self.category,
            FormField::Resource => self
                .resource
                .as_ref()
                .map(|r| r.file_name.as_str())
                .unwrap_or(""),
        }
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Content => Some(&mut self.content),
            _ => None,
        }
    }

    /// Required fields, checked in order. Returns the parsed level id.
    pub fn validate(&self) -> Result<i64, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::TitleRequired);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::DescriptionRequired);
        }
        let level_id = self
            .level_id
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::LevelRequired)?;
        if self.category.trim().is_empty() {
            return Err(ValidationError::CategoryRequired);
        }
        Ok(level_id)
    }

    /// Outgoing record for a validated level id
    pub fn to_record(&self, level_id: i64) -> ActivityRecord {
        ActivityRecord {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            content: self.content.trim().to_string(),
            level_id,
            category: category::code_for_label(&self.category).to_string(),
            resource_file_url: self
                .resource
                .as_ref()
                .map(|r| r.url.clone())
                .unwrap_or_default(),
            resource_file_name: self
                .resource
                .as_ref()
                .map(|r| r.file_name.clone())
                .unwrap_or_default(),
        }
    }
}

pub struct ActivityEditor {
    levels: Vec<Level>,
    form: EditorForm,
    mode: EditorMode,
    open: bool,
    submitting: bool,
    error: Option<String>,
    pending_file: Option<PendingFile>,
    /// Uploaded during this session, not yet saved on any activity
    unsaved_upload: Option<UploadedFile>,
    orphaned_uploads: Vec<UploadedFile>,
    current_field: FormField,
    cursor_position: usize,
}

impl ActivityEditor {
    pub fn new(levels: Vec<Level>) -> Self {
        Self {
            levels,
            form: EditorForm::default(),
            mode: EditorMode::Create,
            open: false,
            submitting: false,
            error: None,
            pending_file: None,
            unsaved_upload: None,
            orphaned_uploads: Vec::new(),
            current_field: FormField::Title,
            cursor_position: 0,
        }
    }

    pub fn set_levels(&mut self, levels: Vec<Level>) {
        self.levels = levels;
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Open the dialog. `Some` edits that activity, `None` starts a new one.
    pub fn open(&mut self, existing: Option<&Activity>) {
        if let Some(upload) = self.unsaved_upload.take() {
            self.orphaned_uploads.push(upload);
        }
        match existing {
            Some(activity) => {
                self.mode = EditorMode::Edit { id: activity.id };
                self.form = EditorForm::from_activity(activity);
                tracing::debug!(activity_id = activity.id, "Editor opened for editing");
            }
            None => {
                self.mode = EditorMode::Create;
                self.form = EditorForm::default();
                tracing::debug!("Editor opened for a new activity");
            }
        }
        self.pending_file = None;
        self.error = None;
        self.submitting = false;
        self.open = true;
        self.current_field = FormField::Title;
        self.cursor_position = self.form.title.chars().count();
    }

    /// Cancel the dialog without saving
    pub fn close<C: EditorCallbacks>(&mut self, callbacks: &mut C) {
        if let Some(upload) = self.unsaved_upload.take() {
            self.orphaned_uploads.push(upload);
        }
        self.form = EditorForm::default();
        self.pending_file = None;
        self.error = None;
        self.submitting = false;
        self.open = false;
        self.current_field = FormField::Title;
        self.cursor_position = 0;
        callbacks.close_requested();
    }

    /// Uploads that no saved activity references. The caller should delete them.
    pub fn take_orphaned_uploads(&mut self) -> Vec<UploadedFile> {
        std::mem::take(&mut self.orphaned_uploads)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn form(&self) -> &EditorForm {
        &self.form
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pending_file(&self) -> Option<&PendingFile> {
        self.pending_file.as_ref()
    }

    pub fn attached(&self) -> Option<&ResourceRef> {
        self.form.resource.as_ref()
    }

    pub fn current_field(&self) -> FormField {
        self.current_field
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    /// Name of the selected level, if the id matches a known level
    pub fn selected_level_name(&self) -> Option<&str> {
        let id = self.form.level_id.trim().parse::<i64>().ok()?;
        self.levels
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.name.as_str())
    }

    // -- field updates ---------------------------------------------------

    pub fn set_field(&mut self, field: FormField, value: &str) {
        if self.submitting {
            return;
        }
        match field {
            FormField::Level => self.form.level_id = value.trim().to_string(),
            FormField::Category => self.form.category = value.to_string(),
            FormField::Resource => {}
            _ => {
                if let Some(text) = self.form.text_mut(field) {
                    *text = value.to_string();
                }
            }
        }
        if field == self.current_field {
            self.cursor_position = self.form.text(field).chars().count();
        }
    }

    pub fn set_level(&mut self, level_id: i64) {
        self.set_field(FormField::Level, &level_id.to_string());
    }

    pub fn next_field(&mut self) {
        self.current_field = self.current_field.next();
        self.cursor_position = self.form.text(self.current_field).chars().count();
    }

    pub fn previous_field(&mut self) {
        self.current_field = self.current_field.previous();
        self.cursor_position = self.form.text(self.current_field).chars().count();
    }

    /// Cycle the level or category choice on the current field
    pub fn cycle_choice(&mut self, forward: bool) {
        if self.submitting {
            return;
        }
        match self.current_field {
            FormField::Level => {
                if self.levels.is_empty() {
                    return;
                }
                let current = self
                    .levels
                    .iter()
                    .position(|l| l.id.to_string() == self.form.level_id);
                let len = self.levels.len();
                let index = match (current, forward) {
                    (None, true) => 0,
                    (None, false) => len - 1,
                    (Some(i), true) => (i + 1) % len,
                    (Some(i), false) => (i + len - 1) % len,
                };
                self.form.level_id = self.levels[index].id.to_string();
            }
            FormField::Category => {
                let label = if forward {
                    category::next_label(&self.form.category)
                } else {
                    category::previous_label(&self.form.category)
                };
                self.form.category = label.to_string();
            }
            _ => {}
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if self.submitting {
            return;
        }
        let pos = self.cursor_position;
        if let Some(text) = self.form.text_mut(self.current_field) {
            let pos = pos.min(text.chars().count());
            text.insert(byte_index(text, pos), c);
            self.cursor_position = pos + 1;
        }
    }

    /// Backspace
    pub fn delete_char_before(&mut self) {
        if self.submitting || self.cursor_position == 0 {
            return;
        }
        let pos = self.cursor_position;
        if let Some(text) = self.form.text_mut(self.current_field) {
            let pos = pos.min(text.chars().count());
            if pos > 0 {
                text.remove(byte_index(text, pos - 1));
                self.cursor_position = pos - 1;
            }
        }
    }

    /// Delete key
    pub fn delete_char_at(&mut self) {
        if self.submitting {
            return;
        }
        let pos = self.cursor_position;
        if let Some(text) = self.form.text_mut(self.current_field) {
            if pos < text.chars().count() {
                text.remove(byte_index(text, pos));
            }
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let len = self.form.text(self.current_field).chars().count();
        if self.cursor_position < len {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.form.text(self.current_field).chars().count();
    }

    // -- resource file ---------------------------------------------------

    /// Validate and remember a file for upload on submit
    ///
    /// A rejected file clears the pending selection but keeps the attached one.
    /// Nothing changes while a submission is running.
    pub fn select_file(&mut self, file: PendingFile) -> Result<(), FileError> {
        if self.submitting {
            return Err(FileError::SubmissionInProgress);
        }
        match validate_selection(&file.mime_type, file.size) {
            Ok(()) => {
                tracing::debug!(file = %file.file_name, mime = %file.mime_type, size = file.size, "File selected");
                self.pending_file = Some(file);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::info!(file = %file.file_name, mime = %file.mime_type, size = file.size, "File rejected: {}", e);
                self.pending_file = None;
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Record a selection that could not even be read from disk
    pub fn reject_file(&mut self, error: &FileError) {
        if self.submitting {
            return;
        }
        self.pending_file = None;
        self.error = Some(error.to_string());
    }

    /// Detach both the pending and the attached file
    pub fn remove_file(&mut self) {
        if self.submitting {
            return;
        }
        self.pending_file = None;
        self.form.resource = None;
        if let Some(upload) = self.unsaved_upload.take() {
            self.orphaned_uploads.push(upload);
        }
    }

    // -- submission ------------------------------------------------------

    /// Phase 1: upload the pending file, if any, and return the reference the
    /// record should carry.
    ///
    /// On failure the attached reference is left as it was.
    pub async fn resolve_resource<F: FileBackend>(
        &mut self,
        files: &F,
    ) -> Result<Option<ResourceRef>, ApiError> {
        let Some(pending) = self.pending_file.clone() else {
            return Ok(self.form.resource.clone());
        };

        let uploaded = files.upload_activity_file(&pending).await.map_err(|e| {
            let detail = match e {
                ApiError::UploadFailed(message) => message,
                other => other.to_string(),
            };
            ApiError::UploadFailed(format!("Error al subir archivo: {}", detail))
        })?;

        tracing::info!(file = %uploaded.original_name, url = %uploaded.file_url, "Resource file uploaded");
        self.pending_file = None;
        self.form.resource = Some(uploaded.as_resource());
        if let Some(previous) = self.unsaved_upload.replace(uploaded) {
            self.orphaned_uploads.push(previous);
        }
        Ok(self.form.resource.clone())
    }

    /// Record built from the current form. The level id must already be validated.
    pub fn compose_record(&self, level_id: i64) -> ActivityRecord {
        self.form.to_record(level_id)
    }

    /// Phase 2: create or update depending on the mode
    pub async fn persist<B: ActivityBackend>(
        &self,
        backend: &B,
        record: &ActivityRecord,
    ) -> Result<Option<Activity>, ApiError> {
        match self.mode {
            EditorMode::Edit { id } => backend.update_activity(id, record).await,
            EditorMode::Create => backend.create_activity(record).await,
        }
    }

    /// Validate, upload, persist, then notify the parent and close
    ///
    /// On any failure the message is kept in [`error`](Self::error) and the
    /// dialog stays open with its data intact.
    pub async fn submit<B, C>(
        &mut self,
        backend: &B,
        callbacks: &mut C,
    ) -> Result<Option<Activity>, AppError>
    where
        B: ActivityBackend + FileBackend,
        C: EditorCallbacks,
    {
        if !self.open {
            return Err(AppError::Other("El editor no está abierto".to_string()));
        }
        if self.submitting {
            return Err(AppError::Other("Ya se está guardando".to_string()));
        }

        self.submitting = true;
        self.error = None;

        let result = self.run_submission(backend).await;
        self.submitting = false;

        match result {
            Ok(saved) => {
                // The saved activity now references the upload
                self.unsaved_upload = None;
                tracing::info!(mode = ?self.mode, "Activity saved");
                callbacks.activity_saved();
                self.open = false;
                callbacks.close_requested();
                Ok(saved)
            }
            Err(e) => {
                tracing::warn!(mode = ?self.mode, "Submission failed: {}", e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn run_submission<B>(&mut self, backend: &B) -> Result<Option<Activity>, AppError>
    where
        B: ActivityBackend + FileBackend,
    {
        let level_id = self.form.validate()?;
        self.resolve_resource(backend).await?;
        let record = self.compose_record(level_id);
        self.persist(backend, &record).await.map_err(|e| {
            AppError::Other(format!("Error al guardar la actividad: {}", e))
        })
    }
}

/// Byte offset of the `char_pos`-th character
fn byte_index(s: &str, char_pos: usize) -> usize {
    s.char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
