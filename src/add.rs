//! `add` and `edit` commands
//!
//! Both drive the same [`ActivityEditor`] as the interactive UI, so
//! validation and the upload-then-save order are identical.

use anyhow::{anyhow, Result};
use std::io;

use crate::api::{FileBackend, TeacherApiClient};
use crate::category;
use crate::cli::ActivityFields;
use crate::editor::{ActivityEditor, EditorCallbacks, EditorMode, FormField};
use crate::error::AppError;
use crate::model::{Activity, Level};
use crate::resource::{format_size, PendingFile};

/// Prints progress for the parent of a CLI-driven editor
#[derive(Debug, Default)]
struct CliEvents {
    saved: bool,
}

impl EditorCallbacks for CliEvents {
    fn activity_saved(&mut self) {
        self.saved = true;
    }

    fn close_requested(&mut self) {
        tracing::debug!("Editor closed");
    }
}

pub async fn handle_add_command(
    client: &TeacherApiClient,
    fields: ActivityFields,
    yes: bool,
) -> Result<()> {
    let levels = client.list_levels().await?;
    let mut editor = ActivityEditor::new(levels);
    editor.open(None);
    apply_fields(&mut editor, &fields)?;

    submit_from_cli(client, &mut editor, yes).await
}

pub async fn handle_edit_command(
    client: &TeacherApiClient,
    id: i64,
    fields: ActivityFields,
    remove_file: bool,
    yes: bool,
) -> Result<()> {
    let levels = client.list_levels().await?;
    let existing = locate_activity(client, &levels, id).await?;

    let mut editor = ActivityEditor::new(levels);
    editor.open(Some(&existing));
    if remove_file {
        editor.remove_file();
    }
    apply_fields(&mut editor, &fields)?;

    submit_from_cli(client, &mut editor, yes).await
}

/// Search every level's list for an activity id
async fn locate_activity(
    client: &TeacherApiClient,
    levels: &[Level],
    id: i64,
) -> Result<Activity> {
    for level in levels {
        let activities = client.list_activities_for_level(level.id).await?;
        if let Some(activity) = find_activity(&activities, id) {
            tracing::debug!(id, level = level.id, "Found activity");
            return Ok(activity.clone());
        }
    }
    Err(anyhow!("Activity {} not found in any level", id))
}

fn find_activity(activities: &[Activity], id: i64) -> Option<&Activity> {
    activities.iter().find(|a| a.id == id)
}

/// Copy command-line values into the open editor
pub fn apply_fields(editor: &mut ActivityEditor, fields: &ActivityFields) -> Result<()> {
    if let Some(title) = &fields.title {
        editor.set_field(FormField::Title, title);
    }
    if let Some(description) = &fields.description {
        editor.set_field(FormField::Description, description);
    }
    if let Some(content) = &fields.content {
        editor.set_field(FormField::Content, content);
    }
    if let Some(level_id) = fields.level {
        editor.set_level(level_id);
    }
    if let Some(input) = &fields.category {
        let label = category::resolve_label(input).ok_or_else(|| {
            anyhow!(
                "Unknown category '{}'. Choose one of: {}",
                input,
                category::SELECTABLE_LABELS.join(", ")
            )
        })?;
        editor.set_field(FormField::Category, label);
    }
    if let Some(path) = &fields.file {
        let file = PendingFile::from_path(path)?;
        editor.select_file(file)?;
    }
    Ok(())
}

async fn submit_from_cli(
    client: &TeacherApiClient,
    editor: &mut ActivityEditor,
    yes: bool,
) -> Result<()> {
    // Fail before asking for confirmation
    editor.form().validate().map_err(AppError::from)?;

    print_preview(editor);

    if !yes {
        println!("\nDo you want to proceed? (y/N)");
        let mut confirmation = String::new();
        io::stdin().read_line(&mut confirmation)?;
        if confirmation.trim().to_lowercase() != "y" {
            println!("Operation cancelled.");
            return Ok(());
        }
    }

    if editor.pending_file().is_some() {
        println!("Uploading file...");
    }

    let mut events = CliEvents::default();
    let result = editor.submit(client, &mut events).await;

    if result.is_err() {
        editor.close(&mut events);
    }
    delete_orphaned_uploads(client, editor).await;

    match result {
        Ok(saved) => {
            let id = saved.map(|a| a.id).or(match editor.mode() {
                EditorMode::Edit { id } => Some(id),
                EditorMode::Create => None,
            });
            match id {
                Some(id) => println!("✅ Activity saved (id {})", id),
                None => println!("✅ Activity saved"),
            }
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn delete_orphaned_uploads(client: &TeacherApiClient, editor: &mut ActivityEditor) {
    for upload in editor.take_orphaned_uploads() {
        if let Err(e) = client.delete_activity_file(upload.stored_name()).await {
            tracing::warn!(file = %upload.stored_name(), "Could not delete unused upload: {}", e);
        }
    }
}

fn print_preview(editor: &ActivityEditor) {
    let form = editor.form();
    match editor.mode() {
        EditorMode::Create => println!("\n=== New Activity ==="),
        EditorMode::Edit { id } => println!("\n=== Edit Activity {} ===", id),
    }
    println!("Title:       {}", form.title);
    println!("Description: {}", form.description);
    println!(
        "Level:       {}",
        editor.selected_level_name().unwrap_or(form.level_id.as_str())
    );
    println!(
        "Category:    {} ({})",
        form.category,
        category::code_for_label(&form.category)
    );
    if !form.content.trim().is_empty() {
        println!("Content:     {}", form.content);
    }
    match (editor.pending_file(), editor.attached()) {
        (Some(file), _) => println!(
            "Resource:    {} ({}, {}) - will be uploaded",
            file.file_name,
            file.mime_type,
            format_size(file.size)
        ),
        (None, Some(resource)) => println!("Resource:    📎 {}", resource.file_name),
        (None, None) => println!("Resource:    none"),
    }
}
