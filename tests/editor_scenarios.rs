// End-to-end editor flows against an in-memory backend
//
// These drive the public library API the same way the TUI and the CLI do:
// open, edit fields, pick a file, submit, and check what reached the backend.

use activity_desk::api::{ActivityBackend, FileBackend};
use activity_desk::editor::{ActivityEditor, EditorCallbacks, EditorMode, FormField};
use activity_desk::error::ApiError;
use activity_desk::model::{Activity, ActivityRecord, Level, UploadedFile};
use activity_desk::resource::PendingFile;
use std::cell::{Cell, RefCell};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Upload(String),
    Create(ActivityRecord),
    Update(i64, ActivityRecord),
    Delete(String),
}

#[derive(Default)]
struct InMemoryBackend {
    calls: RefCell<Vec<Call>>,
    fail_next_persist: Cell<bool>,
    next_id: Cell<i64>,
}

impl InMemoryBackend {
    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn saved(&self, record: &ActivityRecord, id: i64) -> Activity {
        Activity {
            id,
            title: record.title.clone(),
            description: record.description.clone(),
            content: Some(record.content.clone()),
            level_id: record.level_id,
            category: record.category.clone(),
            resource_file_url: Some(record.resource_file_url.clone()).filter(|u| !u.is_empty()),
            resource_file_name: Some(record.resource_file_name.clone()).filter(|n| !n.is_empty()),
            is_active: Some(true),
            created_at: None,
            updated_at: None,
        }
    }
}

impl ActivityBackend for InMemoryBackend {
    async fn create_activity(&self, record: &ActivityRecord) -> Result<Option<Activity>, ApiError> {
        self.calls.borrow_mut().push(Call::Create(record.clone()));
        if self.fail_next_persist.replace(false) {
            return Err(ApiError::RequestFailed {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        let id = self.next_id.get() + 100;
        self.next_id.set(self.next_id.get() + 1);
        Ok(Some(self.saved(record, id)))
    }

    async fn update_activity(
        &self,
        id: i64,
        record: &ActivityRecord,
    ) -> Result<Option<Activity>, ApiError> {
        self.calls.borrow_mut().push(Call::Update(id, record.clone()));
        if self.fail_next_persist.replace(false) {
            return Err(ApiError::NotFound(format!("/api/activities/{}", id)));
        }
        Ok(Some(self.saved(record, id)))
    }
}

impl FileBackend for InMemoryBackend {
    async fn upload_activity_file(&self, file: &PendingFile) -> Result<UploadedFile, ApiError> {
        self.calls.borrow_mut().push(Call::Upload(file.file_name.clone()));
        Ok(UploadedFile {
            file_url: format!("/api/files/activities/stored-{}", file.file_name),
            original_name: file.file_name.clone(),
            file_path: format!("activities/stored-{}", file.file_name),
        })
    }

    async fn delete_activity_file(&self, stored_name: &str) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(Call::Delete(stored_name.to_string()));
        Ok(())
    }
}

#[derive(Default)]
struct ParentEvents(Vec<&'static str>);

impl EditorCallbacks for ParentEvents {
    fn activity_saved(&mut self) {
        self.0.push("refresh");
    }

    fn close_requested(&mut self) {
        self.0.push("close");
    }
}

fn levels() -> Vec<Level> {
    vec![
        Level {
            id: 1,
            name: "A1".to_string(),
            description: None,
        },
        Level {
            id: 2,
            name: "A2".to_string(),
            description: None,
        },
    ]
}

fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PendingFile {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    PendingFile::from_path(&path).unwrap()
}

#[tokio::test]
async fn scenario_a_create_without_file() {
    let backend = InMemoryBackend::default();
    let mut events = ParentEvents::default();
    let mut editor = ActivityEditor::new(levels());

    editor.open(None);
    assert_eq!(editor.mode(), EditorMode::Create);
    editor.set_field(FormField::Title, "Greetings");
    editor.set_field(FormField::Description, "Intro");
    editor.set_level(1);
    editor.set_field(FormField::Category, "Conversación");

    let saved = editor.submit(&backend, &mut events).await.unwrap();

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    let Call::Create(record) = &calls[0] else {
        panic!("expected a create call, got {:?}", calls[0]);
    };
    assert_eq!(record.category, "SPEAKING");
    assert_eq!(record.title, "Greetings");
    assert_eq!(record.level_id, 1);
    assert_eq!(record.resource_file_url, "");

    assert_eq!(events.0, vec!["refresh", "close"]);
    assert!(!editor.is_open());
    assert_eq!(saved.map(|a| a.id), Some(100));
}

#[tokio::test]
async fn scenario_b_edit_keeps_existing_file() {
    let existing: Activity = serde_json::from_str(
        r#"{
            "id": 42,
            "title": "Listening 1",
            "description": "Old description",
            "levelId": 2,
            "type": "LISTENING",
            "resourceFileUrl": "/api/files/activities/abc.mp3",
            "resourceFileName": "dialogue.mp3"
        }"#,
    )
    .unwrap();

    let backend = InMemoryBackend::default();
    let mut events = ParentEvents::default();
    let mut editor = ActivityEditor::new(levels());

    editor.open(Some(&existing));
    editor.set_field(FormField::Description, "New description");
    editor.submit(&backend, &mut events).await.unwrap();

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    let Call::Update(id, record) = &calls[0] else {
        panic!("expected an update call, got {:?}", calls[0]);
    };
    assert_eq!(*id, 42);
    assert_eq!(record.description, "New description");
    assert_eq!(record.category, "LISTENING");
    assert_eq!(record.resource_file_url, "/api/files/activities/abc.mp3");
    assert_eq!(record.resource_file_name, "dialogue.mp3");
    assert_eq!(events.0, vec!["refresh", "close"]);
}

#[tokio::test]
async fn edit_removing_file_sends_empty_resource() {
    let existing: Activity = serde_json::from_str(
        r#"{
            "id": 8,
            "title": "Worksheet",
            "description": "Printable",
            "levelId": 1,
            "type": "GRAMMAR",
            "resourceFileUrl": "/api/files/activities/a.pdf",
            "resourceFileName": "a.pdf"
        }"#,
    )
    .unwrap();

    let backend = InMemoryBackend::default();
    let mut events = ParentEvents::default();
    let mut editor = ActivityEditor::new(levels());

    editor.open(Some(&existing));
    editor.remove_file();
    editor.submit(&backend, &mut events).await.unwrap();

    let calls = backend.calls();
    let Call::Update(8, record) = &calls[0] else {
        panic!("expected an update of activity 8, got {:?}", calls[0]);
    };
    let body = serde_json::to_value(record).unwrap();
    assert_eq!(body["resourceFileUrl"], serde_json::json!(""));
    assert_eq!(body["resourceFileName"], serde_json::json!(""));
    assert!(editor.take_orphaned_uploads().is_empty());
}

#[tokio::test]
async fn scenario_c_disallowed_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let backend = InMemoryBackend::default();
    let mut events = ParentEvents::default();
    let mut editor = ActivityEditor::new(levels());

    editor.open(None);
    let text = write_file(&dir, "notes.txt", b"plain text");
    assert!(editor.select_file(text).is_err());
    assert_eq!(
        editor.error(),
        Some("Tipo de archivo no permitido. Solo se permiten: jpg, jpeg, png, webp, pdf, mp3, mp4")
    );
    assert!(editor.pending_file().is_none());

    // Still submittable with no file
    editor.set_field(FormField::Title, "Reading");
    editor.set_field(FormField::Description, "Short text");
    editor.set_level(2);
    editor.set_field(FormField::Category, "Comprensión de lectura");
    editor.submit(&backend, &mut events).await.unwrap();

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(&calls[0], Call::Create(r) if r.resource_file_url.is_empty()));
}

#[tokio::test]
async fn upload_precedes_create_and_is_referenced() {
    let dir = TempDir::new().unwrap();
    let backend = InMemoryBackend::default();
    let mut events = ParentEvents::default();
    let mut editor = ActivityEditor::new(levels());

    editor.open(None);
    editor.set_field(FormField::Title, "Worksheet");
    editor.set_field(FormField::Description, "Printable");
    editor.set_level(1);
    editor.set_field(FormField::Category, "Gramática");
    editor
        .select_file(write_file(&dir, "worksheet.pdf", b"%PDF-1.4"))
        .unwrap();

    editor.submit(&backend, &mut events).await.unwrap();

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], Call::Upload("worksheet.pdf".to_string()));
    let Call::Create(record) = &calls[1] else {
        panic!("expected a create call, got {:?}", calls[1]);
    };
    assert_eq!(
        record.resource_file_url,
        "/api/files/activities/stored-worksheet.pdf"
    );
    assert_eq!(record.resource_file_name, "worksheet.pdf");
    assert!(editor.take_orphaned_uploads().is_empty());
}

#[tokio::test]
async fn failed_save_then_cancel_reports_unused_upload() {
    let dir = TempDir::new().unwrap();
    let backend = InMemoryBackend::default();
    let mut events = ParentEvents::default();
    let mut editor = ActivityEditor::new(levels());

    editor.open(None);
    editor.set_field(FormField::Title, "Song");
    editor.set_field(FormField::Description, "Listen and repeat");
    editor.set_level(1);
    editor.set_field(FormField::Category, "Comprensión auditiva");
    editor
        .select_file(write_file(&dir, "song.mp3", b"ID3"))
        .unwrap();

    backend.fail_next_persist.set(true);
    let err = editor.submit(&backend, &mut events).await.unwrap_err();
    assert!(err.to_string().starts_with("Error al guardar la actividad"));
    assert!(editor.is_open());
    assert!(events.0.is_empty());

    editor.close(&mut events);
    assert_eq!(events.0, vec!["close"]);

    let orphans = editor.take_orphaned_uploads();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].stored_name(), "stored-song.mp3");
    for upload in &orphans {
        backend.delete_activity_file(upload.stored_name()).await.unwrap();
    }
    assert_eq!(
        backend.calls().last(),
        Some(&Call::Delete("stored-song.mp3".to_string()))
    );
}
