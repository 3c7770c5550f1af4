//! HTTP client for the activity backend

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ApiError;
use crate::model::{
    Activity, ActivityRecord, Level, LoginRequest, LoginResponse, StatusResponse, UploadResponse,
    UploadedFile,
};
use crate::resource::PendingFile;

/// Create and update of activity records
#[allow(async_fn_in_trait)]
pub trait ActivityBackend {
    async fn create_activity(&self, record: &ActivityRecord) -> Result<Option<Activity>, ApiError>;

    async fn update_activity(
        &self,
        id: i64,
        record: &ActivityRecord,
    ) -> Result<Option<Activity>, ApiError>;
}

/// Resource file storage
#[allow(async_fn_in_trait)]
pub trait FileBackend {
    /// Upload one file. A `success: false` response is an `ApiError::UploadFailed`.
    async fn upload_activity_file(&self, file: &PendingFile) -> Result<UploadedFile, ApiError>;

    async fn delete_activity_file(&self, stored_name: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct TeacherApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl TeacherApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        TeacherApiClient {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Absolute URL for a resource path returned by the backend
    pub fn resolve_url(&self, path_or_url: &str) -> String {
        if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            path_or_url.to_string()
        } else if path_or_url.starts_with('/') {
            format!("{}{}", self.base_url, path_or_url)
        } else {
            format!("{}/{}", self.base_url, path_or_url)
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn list_levels(&self) -> Result<Vec<Level>, ApiError> {
        let body = self.send(self.request(Method::GET, "/api/levels")).await?;
        parse_json(&body)
    }

    pub async fn list_activities_for_level(&self, level_id: i64) -> Result<Vec<Activity>, ApiError> {
        let path = format!("/api/activities/level/{}", level_id);
        let body = self.send(self.request(Method::GET, &path)).await?;
        parse_json(&body)
    }

    /// Exchange credentials for a JWT
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let body = self
            .send(self.client.post(format!("{}/api/auth/login", self.base_url)).json(&request))
            .await?;
        let response: LoginResponse = parse_json(&body)?;
        Ok(response.token)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let request = builder
            .build()
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to build request: {}", e)))?;
        let method = request.method().clone();
        let url = request.url().to_string();
        tracing::debug!(%method, %url, "Sending request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            tracing::debug!(%method, %url, status = status.as_u16(), "Request succeeded");
            return Ok(text);
        }

        tracing::warn!(%method, %url, status = status.as_u16(), "Request failed");
        Err(error_for_status(status, &text))
    }
}

impl ActivityBackend for TeacherApiClient {
    async fn create_activity(&self, record: &ActivityRecord) -> Result<Option<Activity>, ApiError> {
        let body = self
            .send(self.request(Method::POST, "/api/activities").json(record))
            .await?;
        Ok(serde_json::from_str(&body).ok())
    }

    async fn update_activity(
        &self,
        id: i64,
        record: &ActivityRecord,
    ) -> Result<Option<Activity>, ApiError> {
        let path = format!("/api/activities/{}", id);
        let body = self.send(self.request(Method::PUT, &path).json(record)).await?;
        Ok(serde_json::from_str(&body).ok())
    }
}

impl FileBackend for TeacherApiClient {
    async fn upload_activity_file(&self, file: &PendingFile) -> Result<UploadedFile, ApiError> {
        let data = tokio::fs::read(&file.path).await.map_err(|e| {
            ApiError::UploadFailed(format!("No se pudo leer {}: {}", file.file_name, e))
        })?;

        let part = Part::bytes(data)
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)?;
        let form = Form::new().part("file", part);

        let request = self
            .request(Method::POST, "/api/files/upload/activity")
            .multipart(form)
            .build()?;

        tracing::debug!(file = %file.file_name, size = file.size, "Uploading resource file");
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        let text = response.text().await?;

        // Failures still carry a {success, message} body
        match serde_json::from_str::<UploadResponse>(&text) {
            Ok(upload) => upload.into_result().map_err(ApiError::UploadFailed),
            Err(_) if !status.is_success() => Err(error_for_status(status, &text)),
            Err(e) => Err(ApiError::InvalidResponse(format!(
                "Failed to parse upload response: {}",
                e
            ))),
        }
    }

    async fn delete_activity_file(&self, stored_name: &str) -> Result<(), ApiError> {
        let path = format!("/api/files/activities/{}", stored_name);
        let body = self.send(self.request(Method::DELETE, &path)).await?;
        match serde_json::from_str::<StatusResponse>(&body) {
            Ok(status) if status.success == Some(false) => Err(ApiError::RequestFailed {
                status: 200,
                message: status.message.unwrap_or_default(),
            }),
            _ => Ok(()),
        }
    }
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

/// Map a failed response to an error, preferring the server's own message
fn error_for_status(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                body.trim().to_string()
            }
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::AuthenticationFailed,
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        _ => ApiError::RequestFailed {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pdf_on_disk(dir: &TempDir) -> PendingFile {
        let file = dir.path().join("worksheet.pdf");
        std::fs::write(&file, b"%PDF-1.4").unwrap();
        PendingFile::from_path(&file).unwrap()
    }

    fn record() -> ActivityRecord {
        ActivityRecord {
            title: "Verbos".to_string(),
            description: "Presente".to_string(),
            content: String::new(),
            level_id: 2,
            category: "GRAMMAR".to_string(),
            resource_file_url: String::new(),
            resource_file_name: String::new(),
        }
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let client = TeacherApiClient::new("http://localhost:8080/", None);
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_resolve_url() {
        let client = TeacherApiClient::new("http://localhost:8080", Some("t".to_string()));
        assert_eq!(
            client.resolve_url("/api/files/activities/a.pdf"),
            "http://localhost:8080/api/files/activities/a.pdf"
        );
        assert_eq!(
            client.resolve_url("uploads/a.pdf"),
            "http://localhost:8080/uploads/a.pdf"
        );
        assert_eq!(client.resolve_url("https://cdn/x.mp4"), "https://cdn/x.mp4");
    }

    #[test]
    fn test_error_for_status_uses_server_message() {
        let err = error_for_status(
            StatusCode::BAD_REQUEST,
            r#"{"message":"Título debe tener entre 3 y 200 caracteres"}"#,
        );
        match err {
            ApiError::RequestFailed { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Título debe tener entre 3 y 200 caracteres");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_error_for_status_plain_body() {
        let err = error_for_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert_eq!(err.to_string(), "API request failed (500): boom");

        let err = error_for_status(StatusCode::BAD_GATEWAY, "");
        assert_eq!(err.to_string(), "API request failed (502): Bad Gateway");
    }

    #[test]
    fn test_error_for_status_auth_and_not_found() {
        assert!(matches!(
            error_for_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::AuthenticationFailed
        ));
        assert!(matches!(
            error_for_status(StatusCode::FORBIDDEN, "{}"),
            ApiError::AuthenticationFailed
        ));
        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, r#"{"error":"Actividad no encontrada"}"#),
            ApiError::NotFound(m) if m == "Actividad no encontrada"
        ));
    }

    #[test]
    fn test_parse_json_invalid() {
        let result: Result<Vec<Level>, _> = parse_json("not json");
        assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_upload_sends_file_part_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/files/upload/activity"))
            .and(header("authorization", "Bearer tok"))
            .and(body_string_contains(r#"name="file"; filename="worksheet.pdf""#))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "fileName": "0b1c.pdf",
                "originalName": "worksheet.pdf",
                "filePath": "activities/0b1c.pdf",
                "fileUrl": "/api/files/activities/0b1c.pdf"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let client = TeacherApiClient::new(server.uri(), Some("tok".to_string()));
        let uploaded = client.upload_activity_file(&pdf_on_disk(&dir)).await.unwrap();

        assert_eq!(uploaded.file_url, "/api/files/activities/0b1c.pdf");
        assert_eq!(uploaded.original_name, "worksheet.pdf");
        assert_eq!(uploaded.stored_name(), "0b1c.pdf");
    }

    #[tokio::test]
    async fn test_upload_success_false_on_ok_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/files/upload/activity"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "Archivo vacío"
            })))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let client = TeacherApiClient::new(server.uri(), None);
        let err = client.upload_activity_file(&pdf_on_disk(&dir)).await.unwrap_err();
        assert!(matches!(err, ApiError::UploadFailed(ref m) if m == "Archivo vacío"));
    }

    #[tokio::test]
    async fn test_upload_error_status_with_json_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/files/upload/activity"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "message": "Tipo de archivo no permitido"
            })))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let client = TeacherApiClient::new(server.uri(), None);
        let err = client.upload_activity_file(&pdf_on_disk(&dir)).await.unwrap_err();
        assert_eq!(err.to_string(), "Tipo de archivo no permitido");
    }

    #[tokio::test]
    async fn test_upload_server_error_without_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/files/upload/activity"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let client = TeacherApiClient::new(server.uri(), None);
        let err = client.upload_activity_file(&pdf_on_disk(&dir)).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::RequestFailed { status: 500, ref message } if message == "boom"
        ));
    }

    #[tokio::test]
    async fn test_update_puts_record_to_activity_path() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/activities/42"))
            .and(header("authorization", "Bearer tok"))
            .and(body_json(json!({
                "title": "Verbos",
                "description": "Presente",
                "content": "",
                "levelId": 2,
                "type": "GRAMMAR",
                "resourceFileUrl": "",
                "resourceFileName": ""
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 42,
                "title": "Verbos",
                "levelId": 2,
                "type": "GRAMMAR"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TeacherApiClient::new(server.uri(), Some("tok".to_string()));
        let saved = client.update_activity(42, &record()).await.unwrap();
        assert_eq!(saved.map(|a| a.id), Some(42));
    }

    #[tokio::test]
    async fn test_create_without_activity_body_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/activities"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = TeacherApiClient::new(server.uri(), Some("tok".to_string()));
        assert_eq!(client.create_activity(&record()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_validation_error_carries_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/activities"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "message": "Título debe tener entre 3 y 200 caracteres"
            })))
            .mount(&server)
            .await;

        let client = TeacherApiClient::new(server.uri(), Some("tok".to_string()));
        let err = client.create_activity(&record()).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::RequestFailed { status: 400, ref message }
                if message == "Título debe tener entre 3 y 200 caracteres"
        ));
    }

    #[tokio::test]
    async fn test_delete_file_reports_success_false() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/files/activities/gone.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "Archivo no encontrado"
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/files/activities/0b1c.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .mount(&server)
            .await;

        let client = TeacherApiClient::new(server.uri(), Some("tok".to_string()));
        let err = client.delete_activity_file("gone.pdf").await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::RequestFailed { status: 200, ref message } if message == "Archivo no encontrado"
        ));
        client.delete_activity_file("0b1c.pdf").await.unwrap();
    }
}
