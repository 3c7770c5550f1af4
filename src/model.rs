//! Wire types shared by the HTTP client, the list view and the editor

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A proficiency level. Supplied by the backend, never edited here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// An activity as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(deserialize_with = "deserialize_id")]
    pub level_id: i64,
    /// Backend category code, e.g. `SPEAKING`
    #[serde(rename = "type", default)]
    pub category: String,
    #[serde(default)]
    pub resource_file_url: Option<String>,
    #[serde(default)]
    pub resource_file_name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Activity {
    /// The attached resource, if the activity has one
    pub fn resource(&self) -> Option<ResourceRef> {
        let url = self.resource_file_url.as_deref().filter(|u| !u.is_empty())?;
        Some(ResourceRef {
            url: url.to_string(),
            file_name: self.resource_file_name.clone().unwrap_or_default(),
        })
    }
}

/// Body of a create or update call
///
/// No resource is sent as empty strings, never null, so an update detaches
/// a previously attached file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub title: String,
    pub description: String,
    pub content: String,
    pub level_id: i64,
    #[serde(rename = "type")]
    pub category: String,
    pub resource_file_url: String,
    pub resource_file_name: String,
}

/// A resource file reference carried by an activity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub url: String,
    pub file_name: String,
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_url: String,
    pub original_name: String,
    /// Storage path on the backend, e.g. `activities/<uuid>.pdf`
    pub file_path: String,
}

impl UploadedFile {
    pub fn as_resource(&self) -> ResourceRef {
        ResourceRef {
            url: self.file_url.clone(),
            file_name: self.original_name.clone(),
        }
    }

    /// Stored file name, the last segment of the storage path
    pub fn stored_name(&self) -> &str {
        let source = if self.file_path.is_empty() {
            &self.file_url
        } else {
            &self.file_path
        };
        source.rsplit('/').next().unwrap_or(source)
    }
}

/// Raw upload response. `message` is populated on failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

impl UploadResponse {
    /// Convert into an [`UploadedFile`], or the failure message
    pub fn into_result(self) -> Result<UploadedFile, String> {
        if !self.success {
            return Err(self
                .message
                .unwrap_or_else(|| "Error al subir archivo".to_string()));
        }
        let file_url = self
            .file_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| "La respuesta de subida no contiene la URL del archivo".to_string())?;
        Ok(UploadedFile {
            file_url,
            original_name: self.original_name.or(self.file_name).unwrap_or_default(),
            file_path: self.file_path.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Generic `{success, message}` body used by the file endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

// Accept both string and integer IDs
fn deserialize_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    match value {
        Value::Number(num) => num
            .as_i64()
            .ok_or_else(|| serde::de::Error::custom("Invalid integer ID")),
        Value::String(s) => s
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom("Invalid string ID")),
        _ => Err(serde::de::Error::custom("ID must be a string or integer")),
    }
}
