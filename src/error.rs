//! Custom error types for activity-desk
//!
//! Library modules return these typed errors; the binary edge converts them
//! into `anyhow` errors. User-facing validation messages are in Spanish to
//! match the rest of the interface.

use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// API-related errors
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Form validation errors
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Resource file selection errors
    #[error("{0}")]
    File(#[from] FileError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API URL not configured. Run `activity-desk config --api-url <URL>`")]
    ApiUrlNotFound,

    #[error("Invalid API URL '{0}': must start with http:// or https://")]
    InvalidApiUrl(String),

    #[error("Not logged in. Run `activity-desk login` first")]
    TokenNotFound,

    #[error("Could not determine config directory")]
    NoConfigDirectory,

    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration file: {0}")]
    SaveFailed(String),
}

/// Errors talking to the backend
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to connect to the API: {0}")]
    ConnectionFailed(String),

    #[error("API request failed ({status}): {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Authentication failed. Please log in again")]
    AuthenticationFailed,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    UploadFailed(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Required-field checks run before any network call, in this order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("El título es requerido")]
    TitleRequired,

    #[error("La descripción es requerida")]
    DescriptionRequired,

    #[error("Debe seleccionar un nivel")]
    LevelRequired,

    #[error("Debe seleccionar un tipo de actividad")]
    CategoryRequired,
}

/// Rejections of a local file selection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("Tipo de archivo no permitido. Solo se permiten: jpg, jpeg, png, webp, pdf, mp3, mp4")]
    TypeNotAllowed(String),

    #[error("El archivo es muy grande. Máximo 10MB permitido.")]
    TooLarge(u64),

    #[error("No se pudo leer el archivo {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("No se puede cambiar el archivo mientras se guarda")]
    SubmissionInProgress,
}
