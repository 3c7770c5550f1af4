//! Local resource file selection and validation

use std::path::{Path, PathBuf};

use crate::error::FileError;

/// Largest accepted file, inclusive
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "application/pdf",
    "audio/mpeg",
    "video/mp4",
];

/// A file chosen by the user but not uploaded yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
}

impl PendingFile {
    /// Describe a file on disk. The MIME type is guessed from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref();
        let unreadable = |reason: String| FileError::Unreadable {
            path: path.display().to_string(),
            reason,
        };

        let metadata = std::fs::metadata(path).map_err(|e| unreadable(e.to_string()))?;
        if !metadata.is_file() {
            return Err(unreadable("no es un archivo".to_string()));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| unreadable("nombre de archivo inválido".to_string()))?;

        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();

        Ok(PendingFile {
            path: path.to_path_buf(),
            file_name,
            mime_type,
            size: metadata.len(),
        })
    }
}

pub fn is_allowed_mime_type(mime_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime_type)
}

/// Type is checked before size, so a large file of a bad type reports the type.
pub fn validate_selection(mime_type: &str, size: u64) -> Result<(), FileError> {
    if !is_allowed_mime_type(mime_type) {
        return Err(FileError::TypeNotAllowed(mime_type.to_string()));
    }
    if size > MAX_FILE_SIZE {
        return Err(FileError::TooLarge(size));
    }
    Ok(())
}

/// Human readable size, e.g. `2.5 MB`
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_allowed_types_at_limit_are_accepted() {
        for mime in ALLOWED_MIME_TYPES {
            assert!(validate_selection(mime, 0).is_ok());
            assert!(validate_selection(mime, MAX_FILE_SIZE).is_ok(), "{}", mime);
        }
    }

    #[test]
    fn test_allowed_types_over_limit_are_rejected() {
        for mime in ALLOWED_MIME_TYPES {
            assert_eq!(
                validate_selection(mime, MAX_FILE_SIZE + 1),
                Err(FileError::TooLarge(MAX_FILE_SIZE + 1))
            );
        }
    }

    #[test]
    fn test_other_types_are_rejected() {
        for mime in [
            "text/plain",
            "application/msword",
            "audio/mp3",
            "image/gif",
            "application/octet-stream",
            "",
        ] {
            assert!(matches!(
                validate_selection(mime, 10),
                Err(FileError::TypeNotAllowed(_))
            ));
        }
    }

    #[test]
    fn test_type_checked_before_size() {
        assert!(matches!(
            validate_selection("text/plain", MAX_FILE_SIZE * 2),
            Err(FileError::TypeNotAllowed(_))
        ));
    }

    #[test]
    fn test_pending_file_from_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("worksheet.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"%PDF-1.4 test").unwrap();

        let pending = PendingFile::from_path(&path).unwrap();
        assert_eq!(pending.file_name, "worksheet.pdf");
        assert_eq!(pending.mime_type, "application/pdf");
        assert_eq!(pending.size, 13);
    }

    #[test]
    fn test_pending_file_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.zzz");
        std::fs::write(&path, b"x").unwrap();

        let pending = PendingFile::from_path(&path).unwrap();
        assert_eq!(pending.mime_type, "application/octet-stream");
    }

    #[test]
    fn test_pending_file_missing() {
        let dir = TempDir::new().unwrap();
        let result = PendingFile::from_path(dir.path().join("missing.mp3"));
        assert!(matches!(result, Err(FileError::Unreadable { .. })));

        let result = PendingFile::from_path(dir.path());
        assert!(matches!(result, Err(FileError::Unreadable { .. })));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(MAX_FILE_SIZE), "10.0 MB");
    }
}
