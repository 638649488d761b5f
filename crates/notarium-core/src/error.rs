//! Error types for notarium.

use thiserror::Error;

/// Result type alias using notarium's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for notarium operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Persistence operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Note not found
    #[error("Note not found: {0}")]
    NoteNotFound(uuid::Uuid),

    /// Folder not found
    #[error("Folder not found: {0}")]
    FolderNotFound(uuid::Uuid),

    /// Inference/generation failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_display_note_not_found() {
        let id = Uuid::nil();
        let err = Error::NoteNotFound(id);
        assert_eq!(err.to_string(), format!("Note not found: {}", id));
    }

    #[test]
    fn test_error_display_folder_not_found() {
        let id = Uuid::nil();
        let err = Error::FolderNotFound(id);
        assert_eq!(err.to_string(), format!("Folder not found: {}", id));
    }

    #[test]
    fn test_error_display_inference() {
        let err = Error::Inference("model timeout".to_string());
        assert_eq!(err.to_string(), "Inference error: model timeout");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("empty name".to_string());
        assert_eq!(err.to_string(), "Invalid input: empty name");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing API key".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing API key");
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
