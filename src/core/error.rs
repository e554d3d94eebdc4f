//! Error types shared by the engine, editor and platformer.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Project JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bundle encoding error: {0}")]
    Bundle(#[from] bincode::Error),

    #[error("Corrupt bundle: {0}")]
    CorruptBundle(String),

    #[error("Unknown frame: {0}")]
    UnknownFrame(String),

    #[error("Unknown {kind} type: {name}")]
    UnknownType { kind: &'static str, name: String },

    #[error("Invalid parameter `{param}` for {clause}: {reason}")]
    InvalidParam {
        clause: String,
        param: String,
        reason: String,
    },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Sheet parse error: {0}")]
    SheetParse(String),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Audio error: {0}")]
    Audio(#[from] hound::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub fn invalid_param(clause: &str, param: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidParam {
            clause: clause.to_string(),
            param: param.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        let err: EngineError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, EngineError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_invalid_param_message() {
        let err = EngineError::invalid_param("GoToFrame", "frame_name", "missing");
        assert_eq!(
            err.to_string(),
            "Invalid parameter `frame_name` for GoToFrame: missing"
        );
    }
}
