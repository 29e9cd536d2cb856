use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum IdxError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Invalid version '{0}': {1}")]
    InvalidVersion(String, String),

    #[error("Invalid version range '{0}': {1}")]
    InvalidRange(String, String),

    #[error("Invalid coordinates '{0}': {1}")]
    InvalidCoordinates(String, String),

    #[error("Dependency {0} is not bound to a version: {1}")]
    Unbound(String, String),

    #[error("Repository Error: {0}")]
    Repository(String),

    #[error("Resource Error for {0}: {1}")]
    Resource(String, String),

    #[error("IoError: {0}")]
    IoError(String),

    #[error("Generic Error: {0}")]
    Generic(String),
}

impl From<std::io::Error> for IdxError {
    fn from(err: std::io::Error) -> Self {
        IdxError::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for IdxError {
    fn from(err: serde_json::Error) -> Self {
        IdxError::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, IdxError>;
