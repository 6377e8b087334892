//! Error Types

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// Settings backend failed to read or write
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Convert to a message suitable for the admin pages
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Storage(_) | CoreError::Io(_) => {
                "Settings could not be saved. Please try again.".into()
            }
            CoreError::Json(_) => "Stored settings are unreadable.".into(),
        }
    }
}
