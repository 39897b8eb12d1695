use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid theme preference: {0:?}")]
    InvalidPreference(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Convenience type alias for Results with ThemeError
pub type Result<T> = std::result::Result<T, ThemeError>;
