//! Error types for the status page service

/// Errors that can occur in the status page service
#[derive(Debug, thiserror::Error)]
pub enum StatusPageError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Status page API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for status page operations
pub type Result<T> = std::result::Result<T, StatusPageError>;
