// ================================================================
// File: maskbot-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not found error: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Platform error: {0}")]
    Platform(String),

    /// Acquiring a delivery webhook failed (listing, creating, or resolving
    /// the bot's own identity). The cache stays untouched when this happens.
    #[error("Delivery channel error: {0}")]
    DeliveryChannel(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("No system is registered for this account")]
    NoSystem,

    #[error("A system is already registered for this account")]
    SystemExists,

    #[error("{subject} too long: {length} > {limit} characters")]
    StringOverbound {
        subject: String,
        length: usize,
        limit: usize,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Parse(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Parse(s.to_string())
    }
}
