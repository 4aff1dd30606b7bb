use thiserror::Error;

#[derive(Error, Debug)]
pub enum PenneyError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid deck: {reason}")]
    InvalidDeck { reason: String },

    #[error("Unreachable tie: '{p1}' and '{p2}' both matched at offset {offset} with equal length")]
    UnreachableTie { p1: String, p2: String, offset: usize },

    #[error("No aggregate row registered for pair ({p1}, {p2})")]
    StoreKeyMissing { p1: String, p2: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PenneyError {
    pub(crate) fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern { pattern: pattern.into(), reason: reason.into() }
    }

    pub(crate) fn invalid_deck(reason: impl Into<String>) -> Self {
        Self::InvalidDeck { reason: reason.into() }
    }
}

pub type PenneyResult<T> = Result<T, PenneyError>;
