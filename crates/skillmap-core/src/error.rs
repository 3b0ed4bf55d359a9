//! Error types for the projection pipeline

use thiserror::Error;

/// Errors surfaced by the skillmap core.
#[derive(Debug, Error)]
pub enum Error {
    /// Fewer than two feature vectors were handed to the projection engine.
    /// Callers should show an empty state instead of rendering.
    #[error("insufficient data: projection needs at least 2 users, got {found}")]
    InsufficientData { found: usize },

    /// A feature vector does not share the length of the first row.
    /// This is an internal invariant violation, never a user error.
    #[error("dimension mismatch at row {row}: expected {expected} columns, found {found}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this is the empty state (too few users to project), as
    /// opposed to a real failure.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Error::InsufficientData { .. })
    }
}

/// Result type alias using the skillmap Error.
pub type Result<T> = std::result::Result<T, Error>;
