//! Error types for the candidate store.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reading candidate profiles.
///
/// A store failure is fatal to a ranking run: without the candidate
/// snapshot there is nothing to rank.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database access failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
