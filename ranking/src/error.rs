//! Error types for the ranking engine.

use thiserror::Error;

use recomatch_embeddings::EmbeddingError;
use recomatch_store::StoreError;

/// Result type alias for ranking operations.
pub type Result<T> = std::result::Result<T, RankingError>;

/// Errors that can occur while ranking candidates.
///
/// Per-candidate embedding failures are recovered inside the engine and
/// never surface here; only failures that invalidate the whole run do.
#[derive(Error, Debug)]
pub enum RankingError {
    /// The query embedding failed. Every candidate score depends on it, so
    /// this aborts the run.
    #[error("query embedding failed: {0}")]
    QueryEmbedding(#[source] EmbeddingError),

    /// Embedding error outside the per-candidate fan-out.
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Candidate retrieval failed.
    #[error("data source error: {0}")]
    Store(#[from] StoreError),

    /// A ranking task panicked or was cancelled.
    #[error("ranking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Result serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
