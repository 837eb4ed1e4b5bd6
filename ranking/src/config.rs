//! Configuration for the ranking engine.

use serde::{Deserialize, Serialize};

/// Default number of matches a ranking run returns. `K` itself is a
/// per-call parameter of [`RankingEngine::rank`]; this is the default the
/// invocation surface applies when the caller does not override it.
///
/// [`RankingEngine::rank`]: crate::engine::RankingEngine::rank
pub const DEFAULT_TOP_K: usize = 3;

/// Configuration for the ranking engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Maximum number of candidate embeddings in flight at once.
    pub max_concurrency: usize,

    /// Per-candidate embedding timeout in seconds. A stalled provider call
    /// must not stall the whole run.
    pub task_timeout_secs: u64,

    /// Embedding provider configuration.
    pub embedding: EmbeddingConfig,
}

impl RankingConfig {
    /// Set the concurrency bound.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Set the per-candidate timeout.
    pub fn with_task_timeout_secs(mut self, secs: u64) -> Self {
        self.task_timeout_secs = secs;
        self
    }

    /// Set the embedding configuration.
    pub fn with_embedding(mut self, embedding: EmbeddingConfig) -> Self {
        self.embedding = embedding;
        self
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_concurrency: std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(4),
            task_timeout_secs: 60,
            embedding: EmbeddingConfig::default(),
        }
    }
}

/// Configuration for the embedding provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Which provider to use.
    pub provider: EmbeddingProviderType,

    /// Model to use for embeddings (provider default when unset).
    pub model: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderType::OpenAI,
            model: None,
        }
    }
}

/// Type of embedding provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderType {
    /// OpenAI embeddings API.
    OpenAI,
    /// Deterministic offline token hasher.
    Hash,
}
