//! # Ranking Engine
//!
//! Ranks a pool of candidate profiles against a task query by semantic
//! similarity and selects the top-K matches.
//!
//! ## Pipeline
//!
//! ```text
//! Candidate Store ──► Ranking Engine
//!                        │  embed query once
//!                        │  fan out: embed each candidate concurrently
//!                        │  score each against the query embedding
//!                        ▼
//!                    stable top-K ──► MatchReport (JSON)
//! ```
//!
//! The query embedding is computed once before fan-out and shared read-only
//! by all worker tasks. Candidates are independent, so embedding runs in
//! parallel under a bounded semaphore; a failed or timed-out candidate is
//! dropped from the run with a warning rather than aborting it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use recomatch_ranking::{RankingConfig, RankingEngine, TaskQuery};
//!
//! let engine = RankingEngine::new(provider, RankingConfig::default());
//! let ranked = engine.rank(&query, &candidates, 3).await?;
//! let report = recomatch_ranking::format_matches(&ranked);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod query;
pub mod report;

pub use config::{DEFAULT_TOP_K, EmbeddingConfig, EmbeddingProviderType, RankingConfig};
pub use engine::{RankingEngine, ScoredCandidate};
pub use error::{RankingError, Result};
pub use query::TaskQuery;
pub use report::{MatchReport, format_matches, to_json};

// Re-export from dependencies for convenience
pub use recomatch_embeddings::EmbeddingProvider;
pub use recomatch_store::CandidateRecord;
