//! # Embeddings
//!
//! This crate provides text embedding generation and similarity scoring
//! for the profile ranking pipeline.
//!
//! ## Features
//!
//! - **Embedding Generation**: Convert profile text to dense vectors
//! - **Similarity Scoring**: Bounded cosine similarity between vectors
//! - **Multiple Providers**: OpenAI API or a deterministic offline hasher
//!
//! Providers are purely functional from the caller's perspective: the same
//! text always maps to the same vector within a run, and calls share no
//! mutable state, so they can be issued concurrently.

pub mod error;
pub mod provider;
pub mod similarity;

pub use error::{EmbeddingError, Result};
pub use provider::{
    EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, HashProvider, OpenAIProvider,
};
pub use similarity::cosine_similarity;

/// A dense vector embedding.
pub type Embedding = Vec<f32>;
