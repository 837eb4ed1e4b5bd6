//! # Candidate Store
//!
//! Read-only access to the pool of candidate profiles being ranked.
//!
//! The store is an external collaborator of the ranking pipeline: it yields
//! an immutable snapshot of candidate records at the start of a run and is
//! never touched again while ranking is in flight. The concrete backend is
//! the application's SQLite database (`user` joined with `role`).

pub mod candidate;
pub mod error;
pub mod source;

pub use candidate::CandidateRecord;
pub use error::{Result, StoreError};
pub use source::{CandidateSource, SqliteCandidateSource};
