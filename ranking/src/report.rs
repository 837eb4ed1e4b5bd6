//! Result formatting.
//!
//! Maps the top-K selection to the output records the surrounding
//! application consumes. Pure and deterministic; no ranking logic here.

use serde::{Deserialize, Serialize};

use crate::engine::ScoredCandidate;
use crate::error::Result;

/// One entry of the formatted ranking output.
///
/// Consumers parse by key, not by position or whitespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Display name.
    pub user: String,

    /// Contact email.
    pub email: String,

    /// Raw long-form curriculum text.
    pub curriculum: String,

    /// Similarity rescaled to a 0-100 percentage.
    pub similarity: f32,
}

/// Map ranked candidates to output records, rescaling scores to percent.
pub fn format_matches(ranked: &[ScoredCandidate]) -> Vec<MatchReport> {
    ranked
        .iter()
        .map(|scored| MatchReport {
            user: scored.candidate.name.clone(),
            email: scored.candidate.email.clone(),
            curriculum: scored.candidate.curriculum.clone(),
            similarity: scored.score * 100.0,
        })
        .collect()
}

/// Serialize the report as a pretty-printed JSON array.
pub fn to_json(reports: &[MatchReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}
