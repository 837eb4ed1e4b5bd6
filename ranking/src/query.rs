//! Task queries.

use serde::{Deserialize, Serialize};

/// The description of the task candidates are ranked against.
///
/// Built once per ranking run from normalized text; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Normalized required skills.
    pub required_skills: String,

    /// Normalized required expertise.
    pub required_expertise: String,

    /// Normalized task description.
    pub description: String,
}

impl TaskQuery {
    /// Create a new task query.
    pub fn new(
        required_skills: impl Into<String>,
        required_expertise: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            required_skills: required_skills.into(),
            required_expertise: required_expertise.into(),
            description: description.into(),
        }
    }

    /// Text fed to the embedder: description, required expertise, then
    /// required skills, space-separated.
    pub fn embedding_text(&self) -> String {
        format!(
            "{} {} {}",
            self.description, self.required_expertise, self.required_skills
        )
    }
}
