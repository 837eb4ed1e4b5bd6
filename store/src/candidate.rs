//! Candidate profile records.

use serde::{Deserialize, Serialize};

/// One profile in the ranking pool.
///
/// Records are an immutable snapshot taken at the start of a run; the
/// normalized fields are what the embedder sees, the raw `curriculum` is
/// what ends up in the formatted output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Display name ("first last").
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Current job title.
    pub job: String,

    /// Normalized skills text.
    pub skills: String,

    /// Normalized expertise text.
    pub expertise: String,

    /// Raw long-form curriculum text.
    pub curriculum: String,

    /// Normalized curriculum text used for embedding.
    pub curriculum_normalized: String,
}

impl CandidateRecord {
    /// Text fed to the embedder: skills, expertise, then normalized
    /// curriculum, space-separated.
    pub fn embedding_text(&self) -> String {
        format!(
            "{} {} {}",
            self.skills, self.expertise, self.curriculum_normalized
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_embedding_text_field_order() {
        let candidate = CandidateRecord {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            job: "Engineer".to_string(),
            skills: "rust sql".to_string(),
            expertise: "backend".to_string(),
            curriculum: "Raw CV".to_string(),
            curriculum_normalized: "raw cv".to_string(),
        };

        assert_eq!(candidate.embedding_text(), "rust sql backend raw cv");
    }
}
