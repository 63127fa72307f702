use serde::{Deserialize, Serialize};

use super::candidate::{Candidate, CandidateId};

/// The person committed into the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub candidate_id: CandidateId,
    pub label: String,
    pub detail: String,
}

impl From<&Candidate> for Selection {
    fn from(candidate: &Candidate) -> Self {
        Self {
            candidate_id: candidate.id.clone(),
            label: candidate.display_name(),
            detail: candidate.detail_text(),
        }
    }
}
