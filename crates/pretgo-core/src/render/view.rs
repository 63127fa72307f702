use serde::Serialize;

use crate::models::{Candidate, Selection};

/// One row of the result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryView {
    pub id: String,
    pub label: String,
    pub detail: String,
}

impl From<&Candidate> for EntryView {
    fn from(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id.to_string(),
            label: candidate.display_name(),
            detail: candidate.detail_text(),
        }
    }
}

/// What the result list currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListView {
    Hidden,
    Candidates {
        entries: Vec<EntryView>,
        highlighted: Option<usize>,
    },
    /// Empty response: offers a shortcut to create the missing record.
    NoResults { query: String, create_href: String },
}

impl ListView {
    pub fn is_visible(&self) -> bool {
        !matches!(self, ListView::Hidden)
    }

    pub fn entries(&self) -> &[EntryView] {
        match self {
            ListView::Candidates { entries, .. } => entries,
            _ => &[],
        }
    }
}

/// Read-only confirmation shown in place of the input once a person is chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionPanel {
    pub candidate_id: String,
    pub label: String,
    pub detail: String,
}

impl From<&Selection> for SelectionPanel {
    fn from(selection: &Selection) -> Self {
        Self {
            candidate_id: selection.candidate_id.to_string(),
            label: selection.label.clone(),
            detail: selection.detail.clone(),
        }
    }
}
