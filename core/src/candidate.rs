//! Candidate types produced by providers.
//!
//! This module provides:
//! - `CandidateAction`: how the host commits a candidate
//! - `Candidate`: display label, commit text and action
//! - `CandidateList`: the ordered result of one query

use serde::{Deserialize, Serialize};

/// How a candidate is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateAction {
    /// Offered in the list; committed once the user selects it.
    Commit,
    /// Committed without an explicit selection (a computed result with a
    /// single sensible answer).
    NoneSelectionCommit,
}

/// A single suggested completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub label: String,
    pub commit_text: String,
    pub action: CandidateAction,
}

impl Candidate {
    pub fn new<L: Into<String>, T: Into<String>>(
        label: L,
        commit_text: T,
        action: CandidateAction,
    ) -> Self {
        Self {
            label: label.into(),
            commit_text: commit_text.into(),
            action,
        }
    }

    pub fn is_auto_commit(&self) -> bool {
        self.action == CandidateAction::NoneSelectionCommit
    }
}

/// Candidates collected for one query, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateList {
    candidates: Vec<Candidate>,
}

impl CandidateList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: Candidate) {
        self.candidates.push(candidate);
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    /// The first candidate the host may commit without asking the user.
    pub fn auto_commit(&self) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.is_auto_commit())
    }

    pub fn into_vec(self) -> Vec<Candidate> {
        self.candidates
    }
}

impl IntoIterator for CandidateList {
    type Item = Candidate;
    type IntoIter = std::vec::IntoIter<Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.into_iter()
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}
