//! Candidate universe: the fixed, ordered set of answerable entity ids.

use crate::error::{RagbenchError, Result};
use std::collections::HashSet;

/// Identifier of one answerable entity. Ids may be non-contiguous.
pub type CandidateId = u32;

/// Ordered, de-duplicated set of candidate ids, fixed for an evaluation session.
///
/// The order of `candidate_ids()` is the canonical order every score map and
/// answer set is aligned against, so it must not change once constructed.
/// The order is whatever the data source supplied; it is not assumed sorted.
#[derive(Debug, Clone)]
pub struct CandidateUniverse {
    ids: Vec<CandidateId>,
    members: HashSet<CandidateId>,
    max_id: CandidateId,
}

impl CandidateUniverse {
    /// Build a universe from an id sequence.
    ///
    /// Duplicates are dropped, keeping the first occurrence so the supplied
    /// order survives. An empty sequence is rejected: an evaluation over zero
    /// candidates has no defined metrics.
    pub fn new(ids: impl IntoIterator<Item = CandidateId>) -> Result<Self> {
        let mut members = HashSet::new();
        let mut unique = Vec::new();
        for id in ids {
            if members.insert(id) {
                unique.push(id);
            }
        }
        if unique.is_empty() {
            return Err(RagbenchError::InvalidInput(
                "candidate universe is empty".to_string(),
            ));
        }
        let max_id = unique.iter().copied().max().unwrap_or(0);
        Ok(Self {
            ids: unique,
            members,
            max_id,
        })
    }

    /// Canonical alignment order, fixed for the session.
    pub fn candidate_ids(&self) -> &[CandidateId] {
        &self.ids
    }

    /// Number of candidates (length of `candidate_ids()`).
    pub fn num_candidates(&self) -> usize {
        self.ids.len()
    }

    /// Largest id in the universe.
    pub fn max_id(&self) -> CandidateId {
        self.max_id
    }

    /// Whether `id` is a member of the universe.
    pub fn contains(&self, id: CandidateId) -> bool {
        self.members.contains(&id)
    }
}
