//! Scorer contract and the vector-similarity implementation.

pub mod cache;
pub mod storage;
pub mod vss;

use crate::error::Result;
use crate::universe::CandidateId;
use std::collections::HashMap;

pub use cache::QueryEmbeddingCache;
pub use storage::{
    load_candidate_embeddings, load_query_embedding, save_candidate_embeddings,
    store_query_embedding, CandidateEmbedding,
};
pub use vss::VssScorer;

/// Sparse mapping from candidate id to relevance score, produced once per
/// query. May cover any subset of the universe, including none of it.
pub type ScoreMap = HashMap<CandidateId, f32>;

/// A retrieval model: scores candidates for a query.
///
/// Implementations are not required to score the whole universe; the
/// evaluator imputes a below-minimum sentinel for whatever they leave out.
pub trait Scorer {
    /// Score candidates for `query`.
    ///
    /// `query_id` identifies a precomputed query embedding where the
    /// implementation caches those. `candidates`, when given, restricts
    /// scoring to that subset of the universe.
    fn score(
        &self,
        query: &str,
        query_id: Option<u64>,
        candidates: Option<&[CandidateId]>,
    ) -> Result<ScoreMap>;
}

/// Produces an embedding vector for a query text.
///
/// The boundary behind which embedding providers live. Network-backed
/// implementations belong to the host application; tests use deterministic
/// ones.
pub trait QueryEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
