//! Vector similarity search scorer: cosine similarity between a query
//! embedding and precomputed candidate embeddings.

use crate::error::{RagbenchError, Result};
use crate::scorer::cache::QueryEmbeddingCache;
use crate::scorer::storage::{self, CandidateEmbedding};
use crate::scorer::{QueryEmbedder, ScoreMap, Scorer};
use crate::universe::{CandidateId, CandidateUniverse};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Scores candidates by cosine similarity against a precomputed embedding
/// table covering the whole universe.
///
/// Query embeddings resolve in order: the per-id disk cache (when the query
/// carries a `query_id` and a cache dir is configured), the in-memory LRU
/// keyed by query text, then the optional [`QueryEmbedder`]. Freshly embedded
/// queries are written back to both caches.
pub struct VssScorer {
    universe: Arc<CandidateUniverse>,
    /// Candidate embeddings in universe order.
    embeddings: Vec<Vec<f32>>,
    /// Universe id -> index into `embeddings`.
    positions: HashMap<CandidateId, usize>,
    dimensions: usize,
    query_cache_dir: Option<PathBuf>,
    mem_cache: QueryEmbeddingCache,
    embedder: Option<Box<dyn QueryEmbedder>>,
}

impl VssScorer {
    /// Build a scorer from the universe and its embedding table.
    ///
    /// Every universe member must appear in `table` and all embeddings must
    /// share one dimension; table entries outside the universe are dropped
    /// with a warning.
    pub fn new(
        universe: Arc<CandidateUniverse>,
        table: Vec<CandidateEmbedding>,
        cache_capacity: usize,
    ) -> Result<Self> {
        let mut by_id: HashMap<CandidateId, Vec<f32>> = HashMap::with_capacity(table.len());
        for entry in table {
            if !universe.contains(entry.id) {
                log::warn!("Dropping embedding for id {} outside the universe", entry.id);
                continue;
            }
            by_id.insert(entry.id, entry.embedding);
        }

        let mut embeddings = Vec::with_capacity(universe.num_candidates());
        let mut positions = HashMap::with_capacity(universe.num_candidates());
        let mut dimensions = 0usize;
        for (idx, &id) in universe.candidate_ids().iter().enumerate() {
            let embedding = by_id.remove(&id).ok_or_else(|| {
                RagbenchError::Embedding(format!("Missing embedding for candidate {}", id))
            })?;
            if idx == 0 {
                dimensions = embedding.len();
            } else if embedding.len() != dimensions {
                return Err(RagbenchError::Embedding(format!(
                    "Candidate {} has dimension {}, expected {}",
                    id,
                    embedding.len(),
                    dimensions
                )));
            }
            positions.insert(id, idx);
            embeddings.push(embedding);
        }
        if dimensions == 0 {
            return Err(RagbenchError::Embedding(
                "Candidate embeddings are zero-dimensional".to_string(),
            ));
        }

        Ok(Self {
            universe,
            embeddings,
            positions,
            dimensions,
            query_cache_dir: None,
            mem_cache: QueryEmbeddingCache::new(cache_capacity),
            embedder: None,
        })
    }

    /// Enable the per-id disk cache for query embeddings.
    pub fn with_query_cache_dir(mut self, dir: PathBuf) -> Self {
        self.query_cache_dir = Some(dir);
        self
    }

    /// Attach an embedder for queries not found in any cache.
    pub fn with_embedder(mut self, embedder: Box<dyn QueryEmbedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn query_embedding(&self, query: &str, query_id: Option<u64>) -> Result<Vec<f32>> {
        if let (Some(id), Some(dir)) = (query_id, self.query_cache_dir.as_deref()) {
            if let Some(embedding) = storage::load_query_embedding(dir, id)? {
                log::debug!("Query {} embedding loaded from disk cache", id);
                return Ok(embedding);
            }
        }
        if let Some(embedding) = self.mem_cache.get(query) {
            return Ok(embedding);
        }
        let embedder = self.embedder.as_ref().ok_or_else(|| {
            RagbenchError::Embedding(format!(
                "No cached embedding for query {:?} and no embedder configured",
                query
            ))
        })?;
        let embedding = embedder.embed(query)?;
        self.mem_cache.put(query.to_string(), embedding.clone());
        if let (Some(id), Some(dir)) = (query_id, self.query_cache_dir.as_deref()) {
            storage::store_query_embedding(dir, id, &embedding)?;
        }
        Ok(embedding)
    }

    fn score_one(&self, query_vec: &[f32], idx: usize) -> f32 {
        cosine_similarity(query_vec, &self.embeddings[idx])
    }
}

impl Scorer for VssScorer {
    fn score(
        &self,
        query: &str,
        query_id: Option<u64>,
        candidates: Option<&[CandidateId]>,
    ) -> Result<ScoreMap> {
        let query_vec = self.query_embedding(query, query_id)?;
        if query_vec.len() != self.dimensions {
            return Err(RagbenchError::Embedding(format!(
                "Unexpected query embedding dimension: expected {}, got {}",
                self.dimensions,
                query_vec.len()
            )));
        }

        let mut scores = ScoreMap::new();
        match candidates {
            Some(subset) => {
                for &id in subset {
                    let idx = *self
                        .positions
                        .get(&id)
                        .ok_or(RagbenchError::OutOfRangeCandidate(id))?;
                    scores.insert(id, self.score_one(&query_vec, idx));
                }
            }
            None => {
                for (idx, &id) in self.universe.candidate_ids().iter().enumerate() {
                    scores.insert(id, self.score_one(&query_vec, idx));
                }
            }
        }
        Ok(scores)
    }
}

/// Cosine similarity between two vectors of equal length. Returns 0.0 when
/// either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "vectors must have equal length");
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}
