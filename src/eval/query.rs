//! Eval query dataset: one query plus its ground-truth candidate ids.

use crate::error::Result;
use crate::universe::CandidateId;
use serde::Deserialize;
use std::path::Path;

/// Single evaluation query with its ground truth.
#[derive(Debug, Clone, Deserialize)]
pub struct EvalQuery {
    /// Query text to run against the scorer.
    pub query: String,
    /// Optional id of a precomputed query embedding in the cache dir.
    #[serde(default)]
    pub query_id: Option<u64>,
    /// Ground-truth correct candidate ids. May be empty; metrics for such a
    /// query are the documented degenerate 0.0.
    pub answer_ids: Vec<CandidateId>,
    /// Optional category label for reporting.
    #[serde(default)]
    pub category: Option<String>,
}

/// Load an eval query set from a JSON array file.
pub fn load_queries(path: &Path) -> Result<Vec<EvalQuery>> {
    let json = std::fs::read_to_string(path)?;
    let queries: Vec<EvalQuery> = serde_json::from_str(&json)?;
    log::info!("Loaded {} eval queries from {}", queries.len(), path.display());
    Ok(queries)
}
