//! Disk persistence for embeddings: the candidate embedding table and the
//! per-query embedding cache.
//!
//! The candidate table is a JSON array; its order is the canonical candidate
//! universe order. Query embeddings are cached one file per query id
//! (`query_{id}.json`) so repeated eval runs never re-embed.

use crate::error::{RagbenchError, Result};
use crate::universe::CandidateId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One candidate and its embedding, as stored in the table file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateEmbedding {
    pub id: CandidateId,
    pub embedding: Vec<f32>,
}

/// Load the candidate embedding table. Array order is preserved; callers use
/// it as the universe order.
pub fn load_candidate_embeddings(path: &Path) -> Result<Vec<CandidateEmbedding>> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        RagbenchError::Embedding(format!(
            "Failed to read candidate embeddings from {}: {}",
            path.display(),
            e
        ))
    })?;
    let table: Vec<CandidateEmbedding> = serde_json::from_str(&json)?;
    log::info!(
        "Loaded {} candidate embeddings from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

/// Write the candidate embedding table.
pub fn save_candidate_embeddings(path: &Path, table: &[CandidateEmbedding]) -> Result<()> {
    let json = serde_json::to_string(table)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn query_embedding_path(cache_dir: &Path, query_id: u64) -> PathBuf {
    cache_dir.join(format!("query_{}.json", query_id))
}

/// Load a cached query embedding, if one exists for this id.
pub fn load_query_embedding(cache_dir: &Path, query_id: u64) -> Result<Option<Vec<f32>>> {
    let path = query_embedding_path(cache_dir, query_id);
    if !path.exists() {
        return Ok(None);
    }
    let json = std::fs::read_to_string(&path)?;
    let embedding: Vec<f32> = serde_json::from_str(&json)?;
    Ok(Some(embedding))
}

/// Cache a query embedding under its id, creating the cache dir if needed.
pub fn store_query_embedding(cache_dir: &Path, query_id: u64, embedding: &[f32]) -> Result<()> {
    std::fs::create_dir_all(cache_dir)?;
    let json = serde_json::to_string(embedding)?;
    std::fs::write(query_embedding_path(cache_dir, query_id), json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_candidate_table_roundtrip_preserves_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("candidates.json");
        let table = vec![
            CandidateEmbedding { id: 30, embedding: vec![1.0, 0.0] },
            CandidateEmbedding { id: 10, embedding: vec![0.0, 1.0] },
            CandidateEmbedding { id: 20, embedding: vec![0.5, 0.5] },
        ];
        save_candidate_embeddings(&path, &table).unwrap();

        let loaded = load_candidate_embeddings(&path).unwrap();
        let ids: Vec<_> = loaded.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
        assert_eq!(loaded[1].embedding, vec![0.0, 1.0]);
    }

    #[test]
    fn test_load_candidate_embeddings_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_candidate_embeddings(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(RagbenchError::Embedding(_))));
    }

    #[test]
    fn test_query_embedding_cache_roundtrip() {
        let dir = TempDir::new().unwrap();
        let cache_dir = dir.path().join("query_cache");

        assert_eq!(load_query_embedding(&cache_dir.join("nope"), 7).unwrap(), None);

        store_query_embedding(&cache_dir, 7, &[0.25, -1.5]).unwrap();
        let loaded = load_query_embedding(&cache_dir, 7).unwrap();
        assert_eq!(loaded, Some(vec![0.25, -1.5]));

        // Other ids remain uncached
        assert_eq!(load_query_embedding(&cache_dir, 8).unwrap(), None);
    }
}
