//! The evaluator: aligns sparse scores and ground truth onto the candidate
//! universe and computes the requested ranking metrics.

use crate::error::{RagbenchError, Result};
use crate::eval::metrics;
use crate::eval::spec::MetricSpec;
use crate::scorer::ScoreMap;
use crate::universe::{CandidateId, CandidateUniverse};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;
use std::sync::Arc;

/// Metric results for one query, keyed by the raw spec strings the caller
/// passed, in the order they were requested.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricReport {
    entries: Vec<(String, f64)>,
}

impl MetricReport {
    /// Value for a metric by its raw spec string, if it was requested.
    pub fn get(&self, spec: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == spec)
            .map(|(_, value)| *value)
    }

    /// Iterate (spec, value) pairs in request order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for MetricReport {
    /// Serializes as a JSON object whose key order is the request order.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Computes ranking metrics for one query at a time.
///
/// Holds a shared, immutable candidate universe; every `evaluate` call is
/// pure, so independent queries may be evaluated concurrently from multiple
/// threads without locking.
#[derive(Debug, Clone)]
pub struct Evaluator {
    universe: Arc<CandidateUniverse>,
}

impl Evaluator {
    pub fn new(universe: Arc<CandidateUniverse>) -> Self {
        Self { universe }
    }

    pub fn universe(&self) -> &CandidateUniverse {
        &self.universe
    }

    /// Evaluate one query's score map against its ground-truth answer ids.
    ///
    /// `scores` may cover any subset of the universe; candidates it omits
    /// always rank after every scored one, whatever the score distribution.
    /// Candidates with equal scores keep universe order, as do unscored
    /// candidates among themselves. An empty `scores` therefore degenerates
    /// to a ranking in universe order.
    ///
    /// `metrics` are raw spec strings (`"mrr"`, `"hit@3"`, ...); the report
    /// is keyed by them, in the given order. All specs are parsed before any
    /// metric is computed, so a bad spec fails the whole call and leaves no
    /// partial report.
    ///
    /// # Errors
    ///
    /// * `UnsupportedMetric` / `MetricParse` - malformed spec in `metrics`.
    /// * `OutOfRangeCandidate` - a `scores` key outside the universe; this is
    ///   a scorer bug and is never silently dropped.
    /// * `InvalidInput` - empty `metrics` list.
    pub fn evaluate(
        &self,
        scores: &ScoreMap,
        answer_ids: &[CandidateId],
        metrics: &[String],
    ) -> Result<MetricReport> {
        if metrics.is_empty() {
            return Err(RagbenchError::InvalidInput(
                "no metrics requested".to_string(),
            ));
        }
        let specs = metrics
            .iter()
            .map(|raw| raw.parse::<MetricSpec>().map(|spec| (raw.clone(), spec)))
            .collect::<Result<Vec<_>>>()?;

        let aligned_scores = self.align_scores(scores)?;
        let aligned_relevance = self.align_relevance(answer_ids);
        let ranked = metrics::rank_relevance(&aligned_scores, &aligned_relevance);

        let mut report = MetricReport::default();
        for (raw, spec) in specs {
            let value = match spec {
                MetricSpec::Mrr => metrics::reciprocal_rank(&ranked),
                MetricSpec::RPrecision => metrics::r_precision(&ranked),
                MetricSpec::Hit(k) => metrics::hit_rate(&ranked, k),
                MetricSpec::Recall(k) => metrics::recall_at(&ranked, k),
                MetricSpec::Precision(k) => metrics::precision_at(&ranked, k),
                MetricSpec::Map(k) => metrics::average_precision(&ranked, k),
                MetricSpec::Ndcg(k) => metrics::ndcg(&ranked, k),
            };
            report.entries.push((raw, value));
        }
        Ok(report)
    }

    /// Project a sparse score map onto the universe order.
    ///
    /// Absent candidates become `None`, which the ranking places strictly
    /// after every scored candidate. No arithmetic sentinel is involved, so
    /// any score distribution works, including all-negative scores and the
    /// empty map.
    fn align_scores(&self, scores: &ScoreMap) -> Result<Vec<Option<f32>>> {
        for &id in scores.keys() {
            if !self.universe.contains(id) {
                return Err(RagbenchError::OutOfRangeCandidate(id));
            }
        }
        if scores.is_empty() {
            log::debug!("empty score map: ranking falls back to universe order");
        }
        Ok(self
            .universe
            .candidate_ids()
            .iter()
            .map(|id| scores.get(id).copied())
            .collect())
    }

    /// Boolean relevance flags in universe order. Answer ids outside the
    /// universe can never be retrieved and are ignored.
    fn align_relevance(&self, answer_ids: &[CandidateId]) -> Vec<bool> {
        let answers: HashSet<CandidateId> = answer_ids.iter().copied().collect();
        self.universe
            .candidate_ids()
            .iter()
            .map(|id| answers.contains(id))
            .collect()
    }
}
