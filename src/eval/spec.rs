//! Metric spec vocabulary and its validating parser.
//!
//! Specs are strings like `"mrr"`, `"hit@3"`, `"recall@20"`: a metric kind,
//! optionally followed by `@` and a positive integer top-k cutoff. Parsing
//! happens once at the boundary so metric dispatch is exhaustive downstream.

use crate::error::{RagbenchError, Result};
use std::fmt;
use std::str::FromStr;

/// One requested ranking metric, with its optional top-k cutoff.
///
/// A `None` cutoff means the full ranking length. `Mrr` and `RPrecision`
/// carry no cutoff; a cutoff given for them is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSpec {
    /// Reciprocal rank of the first relevant candidate.
    Mrr,
    /// Precision at R, where R is the number of relevant candidates.
    RPrecision,
    /// 1.0 if any relevant candidate appears in the top-k, else 0.0.
    Hit(Option<usize>),
    /// Fraction of relevant candidates retrieved in the top-k.
    Recall(Option<usize>),
    /// Fraction of the top-k that is relevant.
    Precision(Option<usize>),
    /// Average precision over the top-k.
    Map(Option<usize>),
    /// Normalized discounted cumulative gain over the top-k.
    Ndcg(Option<usize>),
}

impl FromStr for MetricSpec {
    type Err = RagbenchError;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, cutoff) = match s.split_once('@') {
            Some((kind, suffix)) => {
                let k: usize = suffix
                    .parse()
                    .map_err(|_| RagbenchError::MetricParse(s.to_string()))?;
                if k == 0 {
                    return Err(RagbenchError::MetricParse(s.to_string()));
                }
                (kind, Some(k))
            }
            None => (s, None),
        };

        match kind {
            "mrr" => Ok(MetricSpec::Mrr),
            "rprecision" => Ok(MetricSpec::RPrecision),
            "hit" => Ok(MetricSpec::Hit(cutoff)),
            "recall" => Ok(MetricSpec::Recall(cutoff)),
            "precision" => Ok(MetricSpec::Precision(cutoff)),
            "map" => Ok(MetricSpec::Map(cutoff)),
            "ndcg" => Ok(MetricSpec::Ndcg(cutoff)),
            _ => Err(RagbenchError::UnsupportedMetric(s.to_string())),
        }
    }
}

impl MetricSpec {
    fn kind(&self) -> &'static str {
        match self {
            MetricSpec::Mrr => "mrr",
            MetricSpec::RPrecision => "rprecision",
            MetricSpec::Hit(_) => "hit",
            MetricSpec::Recall(_) => "recall",
            MetricSpec::Precision(_) => "precision",
            MetricSpec::Map(_) => "map",
            MetricSpec::Ndcg(_) => "ndcg",
        }
    }

    /// Top-k cutoff, if the spec carries one.
    pub fn cutoff(&self) -> Option<usize> {
        match self {
            MetricSpec::Mrr | MetricSpec::RPrecision => None,
            MetricSpec::Hit(k)
            | MetricSpec::Recall(k)
            | MetricSpec::Precision(k)
            | MetricSpec::Map(k)
            | MetricSpec::Ndcg(k) => *k,
        }
    }
}

impl fmt::Display for MetricSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cutoff() {
            Some(k) => write!(f, "{}@{}", self.kind(), k),
            None => write!(f, "{}", self.kind()),
        }
    }
}
