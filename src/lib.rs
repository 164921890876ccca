pub mod config;
pub mod error;
pub mod eval;
pub mod scorer;
pub mod universe;

pub use config::Config;
pub use error::{RagbenchError, Result};
pub use eval::{Evaluator, MetricReport, MetricSpec};
pub use scorer::{ScoreMap, Scorer, VssScorer};
pub use universe::{CandidateId, CandidateUniverse};
