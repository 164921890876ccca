//! Evaluation core: metric specs, ranking metric formulas, and the evaluator
//! that aligns sparse scores onto the candidate universe.

pub mod evaluator;
pub mod metrics;
pub mod query;
pub mod spec;

pub use evaluator::{Evaluator, MetricReport};
pub use query::{load_queries, EvalQuery};
pub use spec::MetricSpec;
