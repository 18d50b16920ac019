//! Evaluation runs over a vectorized environment.
mod config;
mod vec_evaluator;
pub use config::VecEvalConfig;
pub use vec_evaluator::{VecEvaluator, OVERALL_PREFIX};
