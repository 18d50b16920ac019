//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum EvalError {
    /// The environment batch has no instances.
    #[error("Environment batch must contain at least one instance")]
    EmptyBatch,

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Observations returned by the environment do not have the declared shape.
    #[error("Observation shape mismatch: expected {expected:?}, got {actual:?}")]
    ObsShape {
        /// Expected shape, `(n_envs, obs_dim)`.
        expected: Vec<usize>,
        /// Shape of the observations actually received.
        actual: Vec<usize>,
    },

    /// Actions produced by the policy do not match the action space of the environment.
    #[error("Action shape mismatch: expected {expected:?}, got {actual:?}")]
    ActionShape {
        /// Expected shape, `(n_envs, act_dim)`.
        expected: Vec<usize>,
        /// Shape of the actions actually produced.
        actual: Vec<usize>,
    },

    /// A per-instance array does not have the batch length.
    #[error("Batch shape mismatch for {what}: expected {expected}, got {actual}")]
    BatchShape {
        /// Name of the offending array.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Episode results of an evaluation batch do not share a shape.
    #[error("Episode result mismatch: expected {expected:?}, got {actual:?}")]
    EpisodeMismatch {
        /// Shape of the first episode's observation trajectories.
        expected: Vec<usize>,
        /// Shape of the offending episode's observation trajectories.
        actual: Vec<usize>,
    },

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
