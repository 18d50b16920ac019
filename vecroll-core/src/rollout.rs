//! Vectorized episode rollout.
//!
//! One episode runs all `N` instances of a [`VecEnv`](crate::VecEnv) for exactly
//! `T` steps. Instances that finish early keep being stepped; their termination
//! step and return are tracked per instance by [`TerminationTracker`].
mod stepper;
mod termination;
mod trajectory;
pub use stepper::EpisodeStepper;
pub use termination::TerminationTracker;
pub use trajectory::{EpisodeResult, EvalBatchBuffer, EvalBatchResult, TrajectoryBuffer};
