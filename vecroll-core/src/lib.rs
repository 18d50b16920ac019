#![warn(missing_docs)]
//! Vectorized evaluation of trained policies.
//!
//! This crate drives a fixed batch of `N` environment instances through `T` steps
//! per episode, queries a [`Policy`] for batched actions, and records trajectories
//! shaped `(N, T+1, dim)` together with per-instance returns and termination steps.
//!
//! # Entities
//!
//! * [`VecEnv`] - A batch of homogeneous environments stepped in lockstep.
//! * [`ObsEncoder`] - Maps raw observations to the representation consumed by a policy.
//! * [`Policy`] - Deterministic batched action generation with a [`RollingContext`].
//! * [`EpisodeStepper`] - Runs one episode over the batch.
//! * [`VecEvaluator`] - Runs `M` episodes, reports statistics to a
//!   [`Recorder`](record::Recorder) and returns an [`EvalBatchResult`].
//!
//! # Example
//!
//! ```
//! use vecroll_core::{
//!     record::BufferedRecorder,
//!     util::test::{ConstantPolicy, ScriptedVecEnv, ScriptedVecEnvConfig},
//!     IdentityEncoder, VecEnv, VecEvalConfig, VecEvaluator,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let env_config = ScriptedVecEnvConfig::constant_reward(4, 2, 1.0);
//! let env = ScriptedVecEnv::build(&env_config, 0)?;
//! let config = VecEvalConfig::default().n_episodes(2).n_steps(10);
//! let mut policy = ConstantPolicy::new(1, 0.0);
//! let mut recorder = BufferedRecorder::new();
//!
//! let result = VecEvaluator::new(env, IdentityEncoder, &config)?
//!     .run(&mut policy, &mut recorder)?;
//! assert_eq!(result.obs_trajs.shape(), &[8, 11, 2]);
//! # Ok(())
//! # }
//! ```
pub mod error;
pub mod persist;
pub mod record;
pub mod stats;
pub mod util;

mod base;
pub use base::{
    Configurable, IdentityEncoder, Info, ObsEncoder, Policy, RollingContext, VecEnv, VecStep,
};

mod rollout;
pub use rollout::{
    EpisodeResult, EpisodeStepper, EvalBatchBuffer, EvalBatchResult, TerminationTracker,
    TrajectoryBuffer,
};

mod evaluator;
pub use evaluator::{VecEvalConfig, VecEvaluator, OVERALL_PREFIX};
