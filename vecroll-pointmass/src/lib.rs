//! A 2-dimensional point-mass task for vecroll.
//!
//! [`PointMassVecEnv`] moves `n_envs` points in the plane. An instance terminates
//! when its point enters one of the goal regions of the task and is truncated
//! after `max_episode_steps`; in both cases it resets itself and keeps running.
//!
//! Two deterministic policies are provided: [`GoalSeekingPolicy`] steers towards a
//! fixed goal, and [`MlpPolicy`] applies a fixed-weight network to the frames in
//! its rolling context. [`run`] wires an [`EvalRunConfig`] into a full evaluation.
mod config;
mod env;
mod policy;
pub mod run;
pub use config::PointMassConfig;
pub use env::{PointMassInfo, PointMassVecEnv};
pub use policy::{
    GoalSeekingPolicy, GoalSeekingPolicyConfig, LinearConfig, MlpPolicy, MlpPolicyConfig,
    PointMassPolicy, PointMassPolicyConfig,
};
pub use run::{run, EvalRunConfig};
