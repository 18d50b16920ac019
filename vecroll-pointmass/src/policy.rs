//! Deterministic policies for the point-mass task.
mod goal_seeking;
mod mlp;
use anyhow::Result;
pub use goal_seeking::{GoalSeekingPolicy, GoalSeekingPolicyConfig};
pub use mlp::{LinearConfig, MlpPolicy, MlpPolicyConfig};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use vecroll_core::{record::Record, Configurable, Policy};

/// Selects one of the policies of this crate.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PointMassPolicyConfig {
    /// [`GoalSeekingPolicy`].
    GoalSeeking(GoalSeekingPolicyConfig),

    /// [`MlpPolicy`] with inline weights.
    Mlp(MlpPolicyConfig),

    /// [`MlpPolicy`] with weights in a YAML file.
    MlpPath(PathBuf),
}

impl Default for PointMassPolicyConfig {
    fn default() -> Self {
        Self::GoalSeeking(GoalSeekingPolicyConfig::default())
    }
}

/// One of the policies of this crate.
pub enum PointMassPolicy {
    /// Steers towards a fixed goal.
    GoalSeeking(GoalSeekingPolicy),

    /// Fixed-weight network over stacked frames.
    Mlp(MlpPolicy),
}

impl Configurable for PointMassPolicy {
    type Config = PointMassPolicyConfig;

    fn build(config: Self::Config) -> Result<Self> {
        Ok(match config {
            PointMassPolicyConfig::GoalSeeking(config) => {
                Self::GoalSeeking(GoalSeekingPolicy::build(config)?)
            }
            PointMassPolicyConfig::Mlp(config) => Self::Mlp(MlpPolicy::build(config)?),
            PointMassPolicyConfig::MlpPath(path) => Self::Mlp(MlpPolicy::build_from_path(path)?),
        })
    }
}

impl Policy for PointMassPolicy {
    fn reset_context(&mut self, window_size: usize) {
        match self {
            Self::GoalSeeking(policy) => policy.reset_context(window_size),
            Self::Mlp(policy) => policy.reset_context(window_size),
        }
    }

    fn act(&mut self, enc_obs: &Array2<f32>) -> Result<(Array2<f32>, Record)> {
        match self {
            Self::GoalSeeking(policy) => policy.act(enc_obs),
            Self::Mlp(policy) => policy.act(enc_obs),
        }
    }
}
