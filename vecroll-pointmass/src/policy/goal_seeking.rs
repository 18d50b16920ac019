use anyhow::Result;
use ndarray::{s, Array1, Array2};
use serde::{Deserialize, Serialize};
use vecroll_core::{error::EvalError, record::Record, Configurable, Policy};

/// Configuration of [`GoalSeekingPolicy`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct GoalSeekingPolicyConfig {
    /// Target position.
    pub goal: [f32; 2],

    /// Proportional gain.
    pub gain: f32,
}

impl Default for GoalSeekingPolicyConfig {
    fn default() -> Self {
        Self {
            goal: [3.0, 0.0],
            gain: 1.0,
        }
    }
}

/// Proportional controller towards a fixed goal, `clip(gain * (goal - x), -1, 1)`.
///
/// Actions depend only on the current observation, so the policy keeps no
/// rolling context.
pub struct GoalSeekingPolicy {
    goal: Array1<f32>,
    gain: f32,
}

impl Configurable for GoalSeekingPolicy {
    type Config = GoalSeekingPolicyConfig;

    fn build(config: Self::Config) -> Result<Self> {
        Ok(Self {
            goal: Array1::from(config.goal.to_vec()),
            gain: config.gain,
        })
    }
}

impl Policy for GoalSeekingPolicy {
    fn reset_context(&mut self, _window_size: usize) {}

    fn act(&mut self, enc_obs: &Array2<f32>) -> Result<(Array2<f32>, Record)> {
        if enc_obs.ncols() < 2 {
            return Err(EvalError::ObsShape {
                expected: vec![enc_obs.nrows(), 2],
                actual: enc_obs.shape().to_vec(),
            }
            .into());
        }

        let pos = enc_obs.slice(s![.., ..2]);
        let gain = self.gain;
        let act = (&self.goal - &pos).mapv(|d| (gain * d).clamp(-1.0, 1.0));
        Ok((act, Record::empty()))
    }
}
