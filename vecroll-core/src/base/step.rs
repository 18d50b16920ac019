//! Environment step.
use super::VecEnv;
use ndarray::{Array1, Array2};

/// Additional information returned by [`VecEnv::step`].
pub trait Info {}

impl Info for () {}

/// Result of stepping all instances of a [`VecEnv`] once.
///
/// The first axis of every field is the instance index.
pub struct VecStep<E: VecEnv> {
    /// Observations after the step, `(n_envs, obs_dim)`.
    pub obs: Array2<f32>,

    /// Rewards, `(n_envs,)`.
    pub reward: Array1<f32>,

    /// Flag denoting if episode is terminated.
    pub is_terminated: Vec<i8>,

    /// Flag denoting if episode is truncated.
    pub is_truncated: Vec<i8>,

    /// Information defined by user.
    pub info: E::Info,
}

impl<E: VecEnv> VecStep<E> {
    /// Constructs a [`VecStep`] object.
    pub fn new(
        obs: Array2<f32>,
        reward: Array1<f32>,
        is_terminated: Vec<i8>,
        is_truncated: Vec<i8>,
        info: E::Info,
    ) -> Self {
        VecStep {
            obs,
            reward,
            is_terminated,
            is_truncated,
            info,
        }
    }

    /// Number of instances in this step.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Terminated or truncated, per instance.
    pub fn is_done(&self) -> Array1<bool> {
        self.is_terminated
            .iter()
            .zip(self.is_truncated.iter())
            .map(|(&t, &u)| t == 1 || u == 1)
            .collect()
    }
}
