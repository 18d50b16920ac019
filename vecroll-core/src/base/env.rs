//! Environment batch.
use super::{Info, VecStep};
use crate::record::Record;
use anyhow::Result;
use ndarray::Array2;

/// A batch of `n_envs` homogeneous environments stepped in lockstep.
///
/// How the instances are executed (in-process, worker threads, subprocesses) is
/// hidden behind this trait. Every call is blocking and returns one synchronized
/// batch. Instances reporting done are expected to reset themselves internally;
/// the caller keeps stepping all of them.
pub trait VecEnv {
    /// Configurations.
    type Config: Clone;

    /// Information in the [`VecStep`] object.
    type Info: Info;

    /// Builds an environment batch with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// The number of instances in the batch.
    fn n_envs(&self) -> usize;

    /// Dimension of a single observation.
    fn obs_dim(&self) -> usize;

    /// Dimension of a single action.
    fn act_dim(&self) -> usize;

    /// Resets all instances and returns observations shaped `(n_envs, obs_dim)`.
    fn reset(&mut self) -> Result<Array2<f32>>;

    /// Applies `act`, shaped `(n_envs, act_dim)`, to all instances.
    fn step(&mut self, act: &Array2<f32>) -> Result<(VecStep<Self>, Record)>
    where
        Self: Sized;

    /// Releases resources held by the batch.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
