//! Policy.
use crate::record::Record;
use anyhow::Result;
use ndarray::Array2;
use serde::de::DeserializeOwned;
use std::path::Path;

/// A deterministic batched policy used for evaluation.
///
/// A policy may keep a [`RollingContext`](crate::RollingContext) of recent encoded
/// observations. The rollout engine calls [`Policy::reset_context`] at the start of
/// every episode and never touches the context otherwise.
pub trait Policy {
    /// Clears the rolling context and sets its capacity to `window_size`.
    fn reset_context(&mut self, window_size: usize);

    /// Returns actions `(n, act_dim)` for encoded observations `(n, enc_dim)`
    /// together with auxiliary information.
    fn act(&mut self, enc_obs: &Array2<f32>) -> Result<(Array2<f32>, Record)>;
}

/// A configurable object.
pub trait Configurable {
    /// Configuration.
    type Config: Clone + DeserializeOwned;

    /// Builds the object.
    fn build(config: Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Build the object with the configuration in the yaml file of the given path.
    fn build_from_path(path: impl AsRef<Path>) -> Result<Self>
    where
        Self: Sized,
    {
        let file = std::fs::File::open(path)?;
        let rdr = std::io::BufReader::new(file);
        let config = serde_yaml::from_reader(rdr)?;
        Self::build(config)
    }
}
