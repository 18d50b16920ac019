//! Observation encoder.
use anyhow::Result;
use ndarray::Array2;

/// Maps raw observations `(n, obs_dim)` to encoded observations `(n, enc_dim)`.
///
/// Implementations must be pure: the same input always gives the same output.
pub trait ObsEncoder {
    /// Encodes a batch of observations.
    fn encode(&self, obs: &Array2<f32>) -> Result<Array2<f32>>;
}

/// Passes observations through unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityEncoder;

impl ObsEncoder for IdentityEncoder {
    fn encode(&self, obs: &Array2<f32>) -> Result<Array2<f32>> {
        Ok(obs.clone())
    }
}
