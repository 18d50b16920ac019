//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum PlotError {
    /// Lower and upper bounds of a region have different lengths.
    #[error("Region bounds differ in length: low {low}, high {high}")]
    RegionBounds {
        /// Length of the lower bound.
        low: usize,
        /// Length of the upper bound.
        high: usize,
    },

    /// A region has more components than the observations.
    #[error("Region of dimension {region} does not fit observations of dimension {obs}")]
    RegionDim {
        /// Dimension of the region.
        region: usize,
        /// Dimension of the observations.
        obs: usize,
    },

    /// Observations have fewer than two components.
    #[error("Plotting needs 2-dimensional observations, got {0}")]
    ObsDim(usize),

    /// Number of termination steps differs from the number of trajectories.
    #[error("Got {done_at} termination steps for {trajs} trajectories")]
    Length {
        /// Number of trajectories.
        trajs: usize,
        /// Number of termination steps.
        done_at: usize,
    },

    /// Drawing or encoding the image failed.
    #[error("Failed to draw: {0}")]
    Drawing(String),
}

/// Result type of the library.
pub type PlotResult<T> = Result<T, PlotError>;
