//! Trajectory overlay plots.
//!
//! Each trajectory is cut at its termination step and assigned the category of
//! the last region in an ordered list that it visited. [`TrajectoryVisualizer`]
//! draws all trajectories colored by category into one PNG image.
mod error;
mod region;
mod visualizer;
pub use error::{PlotError, PlotResult};
pub use region::{classify, visited_prefix, Region};
pub use visualizer::TrajectoryVisualizer;
