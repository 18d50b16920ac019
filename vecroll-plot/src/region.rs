//! Axis-aligned regions and trajectory classification.
use crate::error::{PlotError, PlotResult};
use ndarray::{s, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// An axis-aligned box, inclusive on both bounds.
///
/// A region of dimension `d` constrains the first `d` components of an observation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Lower bound.
    pub low: Vec<f32>,

    /// Upper bound.
    pub high: Vec<f32>,
}

impl Region {
    /// Constructs [`Region`].
    pub fn new(low: Vec<f32>, high: Vec<f32>) -> PlotResult<Self> {
        if low.len() != high.len() {
            return Err(PlotError::RegionBounds {
                low: low.len(),
                high: high.len(),
            });
        }
        Ok(Self { low, high })
    }

    /// Number of constrained components.
    pub fn dim(&self) -> usize {
        self.low.len()
    }

    /// Returns `true` if `low <= point <= high` holds for every constrained component.
    ///
    /// A point with fewer components than the region is never contained.
    pub fn contains(&self, point: ArrayView1<f32>) -> bool {
        if point.len() < self.dim() {
            return false;
        }
        self.low
            .iter()
            .zip(self.high.iter())
            .zip(point.iter())
            .all(|((&low, &high), &p)| p >= low && p <= high)
    }

    /// Returns `true` if any point of `traj` lies in the region.
    pub fn is_visited_by(&self, traj: ArrayView2<f32>) -> bool {
        traj.outer_iter().any(|p| self.contains(p))
    }

    /// Goal regions of the `pointmass1` task.
    pub fn pointmass1() -> Vec<Region> {
        vec![
            Region {
                low: vec![2.0, -1.0],
                high: vec![4.0, 1.0],
            },
            Region {
                low: vec![2.0, 3.0],
                high: vec![4.0, 5.0],
            },
        ]
    }

    /// Goal regions of the `pointmass2` task.
    pub fn pointmass2() -> Vec<Region> {
        vec![
            Region {
                low: vec![3.5, -0.5],
                high: vec![4.5, 0.5],
            },
            Region {
                low: vec![1.5, 1.5],
                high: vec![2.5, 2.5],
            },
            Region {
                low: vec![-0.5, 3.5],
                high: vec![0.5, 4.5],
            },
        ]
    }

    /// Regions for a task name.
    ///
    /// `pointmass1` has its own layout; any other `pointmass*` task uses the
    /// `pointmass2` layout.
    pub fn preset(task: &str) -> Option<Vec<Region>> {
        if task == "pointmass1" {
            Some(Self::pointmass1())
        } else if task.starts_with("pointmass") {
            Some(Self::pointmass2())
        } else {
            None
        }
    }
}

/// The part of a trajectory `(n_steps + 1, obs_dim)` up to and including its
/// termination step, or the whole trajectory if `done_at == 0`.
pub fn visited_prefix(traj: ArrayView2<f32>, done_at: usize) -> ArrayView2<f32> {
    let len = traj.nrows();
    let end = if done_at == 0 {
        len
    } else {
        (done_at + 1).min(len)
    };
    traj.slice_move(s![..end, ..])
}

/// Category of a trajectory.
///
/// Returns `i + 1` for the last region `regions[i]` visited by the prefix of the
/// trajectory, or `0` if it visited none. A later region overrides earlier ones.
pub fn classify(traj: ArrayView2<f32>, done_at: usize, regions: &[Region]) -> usize {
    let prefix = visited_prefix(traj, done_at);
    let mut category = 0;
    for (ix, region) in regions.iter().enumerate() {
        if region.is_visited_by(prefix) {
            category = ix + 1;
        }
    }
    category
}
