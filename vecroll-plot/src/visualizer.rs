//! PNG overlay of classified trajectories.
use crate::{
    error::{PlotError, PlotResult},
    region::{classify, visited_prefix, Region},
};
use log::{debug, info};
use ndarray::{ArrayView1, ArrayView3, Axis};
use plotters::prelude::*;
use std::path::Path;

/// Draws the first two observation components of every trajectory, colored by
/// the category assigned by [`classify`].
pub struct TrajectoryVisualizer {
    regions: Vec<Region>,
    palette: Vec<RGBColor>,
    alpha: f64,
    size: (u32, u32),
    marker_size: i32,
}

impl TrajectoryVisualizer {
    /// Constructs [`TrajectoryVisualizer`] with an ordered list of regions.
    ///
    /// Category `0` (no region visited) is black, categories `1, 2, 3` are red,
    /// green and blue; further categories cycle through the palette.
    pub fn new(regions: Vec<Region>) -> Self {
        Self {
            regions,
            palette: vec![BLACK, RED, GREEN, BLUE],
            alpha: 0.25,
            size: (800, 800),
            marker_size: 3,
        }
    }

    /// Sets the colors indexed by category. An empty palette is ignored.
    pub fn palette(mut self, v: Vec<RGBColor>) -> Self {
        if !v.is_empty() {
            self.palette = v;
        }
        self
    }

    /// Sets the opacity of lines and markers.
    pub fn alpha(mut self, v: f64) -> Self {
        self.alpha = v.clamp(0.0, 1.0);
        self
    }

    /// Sets the image size in pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// The ordered regions.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Color of a category.
    pub fn color_of(&self, category: usize) -> RGBColor {
        self.palette[category % self.palette.len()]
    }

    /// Categories of `obs_trajs` `(B, T+1, obs_dim)` given termination steps `done_at` `(B,)`.
    pub fn categorize(
        &self,
        obs_trajs: ArrayView3<f32>,
        done_at: ArrayView1<usize>,
    ) -> PlotResult<Vec<usize>> {
        let (n_trajs, _, obs_dim) = obs_trajs.dim();
        if done_at.len() != n_trajs {
            return Err(PlotError::Length {
                trajs: n_trajs,
                done_at: done_at.len(),
            });
        }
        if let Some(region) = self.regions.iter().find(|r| r.dim() > obs_dim) {
            return Err(PlotError::RegionDim {
                region: region.dim(),
                obs: obs_dim,
            });
        }

        Ok(obs_trajs
            .axis_iter(Axis(0))
            .zip(done_at.iter())
            .map(|(traj, &d)| classify(traj, d, &self.regions))
            .collect())
    }

    /// Renders all trajectories into a PNG image at `path`, returning their categories.
    ///
    /// Each trajectory is drawn up to and including its termination step as a
    /// line with a cross at every point. Non-finite points are skipped.
    pub fn render(
        &self,
        path: impl AsRef<Path>,
        obs_trajs: ArrayView3<f32>,
        done_at: ArrayView1<usize>,
    ) -> PlotResult<Vec<usize>> {
        let obs_dim = obs_trajs.len_of(Axis(2));
        if obs_dim < 2 {
            return Err(PlotError::ObsDim(obs_dim));
        }
        let categories = self.categorize(obs_trajs, done_at)?;

        let paths: Vec<Vec<(f32, f32)>> = obs_trajs
            .axis_iter(Axis(0))
            .zip(done_at.iter())
            .map(|(traj, &d)| {
                visited_prefix(traj, d)
                    .outer_iter()
                    .map(|p| (p[0], p[1]))
                    .filter(|(x, y)| x.is_finite() && y.is_finite())
                    .collect()
            })
            .collect();
        let (x_range, y_range) = bounds(paths.iter().flatten());
        debug!("Plot range x: {:?}, y: {:?}", x_range, y_range);

        let path = path.as_ref();
        let root = BitMapBackend::new(path, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .build_cartesian_2d(x_range, y_range)
            .map_err(drawing)?;

        for (points, &category) in paths.iter().zip(categories.iter()) {
            let color = self.color_of(category).mix(self.alpha);
            chart
                .draw_series(LineSeries::new(points.iter().copied(), color))
                .map_err(drawing)?;
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&p| Cross::new(p, self.marker_size, color)),
                )
                .map_err(drawing)?;
        }
        root.present().map_err(drawing)?;
        info!("Saved trajectory plot to {:?}", path);

        Ok(categories)
    }
}

fn drawing<E: std::fmt::Debug>(e: E) -> PlotError {
    PlotError::Drawing(format!("{:?}", e))
}

/// Data range padded by 5% on each side; an empty or degenerate axis spans one unit
/// around its value.
fn bounds<'a>(
    points: impl Iterator<Item = &'a (f32, f32)>,
) -> (std::ops::Range<f32>, std::ops::Range<f32>) {
    let init = (f32::INFINITY, f32::NEG_INFINITY, f32::INFINITY, f32::NEG_INFINITY);
    let (x0, x1, y0, y1) = points.fold(init, |(x0, x1, y0, y1), &(x, y)| {
        (x0.min(x), x1.max(x), y0.min(y), y1.max(y))
    });
    (pad(x0, x1), pad(y0, y1))
}

fn pad(low: f32, high: f32) -> std::ops::Range<f32> {
    if !(low <= high) {
        return -1.0..1.0;
    }
    let margin = 0.05 * (high - low);
    if margin == 0.0 {
        (low - 1.0)..(high + 1.0)
    } else {
        (low - margin)..(high + margin)
    }
}
