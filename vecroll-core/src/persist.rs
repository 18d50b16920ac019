//! Saving evaluation results as `.npy` files.
use crate::rollout::EvalBatchResult;
use anyhow::{Context, Result};
use ndarray::{Array1, Array3};
use ndarray_npy::{read_npy, write_npy};
use std::{convert::TryFrom, fs, path::Path};

/// File name of observation trajectories.
pub const OBS_TRAJS_FILE: &str = "obs_trajs.npy";

/// File name of action trajectories.
pub const ACTION_TRAJS_FILE: &str = "action_trajs.npy";

/// File name of termination steps.
pub const DONE_AT_FILE: &str = "done_at.npy";

/// Arrays read back from a directory written by [`save_npy`].
#[derive(Clone, Debug)]
pub struct SavedTrajectories {
    /// Observations, `(n_trajs, n_steps + 1, obs_dim)`.
    pub obs_trajs: Array3<f32>,

    /// Actions, `(n_trajs, n_steps + 1, act_dim)`.
    pub act_trajs: Array3<f32>,

    /// Termination steps, `(n_trajs,)`.
    pub done_at: Array1<usize>,
}

/// Writes trajectories and termination steps of `result` into `dir`.
///
/// Termination steps are stored as `i64`.
pub fn save_npy(dir: impl AsRef<Path>, result: &EvalBatchResult) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;

    write_npy(dir.join(OBS_TRAJS_FILE), &result.obs_trajs)?;
    write_npy(dir.join(ACTION_TRAJS_FILE), &result.act_trajs)?;
    write_npy(dir.join(DONE_AT_FILE), &result.done_at.mapv(|d| d as i64))?;
    log::info!("Saved trajectories in {:?}", dir);

    Ok(())
}

/// Reads the arrays written by [`save_npy`].
pub fn load_npy(dir: impl AsRef<Path>) -> Result<SavedTrajectories> {
    let dir = dir.as_ref();
    let obs_trajs: Array3<f32> = read_npy(dir.join(OBS_TRAJS_FILE))?;
    let act_trajs: Array3<f32> = read_npy(dir.join(ACTION_TRAJS_FILE))?;
    let done_at: Array1<i64> = read_npy(dir.join(DONE_AT_FILE))?;
    let done_at = done_at
        .iter()
        .map(|&d| usize::try_from(d).context("Negative termination step"))
        .collect::<Result<Array1<usize>>>()?;

    Ok(SavedTrajectories {
        obs_trajs,
        act_trajs,
        done_at,
    })
}
