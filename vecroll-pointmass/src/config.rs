//! Configuration of [`PointMassVecEnv`](crate::PointMassVecEnv).
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use vecroll_core::error::EvalError;
use vecroll_plot::Region;

/// Configuration of [`PointMassVecEnv`](crate::PointMassVecEnv).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PointMassConfig {
    /// Number of instances.
    pub n_envs: usize,

    /// Task name, `pointmass1` or `pointmass2`. Selects the goal regions.
    pub task: String,

    /// Steps after which an instance is truncated.
    pub max_episode_steps: usize,

    /// Displacement per unit action.
    pub step_size: f32,

    /// Lower corner of the box initial positions are drawn from.
    pub init_low: [f32; 2],

    /// Upper corner of the box initial positions are drawn from.
    pub init_high: [f32; 2],

    /// Reward for entering a goal region.
    pub goal_reward: f32,

    /// Penalty for every other step.
    pub step_penalty: f32,
}

impl Default for PointMassConfig {
    fn default() -> Self {
        Self {
            n_envs: 8,
            task: "pointmass1".to_string(),
            max_episode_steps: 50,
            step_size: 0.25,
            init_low: [-0.5, -0.5],
            init_high: [0.5, 0.5],
            goal_reward: 1.0,
            step_penalty: 0.01,
        }
    }
}

impl PointMassConfig {
    /// Sets the number of instances.
    pub fn n_envs(mut self, v: usize) -> Self {
        self.n_envs = v;
        self
    }

    /// Sets the task name.
    pub fn task(mut self, v: impl Into<String>) -> Self {
        self.task = v.into();
        self
    }

    /// Sets the truncation horizon.
    pub fn max_episode_steps(mut self, v: usize) -> Self {
        self.max_episode_steps = v;
        self
    }

    /// Sets the displacement per unit action.
    pub fn step_size(mut self, v: f32) -> Self {
        self.step_size = v;
        self
    }

    /// Sets the box initial positions are drawn from.
    pub fn init_box(mut self, low: [f32; 2], high: [f32; 2]) -> Self {
        self.init_low = low;
        self.init_high = high;
        self
    }

    /// Goal regions of the task.
    pub fn goals(&self) -> Result<Vec<Region>> {
        match Region::preset(&self.task) {
            Some(regions) => Ok(regions),
            None => bail!("Unknown point-mass task: {}", self.task),
        }
    }

    /// Fails on an empty batch, a zero horizon or an inverted initial box.
    pub fn validate(&self) -> Result<()> {
        if self.n_envs == 0 {
            return Err(EvalError::EmptyBatch.into());
        }
        if self.max_episode_steps == 0 {
            return Err(EvalError::InvalidConfig("max_episode_steps must be positive".into()).into());
        }
        if self.init_low.iter().zip(self.init_high.iter()).any(|(l, h)| l > h) {
            return Err(EvalError::InvalidConfig("init_low exceeds init_high".into()).into());
        }
        Ok(())
    }

    /// Constructs [`PointMassConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`PointMassConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
