//! One evaluation run of a point-mass policy, from configuration to output files.
use crate::{PointMassConfig, PointMassPolicy, PointMassPolicyConfig, PointMassVecEnv};
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, Write},
    path::{Path, PathBuf},
};
use vecroll_core::{
    persist::save_npy, record::Recorder, Configurable, EvalBatchResult, IdentityEncoder,
    VecEnv, VecEvalConfig, VecEvaluator,
};
use vecroll_plot::TrajectoryVisualizer;

/// File name of the trajectory plot.
pub const PLOT_FILE: &str = "rollouts.png";

/// File name of the configuration saved with the outputs.
pub const CONFIG_FILE: &str = "eval_config.yaml";

/// Configuration of an evaluation run.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EvalRunConfig {
    /// Environment batch.
    pub env: PointMassConfig,

    /// Evaluation loop.
    pub eval: VecEvalConfig,

    /// Policy under evaluation.
    pub policy: PointMassPolicyConfig,

    /// Directory receiving the `.npy` files, the plot and a copy of this configuration.
    pub out_dir: PathBuf,

    /// If `true`, trajectories are plotted into [`PLOT_FILE`].
    pub plot_trajectories: bool,
}

impl Default for EvalRunConfig {
    fn default() -> Self {
        Self {
            env: PointMassConfig::default(),
            eval: VecEvalConfig::default(),
            policy: PointMassPolicyConfig::default(),
            out_dir: PathBuf::from("eval_out"),
            plot_trajectories: true,
        }
    }
}

impl EvalRunConfig {
    /// Sets the environment configuration.
    pub fn env(mut self, v: PointMassConfig) -> Self {
        self.env = v;
        self
    }

    /// Sets the evaluation configuration.
    pub fn eval(mut self, v: VecEvalConfig) -> Self {
        self.eval = v;
        self
    }

    /// Sets the policy configuration.
    pub fn policy(mut self, v: PointMassPolicyConfig) -> Self {
        self.policy = v;
        self
    }

    /// Sets the output directory.
    pub fn out_dir(mut self, v: impl Into<PathBuf>) -> Self {
        self.out_dir = v.into();
        self
    }

    /// Enables or disables the trajectory plot.
    pub fn plot_trajectories(mut self, v: bool) -> Self {
        self.plot_trajectories = v;
        self
    }

    /// Constructs [`EvalRunConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`EvalRunConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Builds the environment batch and the policy, and runs the evaluation.
pub fn evaluate<R>(config: &EvalRunConfig, seed: i64, recorder: &mut R) -> Result<EvalBatchResult>
where
    R: Recorder + ?Sized,
{
    let env = PointMassVecEnv::build(&config.env, seed).context("Failed to build environment")?;
    let mut policy =
        PointMassPolicy::build(config.policy.clone()).context("Failed to build policy")?;
    VecEvaluator::new(env, IdentityEncoder, &config.eval)?.run(&mut policy, recorder)
}

/// Writes the trajectories, the configuration and optionally the plot into `config.out_dir`.
pub fn write_outputs(config: &EvalRunConfig, result: &EvalBatchResult) -> Result<()> {
    let dir = &config.out_dir;
    save_npy(dir, result)?;
    config.save(dir.join(CONFIG_FILE))?;

    if config.plot_trajectories {
        let visualizer = TrajectoryVisualizer::new(config.env.goals()?);
        let categories = visualizer.render(
            dir.join(PLOT_FILE),
            result.obs_trajs.view(),
            result.done_at.view(),
        )?;
        let mut counts = vec![0; visualizer.regions().len() + 1];
        for c in categories {
            counts[c] += 1;
        }
        info!("Trajectories per category (0 = no goal): {:?}", counts);
    }
    Ok(())
}

/// Runs [`evaluate`] and [`write_outputs`].
pub fn run<R>(config: &EvalRunConfig, seed: i64, recorder: &mut R) -> Result<EvalBatchResult>
where
    R: Recorder + ?Sized,
{
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("Failed to create {:?}", config.out_dir))?;
    let result = evaluate(config, seed, recorder)?;
    write_outputs(config, &result)?;
    Ok(result)
}
