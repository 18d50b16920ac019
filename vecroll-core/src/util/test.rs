//! Scripted environments and policies for tests.
use crate::{
    record::{Record, RecordValue},
    Policy, RollingContext, VecEnv, VecStep,
};
use anyhow::{bail, Result};
use ndarray::{Array1, Array2};
use std::{cell::Cell, rc::Rc};

/// Configuration of [`ScriptedVecEnv`].
///
/// `rewards[t][k]` and `dones[t][k]` are returned for instance `k` at the
/// `t`-th step after a reset (0-indexed). Steps beyond the script repeat its last
/// row; an empty script means zero rewards and no termination.
#[derive(Clone, Debug)]
pub struct ScriptedVecEnvConfig {
    /// Number of instances.
    pub n_envs: usize,

    /// Dimension of an observation, at least 1.
    pub obs_dim: usize,

    /// Dimension of an action.
    pub act_dim: usize,

    /// Rewards per step and instance.
    pub rewards: Vec<Vec<f32>>,

    /// Done flags per step and instance.
    pub dones: Vec<Vec<bool>>,

    /// Fails the `n`-th step call after a reset (1-indexed).
    pub fail_at_step: Option<usize>,
}

impl ScriptedVecEnvConfig {
    /// Every instance receives `reward` at every step and never finishes.
    pub fn constant_reward(n_envs: usize, obs_dim: usize, reward: f32) -> Self {
        Self {
            n_envs,
            obs_dim,
            act_dim: 1,
            rewards: vec![vec![reward; n_envs]],
            dones: vec![],
            fail_at_step: None,
        }
    }

    /// Sets the reward script.
    pub fn rewards(mut self, v: Vec<Vec<f32>>) -> Self {
        self.rewards = v;
        self
    }

    /// Sets the done script.
    pub fn dones(mut self, v: Vec<Vec<bool>>) -> Self {
        self.dones = v;
        self
    }

    /// Sets the action dimension.
    pub fn act_dim(mut self, v: usize) -> Self {
        self.act_dim = v;
        self
    }

    /// Makes the `n`-th step after a reset fail.
    pub fn fail_at_step(mut self, n: usize) -> Self {
        self.fail_at_step = Some(n);
        self
    }
}

/// An environment batch replaying a fixed script.
///
/// Observation of instance `k` after `t` steps in episode `e` (the number of
/// earlier resets) is `[t, k, e, e, ...]`. Instances are not reset when they
/// report done.
pub struct ScriptedVecEnv {
    config: ScriptedVecEnvConfig,
    t: usize,
    n_resets: usize,
    closed: Rc<Cell<bool>>,
}

impl ScriptedVecEnv {
    /// Number of resets since construction.
    pub fn n_resets(&self) -> usize {
        self.n_resets
    }

    /// A handle observing whether [`VecEnv::close`] has been called.
    pub fn closed_flag(&self) -> Rc<Cell<bool>> {
        self.closed.clone()
    }

    fn obs(&self) -> Array2<f32> {
        let t = self.t as f32;
        let episode = self.n_resets.saturating_sub(1) as f32;
        Array2::from_shape_fn((self.config.n_envs, self.config.obs_dim), |(k, j)| match j {
            0 => t,
            1 => k as f32,
            _ => episode,
        })
    }

    fn row<T: Copy>(script: &[Vec<T>], t: usize, k: usize, default: T) -> T {
        match script.get(t).or_else(|| script.last()) {
            Some(row) => row.get(k).copied().unwrap_or(default),
            None => default,
        }
    }
}

impl VecEnv for ScriptedVecEnv {
    type Config = ScriptedVecEnvConfig;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            t: 0,
            n_resets: 0,
            closed: Rc::new(Cell::new(false)),
        })
    }

    fn n_envs(&self) -> usize {
        self.config.n_envs
    }

    fn obs_dim(&self) -> usize {
        self.config.obs_dim
    }

    fn act_dim(&self) -> usize {
        self.config.act_dim
    }

    fn reset(&mut self) -> Result<Array2<f32>> {
        self.t = 0;
        self.n_resets += 1;
        Ok(self.obs())
    }

    fn step(&mut self, act: &Array2<f32>) -> Result<(VecStep<Self>, Record)> {
        if self.config.fail_at_step == Some(self.t + 1) {
            bail!("Scripted failure at step {}", self.t + 1);
        }
        let n = self.config.n_envs;
        let reward: Array1<f32> = (0..n)
            .map(|k| Self::row(&self.config.rewards, self.t, k, 0.0))
            .collect();
        let is_terminated: Vec<i8> = (0..n)
            .map(|k| Self::row(&self.config.dones, self.t, k, false) as i8)
            .collect();
        self.t += 1;

        let mut record = Record::empty();
        record.insert("act", RecordValue::Array1(act.iter().copied().collect()));
        let step = VecStep::new(self.obs(), reward, is_terminated, vec![0; n], ());

        Ok((step, record))
    }

    fn close(&mut self) -> Result<()> {
        self.closed.set(true);
        Ok(())
    }
}

/// Returns the same action for every observation.
pub struct ConstantPolicy {
    act_dim: usize,
    value: f32,
    context: RollingContext,
}

impl ConstantPolicy {
    /// Constructs [`ConstantPolicy`].
    pub fn new(act_dim: usize, value: f32) -> Self {
        Self {
            act_dim,
            value,
            context: RollingContext::new(1),
        }
    }
}

impl Policy for ConstantPolicy {
    fn reset_context(&mut self, window_size: usize) {
        self.context.reset(window_size);
    }

    fn act(&mut self, enc_obs: &Array2<f32>) -> Result<(Array2<f32>, Record)> {
        self.context.push(enc_obs.clone());
        let act = Array2::from_elem((enc_obs.nrows(), self.act_dim), self.value);
        Ok((act, Record::empty()))
    }
}

/// Copies the first observation component into every action component and
/// counts how it is driven.
pub struct CountingPolicy {
    act_dim: usize,
    context: RollingContext,

    /// Number of calls to [`Policy::act`].
    pub n_acts: usize,

    /// Number of calls to [`Policy::reset_context`].
    pub n_resets: usize,

    /// Length of the rolling context observed at every call to [`Policy::act`].
    pub context_lens: Vec<usize>,
}

impl CountingPolicy {
    /// Constructs [`CountingPolicy`].
    pub fn new(act_dim: usize) -> Self {
        Self {
            act_dim,
            context: RollingContext::new(1),
            n_acts: 0,
            n_resets: 0,
            context_lens: vec![],
        }
    }

    /// The policy's rolling context.
    pub fn context(&self) -> &RollingContext {
        &self.context
    }
}

impl Policy for CountingPolicy {
    fn reset_context(&mut self, window_size: usize) {
        self.n_resets += 1;
        self.context.reset(window_size);
    }

    fn act(&mut self, enc_obs: &Array2<f32>) -> Result<(Array2<f32>, Record)> {
        self.n_acts += 1;
        self.context.push(enc_obs.clone());
        self.context_lens.push(self.context.len());
        let act = Array2::from_shape_fn((enc_obs.nrows(), self.act_dim), |(k, _)| enc_obs[[k, 0]]);
        Ok((act, Record::empty()))
    }
}
