use crate::{error::EvalError, record::Record, stats::episode_lengths};
use anyhow::Result;
use ndarray::{concatenate, stack, Array1, Array2, Array3, Axis};

/// Collects per-step observation and action batches of one episode.
///
/// Each push appends one time step; [`TrajectoryBuffer::into_trajectories`] stacks
/// them into arrays shaped `(n_envs, n_pushed, dim)`.
pub struct TrajectoryBuffer {
    n_envs: usize,
    obs_dim: usize,
    act_dim: usize,
    obs: Vec<Array2<f32>>,
    act: Vec<Array2<f32>>,
}

impl TrajectoryBuffer {
    /// Creates a buffer expecting `capacity` time steps.
    pub fn new(n_envs: usize, obs_dim: usize, act_dim: usize, capacity: usize) -> Self {
        Self {
            n_envs,
            obs_dim,
            act_dim,
            obs: Vec::with_capacity(capacity),
            act: Vec::with_capacity(capacity),
        }
    }

    /// Appends a snapshot of observations `(n_envs, obs_dim)` and the actions
    /// `(n_envs, act_dim)` chosen for them.
    pub fn push(&mut self, obs: &Array2<f32>, act: &Array2<f32>) -> Result<(), EvalError> {
        if obs.dim() != (self.n_envs, self.obs_dim) {
            return Err(EvalError::ObsShape {
                expected: vec![self.n_envs, self.obs_dim],
                actual: obs.shape().to_vec(),
            });
        }
        if act.dim() != (self.n_envs, self.act_dim) {
            return Err(EvalError::ActionShape {
                expected: vec![self.n_envs, self.act_dim],
                actual: act.shape().to_vec(),
            });
        }
        self.obs.push(obs.clone());
        self.act.push(act.clone());
        Ok(())
    }

    /// Number of time steps pushed.
    pub fn len(&self) -> usize {
        self.obs.len()
    }

    /// Returns `true` if nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.obs.is_empty()
    }

    /// Stacks the snapshots along a new time axis (axis 1).
    pub fn into_trajectories(self) -> Result<(Array3<f32>, Array3<f32>)> {
        let obs = self.obs.iter().map(|o| o.view()).collect::<Vec<_>>();
        let act = self.act.iter().map(|a| a.view()).collect::<Vec<_>>();
        Ok((stack(Axis(1), &obs)?, stack(Axis(1), &act)?))
    }
}

/// Trajectories, returns and termination steps of one episode.
#[derive(Clone, Debug)]
pub struct EpisodeResult {
    /// Observations, `(n_envs, n_steps + 1, obs_dim)`.
    pub obs_traj: Array3<f32>,

    /// Actions, `(n_envs, n_steps + 1, act_dim)`.
    pub act_traj: Array3<f32>,

    /// Returns, `(n_envs,)`.
    pub returns: Array1<f32>,

    /// First 1-indexed step at which each instance reported done, `0` if never.
    pub done_at: Array1<usize>,
}

impl EpisodeResult {
    /// Number of instances.
    pub fn n_envs(&self) -> usize {
        self.obs_traj.shape()[0]
    }

    /// Step budget of the episode.
    pub fn n_steps(&self) -> usize {
        self.obs_traj.shape()[1].saturating_sub(1)
    }

    /// Checks that every per-instance array has `n_envs` rows and that both
    /// trajectories hold at least one step plus the final snapshot.
    pub fn validate(&self) -> Result<(), EvalError> {
        let n_envs = self.n_envs();
        let lens = [
            ("act_traj", self.act_traj.shape()[0]),
            ("returns", self.returns.len()),
            ("done_at", self.done_at.len()),
        ];
        for &(what, actual) in lens.iter() {
            if actual != n_envs {
                return Err(EvalError::BatchShape {
                    what,
                    expected: n_envs,
                    actual,
                });
            }
        }
        let n_snapshots = self.obs_traj.shape()[1];
        if self.act_traj.shape()[1] != n_snapshots {
            return Err(EvalError::BatchShape {
                what: "act_traj time axis",
                expected: n_snapshots,
                actual: self.act_traj.shape()[1],
            });
        }
        if n_snapshots < 2 {
            return Err(EvalError::BatchShape {
                what: "time axis",
                expected: 2,
                actual: n_snapshots,
            });
        }
        Ok(())
    }
}

/// Concatenation of the episodes of one evaluation run along the batch axis.
///
/// Row `i * n_envs + k` holds instance `k` of episode `i`.
#[derive(Clone, Debug)]
pub struct EvalBatchResult {
    /// Observations, `(n_episodes * n_envs, n_steps + 1, obs_dim)`.
    pub obs_trajs: Array3<f32>,

    /// Actions, `(n_episodes * n_envs, n_steps + 1, act_dim)`.
    pub act_trajs: Array3<f32>,

    /// Returns, `(n_episodes * n_envs,)`.
    pub returns: Array1<f32>,

    /// Termination steps, `(n_episodes * n_envs,)`.
    pub done_at: Array1<usize>,

    /// Step budget of every episode.
    pub n_steps: usize,

    /// Named statistics over the whole run.
    pub stats: Record,
}

impl EvalBatchResult {
    /// Concatenates episode results in order, without statistics.
    pub fn concat(episodes: Vec<EpisodeResult>) -> Result<Self> {
        let mut buffer = EvalBatchBuffer::new();
        for episode in episodes {
            buffer.push(episode)?;
        }
        buffer.finish(Record::empty())
    }

    /// Number of trajectories.
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    /// Returns `true` if there is no trajectory.
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    /// Episode lengths, counting instances that never finished as `n_steps`.
    pub fn episode_lengths(&self) -> Array1<f32> {
        episode_lengths(self.done_at.view(), self.n_steps)
    }
}

/// Accumulates [`EpisodeResult`]s of one evaluation run.
#[derive(Default)]
pub struct EvalBatchBuffer {
    episodes: Vec<EpisodeResult>,
}

impl EvalBatchBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of episodes pushed.
    pub fn n_episodes(&self) -> usize {
        self.episodes.len()
    }

    /// Appends an episode.
    ///
    /// The episode must pass [`EpisodeResult::validate`], and all episodes must
    /// share the batch size, step budget and dimensions.
    pub fn push(&mut self, episode: EpisodeResult) -> Result<(), EvalError> {
        episode.validate()?;
        if let Some(first) = self.episodes.first() {
            if first.obs_traj.shape() != episode.obs_traj.shape()
                || first.act_traj.shape() != episode.act_traj.shape()
            {
                return Err(EvalError::EpisodeMismatch {
                    expected: first.obs_traj.shape().to_vec(),
                    actual: episode.obs_traj.shape().to_vec(),
                });
            }
        }
        self.episodes.push(episode);
        Ok(())
    }

    /// Concatenates the episodes in push order.
    pub fn finish(self, stats: Record) -> Result<EvalBatchResult> {
        let n_steps = match self.episodes.first() {
            Some(first) => first.n_steps(),
            None => {
                return Err(EvalError::InvalidConfig("no episode to concatenate".to_string()).into())
            }
        };
        let obs = self.episodes.iter().map(|e| e.obs_traj.view()).collect::<Vec<_>>();
        let act = self.episodes.iter().map(|e| e.act_traj.view()).collect::<Vec<_>>();
        let returns = self.episodes.iter().map(|e| e.returns.view()).collect::<Vec<_>>();
        let done_at = self.episodes.iter().map(|e| e.done_at.view()).collect::<Vec<_>>();

        Ok(EvalBatchResult {
            obs_trajs: concatenate(Axis(0), &obs)?,
            act_trajs: concatenate(Axis(0), &act)?,
            returns: concatenate(Axis(0), &returns)?,
            done_at: concatenate(Axis(0), &done_at)?,
            n_steps,
            stats,
        })
    }
}
