use super::{EpisodeResult, TerminationTracker, TrajectoryBuffer};
use crate::{error::EvalError, ObsEncoder, Policy, VecEnv};
use anyhow::Result;
use log::{debug, trace};
use ndarray::Array2;

/// Runs one episode of `n_steps` steps over every instance of a [`VecEnv`].
///
/// The batch is never stopped early: instances that report done keep being
/// stepped until the budget is exhausted, and only their first termination step
/// is tracked.
pub struct EpisodeStepper<'a, E, C, P> {
    env: &'a mut E,
    encoder: &'a C,
    policy: &'a mut P,
    n_steps: usize,
    window_size: usize,
}

impl<'a, E, C, P> EpisodeStepper<'a, E, C, P>
where
    E: VecEnv,
    C: ObsEncoder,
    P: Policy,
{
    /// Constructs [`EpisodeStepper`].
    ///
    /// * `n_steps` - Number of environment steps `T` of the episode.
    /// * `window_size` - Capacity of the policy's rolling context.
    pub fn new(
        env: &'a mut E,
        encoder: &'a C,
        policy: &'a mut P,
        n_steps: usize,
        window_size: usize,
    ) -> Result<Self, EvalError> {
        if env.n_envs() == 0 {
            return Err(EvalError::EmptyBatch);
        }
        if n_steps == 0 {
            return Err(EvalError::InvalidConfig("n_steps must be positive".to_string()));
        }
        if window_size == 0 {
            return Err(EvalError::InvalidConfig(
                "window_size must be positive".to_string(),
            ));
        }
        Ok(Self {
            env,
            encoder,
            policy,
            n_steps,
            window_size,
        })
    }

    /// Runs the episode.
    ///
    /// Trajectories have `n_steps + 1` entries along the time axis: the
    /// observation before every step, and the observation after the last one,
    /// each paired with the action the policy chose for it.
    pub fn run_episode(&mut self) -> Result<EpisodeResult> {
        let n_envs = self.env.n_envs();
        let (obs_dim, act_dim) = (self.env.obs_dim(), self.env.act_dim());

        self.policy.reset_context(self.window_size);
        let mut obs = self.env.reset()?;
        check_obs(&obs, n_envs, obs_dim)?;

        let mut tracker = TerminationTracker::new(n_envs);
        let mut buffer = TrajectoryBuffer::new(n_envs, obs_dim, act_dim, self.n_steps + 1);

        for step in 1..=self.n_steps {
            let act = self.query(&obs, n_envs, act_dim)?;
            buffer.push(&obs, &act)?;

            let (env_step, _) = self.env.step(&act)?;
            check_obs(&env_step.obs, n_envs, obs_dim)?;
            check_len("is_terminated", env_step.is_terminated.len(), n_envs)?;
            check_len("is_truncated", env_step.is_truncated.len(), n_envs)?;

            let dones = env_step.is_done();
            tracker.record_step(step, env_step.reward.view(), dones.view())?;
            trace!(
                "step {}: reward = {:?}, done_at = {:?}",
                step,
                env_step.reward,
                tracker.done_at()
            );

            obs = env_step.obs;
        }

        // The snapshot after the final step, to match single-episode runners.
        let act = self.query(&obs, n_envs, act_dim)?;
        buffer.push(&obs, &act)?;

        debug!(
            "{} of {} instances finished within {} steps",
            tracker.n_finished(),
            n_envs,
            self.n_steps
        );

        let (obs_traj, act_traj) = buffer.into_trajectories()?;
        let (returns, done_at) = tracker.into_parts();

        Ok(EpisodeResult {
            obs_traj,
            act_traj,
            returns,
            done_at,
        })
    }

    fn query(&mut self, obs: &Array2<f32>, n_envs: usize, act_dim: usize) -> Result<Array2<f32>> {
        let enc_obs = self.encoder.encode(obs)?;
        let (act, _) = self.policy.act(&enc_obs)?;
        if act.dim() != (n_envs, act_dim) {
            return Err(EvalError::ActionShape {
                expected: vec![n_envs, act_dim],
                actual: act.shape().to_vec(),
            }
            .into());
        }
        Ok(act)
    }
}

fn check_obs(obs: &Array2<f32>, n_envs: usize, obs_dim: usize) -> Result<(), EvalError> {
    if obs.dim() != (n_envs, obs_dim) {
        return Err(EvalError::ObsShape {
            expected: vec![n_envs, obs_dim],
            actual: obs.shape().to_vec(),
        });
    }
    Ok(())
}

fn check_len(what: &'static str, actual: usize, expected: usize) -> Result<(), EvalError> {
    if actual != expected {
        return Err(EvalError::BatchShape {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}
