//! Point-mass environment batch.
use crate::PointMassConfig;
use anyhow::Result;
use log::trace;
use ndarray::{Array1, Array2};
use vecroll_core::{
    error::EvalError,
    record::Record,
    Info, VecEnv, VecStep,
};
use vecroll_plot::Region;

/// Dimension of observations and actions.
const DIM: usize = 2;

/// Information returned with every step of [`PointMassVecEnv`].
#[derive(Clone, Debug)]
pub struct PointMassInfo {
    /// Positions reached by the step, before instances that finished were reset.
    pub final_obs: Array2<f32>,

    /// `i + 1` for instances that entered goal `i` in this step, `0` otherwise.
    pub goal: Vec<usize>,
}

impl Info for PointMassInfo {}

/// A batch of points moving in the plane.
///
/// The observation is the position and the action is a velocity command clipped
/// to `[-1, 1]` per component. An instance terminates when it enters a goal
/// region, is truncated after `max_episode_steps` and then restarts from a random
/// position. The observation returned for such an instance is its new start.
pub struct PointMassVecEnv {
    config: PointMassConfig,
    goals: Vec<Region>,
    rng: fastrand::Rng,
    pos: Array2<f32>,
    elapsed: Vec<usize>,
}

impl PointMassVecEnv {
    /// Goal regions of the task.
    pub fn goals(&self) -> &[Region] {
        &self.goals
    }

    fn sample_start(&mut self, k: usize) {
        for j in 0..DIM {
            let (low, high) = (self.config.init_low[j], self.config.init_high[j]);
            self.pos[[k, j]] = low + (high - low) * self.rng.f32();
        }
        self.elapsed[k] = 0;
    }
}

impl VecEnv for PointMassVecEnv {
    type Config = PointMassConfig;
    type Info = PointMassInfo;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        config.validate()?;
        let n = config.n_envs;
        Ok(Self {
            config: config.clone(),
            goals: config.goals()?,
            rng: fastrand::Rng::with_seed(seed as u64),
            pos: Array2::zeros((n, DIM)),
            elapsed: vec![0; n],
        })
    }

    fn n_envs(&self) -> usize {
        self.config.n_envs
    }

    fn obs_dim(&self) -> usize {
        DIM
    }

    fn act_dim(&self) -> usize {
        DIM
    }

    fn reset(&mut self) -> Result<Array2<f32>> {
        for k in 0..self.config.n_envs {
            self.sample_start(k);
        }
        Ok(self.pos.clone())
    }

    fn step(&mut self, act: &Array2<f32>) -> Result<(VecStep<Self>, Record)> {
        let n = self.config.n_envs;
        if act.dim() != (n, DIM) {
            return Err(EvalError::ActionShape {
                expected: vec![n, DIM],
                actual: act.shape().to_vec(),
            }
            .into());
        }

        let step_size = self.config.step_size;
        self.pos
            .zip_mut_with(act, |p, &a| *p += step_size * a.clamp(-1.0, 1.0));
        let final_obs = self.pos.clone();

        let mut reward = Array1::zeros(n);
        let mut is_terminated = vec![0; n];
        let mut is_truncated = vec![0; n];
        let mut goal = vec![0; n];
        for k in 0..n {
            self.elapsed[k] += 1;
            let row = self.pos.row(k);
            match self.goals.iter().position(|r| r.contains(row)) {
                Some(ix) => {
                    reward[k] = self.config.goal_reward;
                    is_terminated[k] = 1;
                    goal[k] = ix + 1;
                }
                None => {
                    reward[k] = -self.config.step_penalty;
                    if self.elapsed[k] >= self.config.max_episode_steps {
                        is_truncated[k] = 1;
                    }
                }
            }
            if is_terminated[k] == 1 || is_truncated[k] == 1 {
                trace!("Instance {} restarts after {} steps", k, self.elapsed[k]);
                self.sample_start(k);
            }
        }

        let n_terminated = is_terminated.iter().filter(|&&t| t == 1).count();
        let record = Record::from_scalar("n_terminated", n_terminated as f32);
        let info = PointMassInfo { final_obs, goal };
        let step = VecStep::new(self.pos.clone(), reward, is_terminated, is_truncated, info);

        Ok((step, record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn config() -> PointMassConfig {
        PointMassConfig::default()
            .n_envs(2)
            .step_size(0.75)
            .max_episode_steps(3)
            .init_box([0.0, 0.0], [0.0, 0.0])
    }

    #[test]
    fn test_same_seed_same_starts() -> Result<()> {
        let config = PointMassConfig::default().n_envs(4);
        let mut env1 = PointMassVecEnv::build(&config, 7)?;
        let mut env2 = PointMassVecEnv::build(&config, 7)?;
        assert_eq!(env1.reset()?, env2.reset()?);
        Ok(())
    }

    #[test]
    fn test_terminates_in_goal_and_restarts() -> Result<()> {
        let mut env = PointMassVecEnv::build(&config(), 0)?;
        env.reset()?;

        // Instance 0 moves right into [2, 4] x [-1, 1] on the third step.
        let act = array![[1.0f32, 0.0], [0.0, 0.0]];
        let (step, _) = env.step(&act)?;
        assert_eq!(step.is_terminated, vec![0, 0]);
        env.step(&act)?;
        let (step, record) = env.step(&act)?;

        assert_eq!(step.is_terminated, vec![1, 0]);
        assert_eq!(step.is_truncated, vec![0, 1]);
        assert_eq!(step.reward, array![1.0f32, -0.01]);
        assert_eq!(step.info.goal, vec![1, 0]);
        assert_eq!(step.info.final_obs.row(0), array![2.25f32, 0.0]);
        assert_eq!(step.obs, Array2::<f32>::zeros((2, 2)));
        assert_eq!(record.get_scalar("n_terminated")?, 1.0);
        Ok(())
    }

    #[test]
    fn test_actions_are_clipped() -> Result<()> {
        let mut env = PointMassVecEnv::build(&config(), 0)?;
        env.reset()?;
        let (step, _) = env.step(&array![[5.0f32, -5.0], [0.5, 0.0]])?;
        assert_eq!(step.obs, array![[0.75f32, -0.75], [0.375, 0.0]]);
        Ok(())
    }

    #[test]
    fn test_rejects_wrong_action_shape() -> Result<()> {
        let mut env = PointMassVecEnv::build(&config(), 0)?;
        env.reset()?;
        let err = env.step(&Array2::zeros((2, 3))).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<EvalError>(),
            Some(EvalError::ActionShape { .. })
        ));
        Ok(())
    }
}
