use crate::error::EvalError;
use ndarray::{Array1, ArrayView1, Zip};

/// Per-instance termination steps and returns of one episode.
///
/// `done_at[k]` is the first 1-indexed step at which instance `k` reported done,
/// or `0` if it has not done so yet. Each entry is written at most once.
/// `returns[k]` accumulates rewards up to and including that step.
#[derive(Clone, Debug)]
pub struct TerminationTracker {
    done_at: Array1<usize>,
    returns: Array1<f32>,
}

impl TerminationTracker {
    /// Creates a tracker for `n_envs` instances, none of them finished.
    pub fn new(n_envs: usize) -> Self {
        Self {
            done_at: Array1::zeros(n_envs),
            returns: Array1::zeros(n_envs),
        }
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.done_at.len()
    }

    /// Returns `true` if the tracker has no instances.
    pub fn is_empty(&self) -> bool {
        self.done_at.is_empty()
    }

    /// Adds `rewards` to the returns of instances that have not finished.
    ///
    /// Implemented as `returns += rewards * (done_at == 0)`, so non-finite rewards
    /// of finished instances still reach their returns.
    pub fn accumulate(&mut self, rewards: ArrayView1<f32>) -> Result<(), EvalError> {
        self.check_len("reward", rewards.len())?;
        Zip::from(&mut self.returns)
            .and(rewards)
            .and(&self.done_at)
            .for_each(|ret, &reward, &done_at| {
                let running = if done_at == 0 { 1.0 } else { 0.0 };
                *ret += reward * running;
            });
        Ok(())
    }

    /// Marks `step` as the termination step of every unfinished instance with `dones[k]`.
    pub fn update(&mut self, step: usize, dones: ArrayView1<bool>) -> Result<(), EvalError> {
        debug_assert!(step >= 1, "steps are 1-indexed");
        self.check_len("done", dones.len())?;
        Zip::from(&mut self.done_at)
            .and(dones)
            .for_each(|done_at, &done| {
                if *done_at == 0 && done {
                    *done_at = step;
                }
            });
        Ok(())
    }

    /// Processes the outcome of step `step`.
    ///
    /// Rewards are accumulated against the termination state before this step,
    /// so the reward of the terminating step is kept.
    pub fn record_step(
        &mut self,
        step: usize,
        rewards: ArrayView1<f32>,
        dones: ArrayView1<bool>,
    ) -> Result<(), EvalError> {
        self.check_len("reward", rewards.len())?;
        self.check_len("done", dones.len())?;
        self.accumulate(rewards)?;
        self.update(step, dones)
    }

    /// Termination steps, `0` for instances that have not finished.
    pub fn done_at(&self) -> &Array1<usize> {
        &self.done_at
    }

    /// Accumulated returns.
    pub fn returns(&self) -> &Array1<f32> {
        &self.returns
    }

    /// Number of instances that have finished.
    pub fn n_finished(&self) -> usize {
        self.done_at.iter().filter(|&&d| d != 0).count()
    }

    /// Returns `(returns, done_at)`.
    pub fn into_parts(self) -> (Array1<f32>, Array1<usize>) {
        (self.returns, self.done_at)
    }

    fn check_len(&self, what: &'static str, actual: usize) -> Result<(), EvalError> {
        if actual != self.len() {
            return Err(EvalError::BatchShape {
                what,
                expected: self.len(),
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_reward_of_terminating_step_is_kept() {
        let mut tracker = TerminationTracker::new(1);
        let rewards = [1.0f32, 1.0, 5.0, 9.0, 9.0];
        let dones = [false, false, true, false, false];

        for (i, (&r, &d)) in rewards.iter().zip(dones.iter()).enumerate() {
            tracker
                .record_step(i + 1, array![r].view(), array![d].view())
                .unwrap();
        }

        assert_eq!(tracker.done_at(), &array![3usize]);
        assert_eq!(tracker.returns(), &array![7.0f32]);
    }

    #[test]
    fn test_first_done_wins() {
        let mut tracker = TerminationTracker::new(2);
        tracker.update(2, array![true, false].view()).unwrap();
        tracker.update(4, array![true, true].view()).unwrap();

        assert_eq!(tracker.done_at(), &array![2usize, 4]);
        assert_eq!(tracker.n_finished(), 2);
    }

    #[test]
    fn test_nan_after_termination_propagates() {
        let mut tracker = TerminationTracker::new(1);
        tracker
            .record_step(1, array![1.0f32].view(), array![true].view())
            .unwrap();
        tracker
            .record_step(2, array![f32::NAN].view(), array![false].view())
            .unwrap();

        assert!(tracker.returns()[0].is_nan());
    }

    #[test]
    fn test_length_mismatch_leaves_state_untouched() {
        let mut tracker = TerminationTracker::new(2);
        let err = tracker
            .record_step(1, array![1.0f32, 1.0].view(), array![true].view())
            .unwrap_err();

        assert!(matches!(err, EvalError::BatchShape { what: "done", .. }));
        assert_eq!(tracker.returns(), &array![0.0f32, 0.0]);
    }
}
