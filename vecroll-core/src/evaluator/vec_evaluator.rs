//! Evaluator running several episodes over one environment batch.
use super::VecEvalConfig;
use crate::{
    error::EvalError,
    record::{Record, RecordValue, Recorder},
    rollout::{EpisodeStepper, EvalBatchBuffer, EvalBatchResult},
    stats::EpisodeStats,
    ObsEncoder, Policy, VecEnv,
};
use anyhow::Result;
use log::info;

/// Prefix of the keys of run-level statistics.
pub const OVERALL_PREFIX: &str = "overall/";

/// Runs `n_episodes` episodes of a policy on a [`VecEnv`].
///
/// For every episode, the mean and standard deviation of returns and episode
/// lengths are written to a [`Recorder`] together with the episode index. After
/// the last episode the same statistics over all trajectories are written with
/// keys prefixed by `overall/`, and the environment batch is closed.
pub struct VecEvaluator<E, C> {
    env: E,
    encoder: C,
    config: VecEvalConfig,
}

impl<E, C> VecEvaluator<E, C>
where
    E: VecEnv,
    C: ObsEncoder,
{
    /// Constructs [`VecEvaluator`].
    ///
    /// Fails if the configuration has a zero count or the batch is empty.
    pub fn new(env: E, encoder: C, config: &VecEvalConfig) -> Result<Self> {
        config.validate()?;
        if env.n_envs() == 0 {
            return Err(EvalError::EmptyBatch.into());
        }
        Ok(Self {
            env,
            encoder,
            config: config.clone(),
        })
    }

    /// The environment batch.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Runs the evaluation and closes the environment batch.
    pub fn run<P, R>(mut self, policy: &mut P, recorder: &mut R) -> Result<EvalBatchResult>
    where
        P: Policy,
        R: Recorder + ?Sized,
    {
        let result = self.run_episodes(policy, recorder);
        let closed = self.env.close();
        let result = result?;
        closed?;
        Ok(result)
    }

    fn run_episodes<P, R>(&mut self, policy: &mut P, recorder: &mut R) -> Result<EvalBatchResult>
    where
        P: Policy,
        R: Recorder + ?Sized,
    {
        let n_steps = self.config.n_steps;
        let mut batch = EvalBatchBuffer::new();

        for ix in 0..self.config.n_episodes {
            info!("==== Starting episode {} ====", ix);
            let episode = EpisodeStepper::new(
                &mut self.env,
                &self.encoder,
                &mut *policy,
                n_steps,
                self.config.window_size,
            )?
            .run_episode()?;

            let stats =
                EpisodeStats::compute(episode.returns.view(), episode.done_at.view(), n_steps);
            info!("Episode {}: {:?}", ix, stats);
            let mut record = stats.to_record("");
            record.insert("episode", RecordValue::Scalar(ix as f32));
            recorder.write(record);

            batch.push(episode)?;
        }

        let result = batch.finish(Record::empty())?;
        let stats = EpisodeStats::compute(result.returns.view(), result.done_at.view(), n_steps);
        info!("Overall: {:?}", stats);
        let record = stats.to_record(OVERALL_PREFIX);
        recorder.write(record.clone());
        recorder.flush();

        Ok(EvalBatchResult {
            stats: record,
            ..result
        })
    }
}
