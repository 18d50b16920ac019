use anyhow::Result;
use ndarray::{array, s, Array1};
use test_log::test;
use vecroll_core::{
    error::EvalError,
    record::BufferedRecorder,
    util::test::{ConstantPolicy, CountingPolicy, ScriptedVecEnv, ScriptedVecEnvConfig},
    EpisodeStepper, IdentityEncoder, VecEnv, VecEvalConfig, VecEvaluator,
};

fn rewards(rows: &[f32]) -> Vec<Vec<f32>> {
    rows.iter().map(|&r| vec![r]).collect()
}

fn dones(rows: &[bool]) -> Vec<Vec<bool>> {
    rows.iter().map(|&d| vec![d]).collect()
}

#[test]
fn test_rewards_after_termination_are_excluded() -> Result<()> {
    let config = ScriptedVecEnvConfig::constant_reward(1, 1, 0.0)
        .rewards(rewards(&[1.0, 1.0, 5.0, 9.0, 9.0]))
        .dones(dones(&[false, false, true, false, true]));
    let mut env = ScriptedVecEnv::build(&config, 0)?;
    let mut policy = ConstantPolicy::new(1, 0.0);

    let result = EpisodeStepper::new(&mut env, &IdentityEncoder, &mut policy, 5, 1)?.run_episode()?;

    assert_eq!(result.done_at, array![3usize]);
    assert_eq!(result.returns, array![7.0f32]);
    Ok(())
}

#[test]
fn test_never_done_sums_all_rewards() -> Result<()> {
    let config = ScriptedVecEnvConfig::constant_reward(2, 1, 0.0)
        .rewards(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
    let mut env = ScriptedVecEnv::build(&config, 0)?;
    let mut policy = ConstantPolicy::new(1, 0.0);

    let result = EpisodeStepper::new(&mut env, &IdentityEncoder, &mut policy, 3, 1)?.run_episode()?;

    assert_eq!(result.done_at, array![0usize, 0]);
    assert_eq!(result.returns, array![9.0f32, 12.0]);
    Ok(())
}

#[test]
fn test_done_at_stays_within_budget() -> Result<()> {
    let n_envs = 7;
    for n_steps in 1..=6 {
        // Instance k reports done at every step t with (t + 1) % (k + 1) == 0.
        let script: Vec<Vec<bool>> = (0..n_steps + 2)
            .map(|t| (0..n_envs).map(|k| (t + 1) % (k + 1) == 0).collect::<Vec<_>>())
            .collect();
        let config = ScriptedVecEnvConfig::constant_reward(n_envs, 2, 1.0).dones(script);
        let mut env = ScriptedVecEnv::build(&config, 0)?;
        let mut policy = ConstantPolicy::new(1, 0.0);

        let result = EpisodeStepper::new(&mut env, &IdentityEncoder, &mut policy, n_steps, 1)?
            .run_episode()?;

        for k in 0..n_envs {
            let d = result.done_at[k];
            assert!(d <= n_steps);
            if k < n_steps {
                assert_eq!(d, k + 1);
                assert_eq!(result.returns[k], (k + 1) as f32);
            } else {
                assert_eq!(d, 0);
                assert_eq!(result.returns[k], n_steps as f32);
            }
        }
    }
    Ok(())
}

#[test]
fn test_trajectories_have_final_snapshot() -> Result<()> {
    let config = ScriptedVecEnvConfig::constant_reward(3, 2, 1.0).act_dim(2);
    let mut env = ScriptedVecEnv::build(&config, 0)?;
    let mut policy = CountingPolicy::new(2);

    let result = EpisodeStepper::new(&mut env, &IdentityEncoder, &mut policy, 4, 3)?.run_episode()?;

    assert_eq!(result.obs_traj.shape(), &[3, 5, 2]);
    assert_eq!(result.act_traj.shape(), &[3, 5, 2]);
    // Entry t is the observation before step t + 1; the last one follows step 4.
    assert_eq!(
        result.obs_traj.slice(s![0, .., 0]),
        array![0.0f32, 1.0, 2.0, 3.0, 4.0]
    );
    assert_eq!(result.obs_traj.slice(s![2, .., 1]), Array1::from_elem(5, 2.0f32));
    assert_eq!(result.act_traj.slice(s![1, .., 1]), result.obs_traj.slice(s![1, .., 0]));
    assert_eq!(policy.n_acts, 5);
    Ok(())
}

#[test]
fn test_rolling_context_is_reset_every_episode() -> Result<()> {
    let env = ScriptedVecEnv::build(&ScriptedVecEnvConfig::constant_reward(2, 1, 0.0), 0)?;
    let config = VecEvalConfig::default().n_episodes(3).n_steps(4).window_size(2);
    let mut policy = CountingPolicy::new(1);
    let mut recorder = BufferedRecorder::new();

    VecEvaluator::new(env, IdentityEncoder, &config)?.run(&mut policy, &mut recorder)?;

    assert_eq!(policy.n_resets, 3);
    assert_eq!(policy.context().capacity(), 2);
    assert_eq!(policy.context_lens, [1, 2, 2, 2, 2].repeat(3));
    Ok(())
}

#[test]
fn test_action_shape_mismatch_aborts() -> Result<()> {
    let config = ScriptedVecEnvConfig::constant_reward(2, 1, 0.0).act_dim(2);
    let mut env = ScriptedVecEnv::build(&config, 0)?;
    let mut policy = ConstantPolicy::new(3, 0.0);

    let err = EpisodeStepper::new(&mut env, &IdentityEncoder, &mut policy, 3, 1)?
        .run_episode()
        .unwrap_err();

    match err.downcast_ref::<EvalError>() {
        Some(EvalError::ActionShape { expected, actual }) => {
            assert_eq!(expected, &vec![2, 2]);
            assert_eq!(actual, &vec![2, 3]);
        }
        _ => panic!("unexpected error: {:?}", err),
    }
    Ok(())
}

#[test]
fn test_invalid_preconditions() -> Result<()> {
    let mut env = ScriptedVecEnv::build(&ScriptedVecEnvConfig::constant_reward(0, 1, 0.0), 0)?;
    let mut policy = ConstantPolicy::new(1, 0.0);
    assert!(matches!(
        EpisodeStepper::new(&mut env, &IdentityEncoder, &mut policy, 3, 1),
        Err(EvalError::EmptyBatch)
    ));

    let mut env = ScriptedVecEnv::build(&ScriptedVecEnvConfig::constant_reward(1, 1, 0.0), 0)?;
    assert!(matches!(
        EpisodeStepper::new(&mut env, &IdentityEncoder, &mut policy, 0, 1),
        Err(EvalError::InvalidConfig(_))
    ));
    Ok(())
}

#[test]
fn test_env_failure_is_fatal_and_closes_env() -> Result<()> {
    let config = ScriptedVecEnvConfig::constant_reward(2, 1, 0.0).fail_at_step(2);
    let env = ScriptedVecEnv::build(&config, 0)?;
    let closed = env.closed_flag();
    let eval_config = VecEvalConfig::default().n_episodes(2).n_steps(3);
    let mut policy = ConstantPolicy::new(1, 0.0);
    let mut recorder = BufferedRecorder::new();

    let err = VecEvaluator::new(env, IdentityEncoder, &eval_config)?
        .run(&mut policy, &mut recorder)
        .unwrap_err();

    assert!(err.to_string().contains("Scripted failure"));
    assert!(recorder.is_empty());
    assert!(closed.get());
    Ok(())
}
