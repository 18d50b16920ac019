use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use vecroll_core::record::{NullRecorder, Recorder};
use vecroll_pointmass::EvalRunConfig;
use vecroll_tensorboard::TensorboardRecorder;

/// Evaluate a deterministic policy on a batch of point-mass environments
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Evaluation config in YAML. Defaults are used if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the output directory of the config.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Write statistics for TensorBoard into `<out_dir>/tensorboard`
    #[arg(long, default_value_t = false)]
    tensorboard: bool,

    /// Plot trajectories even if the config disables it
    #[arg(long, default_value_t = false)]
    plot: bool,

    /// Random seed of the environment batch
    #[arg(long, default_value_t = 42)]
    seed: i64,
}

fn config(args: &Args) -> Result<EvalRunConfig> {
    let mut config = match &args.config {
        Some(path) => EvalRunConfig::load(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => EvalRunConfig::default(),
    };
    if let Some(out_dir) = &args.out_dir {
        config = config.out_dir(out_dir.clone());
    }
    if args.plot {
        config = config.plot_trajectories(true);
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = config(&args)?;
    info!("{:?}", config);

    let mut recorder: Box<dyn Recorder> = if args.tensorboard {
        Box::new(TensorboardRecorder::new(config.out_dir.join("tensorboard")))
    } else {
        Box::new(NullRecorder {})
    };
    let result = vecroll_pointmass::run(&config, args.seed, &mut recorder)?;

    for key in [
        "overall/mean_return",
        "overall/std_return",
        "overall/avg_episode_length",
        "overall/std_episode_length",
    ]
    .iter()
    {
        info!("{}: {}", key, result.stats.get_scalar(key)?);
    }
    Ok(())
}
