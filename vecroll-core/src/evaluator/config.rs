//! Configuration of [`VecEvaluator`](super::VecEvaluator).
use crate::error::EvalError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`VecEvaluator`](super::VecEvaluator).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct VecEvalConfig {
    /// The number of episodes `M`.
    pub n_episodes: usize,

    /// The number of environment steps `T` per episode.
    pub n_steps: usize,

    /// Capacity of the policy's rolling context.
    pub window_size: usize,
}

impl Default for VecEvalConfig {
    fn default() -> Self {
        Self {
            n_episodes: 10,
            n_steps: 100,
            window_size: 1,
        }
    }
}

impl VecEvalConfig {
    /// Sets the number of episodes.
    pub fn n_episodes(mut self, v: usize) -> Self {
        self.n_episodes = v;
        self
    }

    /// Sets the number of steps per episode.
    pub fn n_steps(mut self, v: usize) -> Self {
        self.n_steps = v;
        self
    }

    /// Sets the capacity of the rolling context.
    pub fn window_size(mut self, v: usize) -> Self {
        self.window_size = v;
        self
    }

    /// Checks that every count is positive.
    pub fn validate(&self) -> Result<(), EvalError> {
        let fields = [
            ("n_episodes", self.n_episodes),
            ("n_steps", self.n_steps),
            ("window_size", self.window_size),
        ];
        for (name, v) in fields.iter() {
            if *v == 0 {
                return Err(EvalError::InvalidConfig(format!("{} must be positive", name)));
            }
        }
        Ok(())
    }

    /// Constructs [`VecEvalConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`VecEvalConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_vec_eval_config() -> Result<()> {
        let config = VecEvalConfig::default()
            .n_episodes(3)
            .n_steps(250)
            .window_size(10);

        let dir = TempDir::new("vec_eval_config")?;
        let path = dir.path().join("vec_eval_config.yaml");
        config.save(&path)?;
        let config_ = VecEvalConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_validate_rejects_zero_steps() {
        let config = VecEvalConfig::default().n_steps(0);
        assert!(matches!(config.validate(), Err(EvalError::InvalidConfig(_))));
        assert!(VecEvalConfig::default().validate().is_ok());
    }
}
