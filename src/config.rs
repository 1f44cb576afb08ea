use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::quiz::DEFAULT_SAMPLE_SIZE;

const APP_DIR: &str = "category-quiz";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    #[serde(default = "default_transition_delay_ms")]
    pub transition_delay_ms: u64,
    #[serde(default)]
    pub shuffle_small_pools: bool,
    #[serde(default)]
    pub questions_path: Option<PathBuf>,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}
fn default_transition_delay_ms() -> u64 {
    220
}
fn default_log_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("quiz.log")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            transition_delay_ms: default_transition_delay_ms(),
            shuffle_small_pools: false,
            questions_path: None,
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// Loads `path`, or the default location when `None`. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map_or_else(Self::config_path, Path::to_path_buf);
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.normalize();
        Ok(config)
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// A sample size of zero would make every run empty.
    pub fn normalize(&mut self) {
        if self.sample_size == 0 {
            self.sample_size = default_sample_size();
        }
    }

    pub fn settings(&self) -> QuizSettings {
        QuizSettings {
            sample_size: self.sample_size,
            shuffle_small_pools: self.shuffle_small_pools,
            transition_delay: Duration::from_millis(self.transition_delay_ms),
        }
    }
}

/// The part of the configuration the quiz controller needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizSettings {
    pub sample_size: usize,
    pub shuffle_small_pools: bool,
    pub transition_delay: Duration,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Config::default().settings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("config.toml"))).unwrap();
        assert_eq!(config.sample_size, 10);
        assert_eq!(config.transition_delay_ms, 220);
        assert!(!config.shuffle_small_pools);
        assert!(config.questions_path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "sample_size = 5\nshuffle_small_pools = true\nquestions_path = \"bank.json\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.sample_size, 5);
        assert!(config.shuffle_small_pools);
        assert_eq!(config.questions_path, Some(PathBuf::from("bank.json")));
        assert_eq!(config.transition_delay_ms, 220);

        let settings = config.settings();
        assert_eq!(settings.transition_delay, Duration::from_millis(220));
    }

    #[test]
    fn test_zero_sample_size_is_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "sample_size = 0\n").unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap().sample_size, 10);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "sample_size = \"ten\"\n").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config"));
    }
}
