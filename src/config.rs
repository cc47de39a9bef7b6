//! Configuration management
//!
//! Learning constants and run settings, loaded once from TOML before the
//! loop starts and validated into a [`RunPlan`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::learning::LearningParams;
use crate::types::{Action, ActionSet};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Learning constants and action set
    #[serde(default)]
    pub learning: LearningConfig,
    /// Loop length, reporting and pacing
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Ordered action set; order breaks ties between equal estimates
    #[serde(default = "default_actions")]
    pub actions: Vec<Action>,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_discount_factor")]
    pub discount_factor: f64,
    #[serde(default = "default_explore_rate")]
    pub explore_rate: f64,
}

fn default_actions() -> Vec<Action> {
    Action::ALL.to_vec()
}

fn default_learning_rate() -> f64 {
    0.1
}

fn default_discount_factor() -> f64 {
    0.9
}

fn default_explore_rate() -> f64 {
    0.1
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            actions: default_actions(),
            learning_rate: default_learning_rate(),
            discount_factor: default_discount_factor(),
            explore_rate: default_explore_rate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_iteration_count")]
    pub iteration_count: u64,
    /// Print a progress line every this many iterations
    #[serde(default = "default_report_interval")]
    pub report_interval: u64,
    /// Seed for exploration and the simulated sensor; random when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Pause after each iteration (milliseconds)
    #[serde(default)]
    pub step_delay_ms: u64,
    /// Points kept for plotting consumers
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

fn default_iteration_count() -> u64 {
    100
}

fn default_report_interval() -> u64 {
    10
}

fn default_history_capacity() -> usize {
    1000
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iteration_count: default_iteration_count(),
            report_interval: default_report_interval(),
            seed: None,
            step_delay_ms: 0,
            history_capacity: default_history_capacity(),
        }
    }
}

/// Everything a run needs, with every constant checked
#[derive(Debug, Clone, PartialEq)]
pub struct RunPlan {
    pub actions: ActionSet,
    pub params: LearningParams,
    pub iteration_count: u64,
    pub report_interval: u64,
    pub seed: Option<u64>,
    pub step_delay: Duration,
    pub history_capacity: usize,
}

impl Config {
    /// Load from the default location, falling back to defaults if absent
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let path = config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Check every constant and build the run plan
    pub fn validate(&self) -> Result<RunPlan, ConfigError> {
        let l = &self.learning;
        // negated comparisons also reject NaN
        if !(l.learning_rate > 0.0 && l.learning_rate <= 1.0) {
            return Err(ConfigError::LearningRate(l.learning_rate));
        }
        if !(l.discount_factor > 0.0 && l.discount_factor <= 1.0) {
            return Err(ConfigError::DiscountFactor(l.discount_factor));
        }
        if !(0.0..=1.0).contains(&l.explore_rate) {
            return Err(ConfigError::ExploreRate(l.explore_rate));
        }

        let r = &self.run;
        if r.iteration_count == 0 {
            return Err(ConfigError::IterationCount);
        }
        if r.report_interval == 0 {
            return Err(ConfigError::ReportInterval);
        }
        if r.history_capacity == 0 {
            return Err(ConfigError::HistoryCapacity);
        }

        Ok(RunPlan {
            actions: ActionSet::new(l.actions.clone())?,
            params: LearningParams {
                learning_rate: l.learning_rate,
                discount_factor: l.discount_factor,
                explore_rate: l.explore_rate,
            },
            iteration_count: r.iteration_count,
            report_interval: r.report_interval,
            seed: r.seed,
            step_delay: Duration::from_millis(r.step_delay_ms),
            history_capacity: r.history_capacity,
        })
    }
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "byteq", "byteq")
        .context("Failed to get project directories")?;
    Ok(base.config_dir().join("config.toml"))
}

/// Print the effective configuration
pub fn show_config(config: &Config) -> Result<()> {
    let l = &config.learning;
    let r = &config.run;
    let actions: Vec<&str> = l.actions.iter().map(|a| a.as_str()).collect();

    println!("Learning:");
    println!("  actions:          {}", actions.join(", "));
    println!("  learning_rate:    {}", l.learning_rate);
    println!("  discount_factor:  {}", l.discount_factor);
    println!("  explore_rate:     {}", l.explore_rate);
    println!("Run:");
    println!("  iteration_count:  {}", r.iteration_count);
    println!("  report_interval:  {}", r.report_interval);
    println!("  seed:             {}", r.seed.map(|s| s.to_string()).unwrap_or_else(|| "random".to_string()));
    println!("  step_delay_ms:    {}", r.step_delay_ms);
    println!("  history_capacity: {}", r.history_capacity);

    match config.validate() {
        Ok(_) => println!("\nConfiguration is valid."),
        Err(e) => println!("\nConfiguration is INVALID: {}", e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let plan = Config::default().validate().unwrap();
        assert_eq!(plan.actions, ActionSet::default());
        assert_eq!(plan.params, LearningParams::default());
        assert_eq!(plan.iteration_count, 100);
        assert_eq!(plan.report_interval, 10);
        assert_eq!(plan.step_delay, Duration::ZERO);
    }

    #[test]
    fn test_rejects_out_of_range_rates() {
        let mut config = Config::default();
        config.learning.explore_rate = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::ExploreRate(1.5)));

        let mut config = Config::default();
        config.learning.learning_rate = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::LearningRate(0.0)));

        let mut config = Config::default();
        config.learning.discount_factor = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::DiscountFactor(_))));

        let mut config = Config::default();
        config.learning.learning_rate = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::LearningRate(1.5)));

        let mut config = Config::default();
        config.learning.discount_factor = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::DiscountFactor(0.0)));

        let mut config = Config::default();
        config.learning.discount_factor = 1.2;
        assert_eq!(config.validate(), Err(ConfigError::DiscountFactor(1.2)));

        let mut config = Config::default();
        config.learning.explore_rate = -0.1;
        assert_eq!(config.validate(), Err(ConfigError::ExploreRate(-0.1)));
    }

    #[test]
    fn test_upper_bounds_are_inclusive() {
        let mut config = Config::default();
        config.learning.learning_rate = 1.0;
        config.learning.discount_factor = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explore_rate_bounds_are_inclusive() {
        let mut config = Config::default();
        config.learning.explore_rate = 0.0;
        assert!(config.validate().is_ok());
        config.learning.explore_rate = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_counts() {
        let mut config = Config::default();
        config.run.iteration_count = 0;
        assert_eq!(config.validate(), Err(ConfigError::IterationCount));

        let mut config = Config::default();
        config.run.report_interval = 0;
        assert_eq!(config.validate(), Err(ConfigError::ReportInterval));

        let mut config = Config::default();
        config.run.history_capacity = 0;
        assert_eq!(config.validate(), Err(ConfigError::HistoryCapacity));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [learning]
            actions = ["sub", "xor"]
            explore_rate = 0.0

            [run]
            seed = 42
            "#,
        )
        .unwrap();
        let plan = config.validate().unwrap();
        assert_eq!(plan.actions.as_slice(), &[Action::Sub, Action::Xor]);
        assert_eq!(plan.params.learning_rate, 0.1);
        assert_eq!(plan.params.explore_rate, 0.0);
        assert_eq!(plan.seed, Some(42));
        assert_eq!(plan.iteration_count, 100);
    }

    #[test]
    fn test_unknown_action_fails_to_parse() {
        let parsed: Result<Config, _> = toml::from_str("[learning]\nactions = [\"rot13\"]\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.run.iteration_count = 7;
        config.learning.actions = vec![Action::Add];
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.run.iteration_count, 7);
        assert_eq!(loaded.learning.actions, vec![Action::Add]);
    }
}
