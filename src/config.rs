//! Contest rules and search parameters, loaded from YAML.
//!
//! ```
//! use lineup_optimizer::config::OptimizerConfig;
//!
//! let config = OptimizerConfig::from_yaml_str(r#"
//! rules:
//!   salary_cap: 50000
//! search:
//!   attempts_per_lineup: 5
//! "#).unwrap();
//!
//! assert_eq!(config.rules.salary_cap, 50000);
//! assert_eq!(config.rules.roster_size, 9);
//! assert_eq!(config.search.attempts_per_lineup, 5);
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::player::Position;

pub const CONFIG_PATH_ENV: &str = "LINEUP_OPTIMIZER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/optimizer.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Salary cap, roster size and per-position minimums of a contest (FanDuel NBA by default).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContestRules {
    pub salary_cap: u32,
    pub roster_size: u32,
    pub position_minimums: BTreeMap<Position, u32>,
}

impl Default for ContestRules {
    fn default() -> Self {
        Self {
            salary_cap: 60_000,
            roster_size: 9,
            position_minimums: BTreeMap::from([
                (Position::PointGuard, 2),
                (Position::ShootingGuard, 2),
                (Position::SmallForward, 2),
                (Position::PowerForward, 2),
                (Position::Center, 1),
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Solve attempts granted per requested lineup (attempt budget = lineups * this).
    pub attempts_per_lineup: usize,
    /// Exclusion subsets of the best lineup solved in parallel before the random walk.
    /// Zero disables the batch.
    pub exploratory_batch: usize,
    /// Worker threads for the exploratory batch. Zero uses every core.
    pub workers: usize,
    /// Fixed seed for exclusion sampling; requests may override it.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            attempts_per_lineup: 3,
            exploratory_batch: 0,
            workers: 0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub rules: ContestRules,
    pub search: SearchConfig,
}

impl OptimizerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Explicit path, else `LINEUP_OPTIMIZER_CONFIG`, else `config/optimizer.yaml`.
    /// Only the implicit default path may be absent; defaults are used then.
    pub fn resolve(explicit: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::load(path);
        }
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            return Self::load(DEFAULT_CONFIG_PATH);
        }
        tracing::debug!("no optimizer config found, using defaults");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let rules = &self.rules;
        if rules.roster_size == 0 {
            return Err(ConfigError::Invalid("roster_size must be positive".into()));
        }
        if rules.salary_cap == 0 {
            return Err(ConfigError::Invalid("salary_cap must be positive".into()));
        }
        let required: u32 = rules.position_minimums.values().sum();
        if required > rules.roster_size {
            return Err(ConfigError::Invalid(format!(
                "position minimums require {required} players but roster_size is {}",
                rules.roster_size
            )));
        }
        if self.search.attempts_per_lineup == 0 {
            return Err(ConfigError::Invalid(
                "attempts_per_lineup must be positive".into(),
            ));
        }
        Ok(())
    }
}
