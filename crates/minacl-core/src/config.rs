//! Run configuration.
//!
//! A [`Config`] is read from an optional TOML file; every field has a
//! default so a partial (or absent) file is valid. The CLI layers flag and
//! environment overrides on top of the loaded value.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Default maximum number of hops in an enumerated path.
pub const DEFAULT_MAX_HOP_LENGTH: usize = 5;

/// Default solver wall-clock limit (one hour).
pub const DEFAULT_SOLVER_TIME_LIMIT_SECS: u64 = 3600;

/// Default weight of the permit count in the weighted objective.
pub const DEFAULT_PERMIT_WEIGHT: f64 = 0.01;

/// Upper bound on automatically chosen enumeration workers.
pub const MAX_DEFAULT_WORKERS: usize = 8;

/// How the two-level preference (fewest denies, then fewest permits) is
/// expressed to the solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveStrategy {
    /// Minimize denies, fix that count, then minimize permits.
    #[default]
    Lexicographic,
    /// Minimize `denies + permit_weight * permits` in a single solve.
    Weighted,
}

impl fmt::Display for ObjectiveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexicographic => write!(f, "lexicographic"),
            Self::Weighted => write!(f, "weighted"),
        }
    }
}

impl FromStr for ObjectiveStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexicographic" | "lex" => Ok(Self::Lexicographic),
            "weighted" => Ok(Self::Weighted),
            other => Err(Error::config(format!(
                "unknown objective strategy '{other}' (expected 'lexicographic' or 'weighted')"
            ))),
        }
    }
}

/// Options recognized by the pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Longest path (in edges) considered when enumerating patterns.
    pub max_hop_length: usize,
    /// Wall-clock limit for the whole optimization, in seconds.
    pub solver_time_limit_secs: u64,
    /// Weight of the permit count under [`ObjectiveStrategy::Weighted`].
    pub permit_weight: f64,
    /// Objective formulation.
    pub objective: ObjectiveStrategy,
    /// Whether walks may revisit nodes already on the walk.
    pub allow_revisits: bool,
    /// Enumeration workers; `None` picks from available parallelism.
    pub workers: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_hop_length: DEFAULT_MAX_HOP_LENGTH,
            solver_time_limit_secs: DEFAULT_SOLVER_TIME_LIMIT_SECS,
            permit_weight: DEFAULT_PERMIT_WEIGHT,
            objective: ObjectiveStrategy::default(),
            allow_revisits: true,
            workers: None,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.permit_weight.is_finite() || self.permit_weight <= 0.0 {
            return Err(Error::config(format!(
                "permit_weight must be a positive finite number, got {}",
                self.permit_weight
            )));
        }
        if self.workers == Some(0) {
            return Err(Error::config("workers must be at least 1"));
        }
        Ok(())
    }

    /// Number of enumeration workers to use.
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(1)
                .min(MAX_DEFAULT_WORKERS)
        })
    }
}
