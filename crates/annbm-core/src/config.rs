//! `AnnBm` Configuration Module
//!
//! Provides configuration file support via `annbm.toml` and environment
//! variables.
//!
//! # Priority (highest to lowest)
//!
//! 1. Environment variables (`ANNBM_*`, sections separated by `__`,
//!    e.g. `ANNBM_HNSW__MAX_LINKS=32`)
//! 2. Configuration file (`annbm.toml`)
//! 3. Default values

use crate::distance::DistanceMetric;
use crate::index::hnsw::HnswIndexParams;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key that failed validation.
        key: String,
        /// Validation error message.
        message: String,
    },
}

/// HNSW construction section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HnswConfig {
    /// Maximum links per node per layer.
    pub max_links: usize,
    /// Candidate list size while inserting.
    pub neighbors_to_explore: usize,
    /// Distance metric.
    pub distance_metric: DistanceMetric,
    /// Allow concurrent writers on distinct identifiers.
    pub multi_threaded: bool,
    /// Use the diversity heuristic for neighbor selection.
    pub heuristic_select_neighbors: bool,
    /// Link budget at layer 0 (unset = `max_links`).
    pub max_links_at_level_0: Option<usize>,
    /// Seed for level assignment.
    pub level_seed: Option<u64>,
}

impl Default for HnswConfig {
    fn default() -> Self {
        let params = HnswIndexParams::default();
        Self {
            max_links: params.max_links,
            neighbors_to_explore: params.neighbors_to_explore,
            distance_metric: params.distance_metric,
            multi_threaded: params.multi_threaded,
            heuristic_select_neighbors: params.heuristic_select_neighbors,
            max_links_at_level_0: params.max_links_at_level_0,
            level_seed: params.level_seed,
        }
    }
}

/// Search defaults section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Extra beam width on top of `k` for default searches.
    pub extra_exploration: usize,
    /// Default distance cutoff (inclusive).
    pub max_distance: f64,
    /// Apply the final `(distance, lid)` sort.
    pub enable_sort: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            extra_exploration: 200,
            max_distance: f64::MAX,
            enable_sort: true,
        }
    }
}

impl SearchConfig {
    /// Beam width used for a default search returning `k` hits.
    #[must_use]
    pub fn exploration_budget(&self, k: usize) -> usize {
        k.saturating_add(self.extra_exploration)
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace.
    pub level: String,
    /// Log format: text or json.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Main `AnnBm` configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnnBmConfig {
    /// HNSW index configuration.
    pub hnsw: HnswConfig,
    /// Search defaults.
    pub search: SearchConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl AnnBmConfig {
    /// Loads configuration from default sources.
    ///
    /// Priority: defaults < file < environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("annbm.toml")
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file is not an error: defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("ANNBM_").split("__"));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Creates a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml_str));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((field, message)) = self.index_params().invalid_field() {
            return Err(ConfigError::InvalidValue {
                key: format!("hnsw.{field}"),
                message,
            });
        }

        let max_distance = self.search.max_distance;
        if max_distance.is_nan()
            || (max_distance < 0.0 && !self.hnsw.distance_metric.allows_negative_distance())
        {
            return Err(ConfigError::InvalidValue {
                key: "search.max_distance".to_string(),
                message: format!(
                    "value {max_distance} is invalid for metric {}",
                    self.hnsw.distance_metric
                ),
            });
        }

        // Validate logging level
        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.format".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        Ok(())
    }

    /// Builds index parameters from the `hnsw` section.
    #[must_use]
    pub fn index_params(&self) -> HnswIndexParams {
        let hnsw = &self.hnsw;
        HnswIndexParams {
            max_links: hnsw.max_links,
            neighbors_to_explore: hnsw.neighbors_to_explore,
            distance_metric: hnsw.distance_metric,
            multi_threaded: hnsw.multi_threaded,
            max_links_at_level_0: hnsw.max_links_at_level_0,
            heuristic_select_neighbors: hnsw.heuristic_select_neighbors,
            level_seed: hnsw.level_seed,
        }
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
