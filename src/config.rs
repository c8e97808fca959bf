//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `retailbench.toml` files. Company lists, expected clusters, valid
//! periods, and the head-office credential are deployment constants
//! supplied here, not runtime state.

use crate::models::PeriodGranularity;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Benchmark deployment settings.
    #[serde(default)]
    pub benchmark: BenchmarkConfig,

    /// Head-office view settings.
    #[serde(default)]
    pub headoffice: HeadofficeConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Path of the persisted submission table.
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Default output file path for generated reports.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_data_file() -> String {
    "cluster_inputs.csv".to_string()
}

fn default_output() -> String {
    "benchmark_report.md".to_string()
}

/// Benchmark deployment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Companies a submission may report on.
    #[serde(default = "default_companies")]
    pub companies: Vec<String>,

    /// Clusters expected to report each period.
    #[serde(default = "default_clusters")]
    pub clusters: Vec<String>,

    /// Reject submissions whose cluster is not in the expected list.
    #[serde(default)]
    pub restrict_clusters: bool,

    /// Period granularity of this deployment.
    #[serde(default = "default_granularity")]
    pub granularity: PeriodGranularity,

    /// Years a submission may report on.
    #[serde(default = "default_years")]
    pub years: Vec<i32>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            companies: default_companies(),
            clusters: default_clusters(),
            restrict_clusters: false,
            granularity: default_granularity(),
            years: default_years(),
        }
    }
}

fn default_companies() -> Vec<String> {
    vec!["Reliance Retail", "Competitor 1", "Competitor 2"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_clusters() -> Vec<String> {
    vec!["East 1", "North 1", "North 2", "South 1", "South 2", "West 1"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_granularity() -> PeriodGranularity {
    PeriodGranularity::Week
}

fn default_years() -> Vec<i32> {
    vec![2024, 2025, 2026]
}

/// Head-office view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadofficeConfig {
    /// Shared credential gating the head-office view.
    ///
    /// A visibility toggle, not an authentication system: compared as a
    /// plain string, no hashing, no sessions, no lockout.
    #[serde(default = "default_credential")]
    pub credential: String,
}

impl Default for HeadofficeConfig {
    fn default() -> Self {
        Self {
            credential: default_credential(),
        }
    }
}

fn default_credential() -> String {
    "headoffice".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new("retailbench.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data_file) = args.data_file {
            self.general.data_file = data_file.display().to_string();
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
