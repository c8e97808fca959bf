//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap, including the
//! field-range validation that must reject a bad submission before it ever
//! reaches the record store.

use crate::config::Config;
use crate::models::{Period, PeriodGranularity};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// RetailBench - cluster data entry and weighted roll-up reporting
///
/// Cluster managers submit weekly/monthly performance figures; the tool
/// rolls them up into store- and revenue-weighted company benchmarks and
/// tracks which clusters are still pending for a period.
///
/// Examples:
///   retailbench submit --year 2025 --week 31 --cluster "North 1" \
///       --company "Reliance Retail" --stores 42 --area 1.2 \
///       --revenue-per-store 5.5 --margin-per-store 0.8 --bills 1200 --abv 450
///   retailbench report --year 2025 --week 31
///   retailbench headoffice --credential headoffice --year 2025 --week 31
///   retailbench init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    ///
    /// If not specified, looks for retailbench.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Override the submission table location
    #[arg(long, value_name = "FILE", global = true)]
    pub data_file: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// The operation to perform.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Submit one cluster's figures for a period
    Submit(SubmitArgs),

    /// Render the aggregated benchmark view
    Report(ReportArgs),

    /// Render the credential-gated head-office view
    Headoffice(HeadofficeArgs),

    /// Generate a default retailbench.toml configuration file
    InitConfig,
}

/// Arguments for `submit`.
#[derive(clap::Args, Debug, Clone)]
pub struct SubmitArgs {
    /// Reporting year
    #[arg(long, value_name = "YEAR")]
    pub year: i32,

    /// Reporting week, 1-53 (weekly deployments)
    #[arg(long, value_name = "WEEK", conflicts_with = "month")]
    pub week: Option<u32>,

    /// Reporting month, 1-12 (monthly deployments)
    #[arg(long, value_name = "MONTH")]
    pub month: Option<u32>,

    /// Cluster name
    #[arg(long)]
    pub cluster: String,

    /// Company the figures belong to
    #[arg(long)]
    pub company: String,

    /// Total number of stores
    #[arg(long, default_value = "0")]
    pub stores: u32,

    /// Retail area (mn sq. ft.)
    #[arg(long, default_value = "0")]
    pub area: f64,

    /// Revenue per store (Rs. crore)
    #[arg(long, default_value = "0", value_name = "CRORE")]
    pub revenue_per_store: f64,

    /// Margin per store (Rs. crore)
    #[arg(long, default_value = "0", value_name = "CRORE")]
    pub margin_per_store: f64,

    /// Net store additions (may be negative)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub net_additions: i64,

    /// LFL growth in revenue (%), between -100 and 100
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub lfl: f64,

    /// Number of bills per store
    #[arg(long, default_value = "0")]
    pub bills: u32,

    /// Average bill value (Rs.)
    #[arg(long, default_value = "0")]
    pub abv: f64,
}

/// Period filter shared by the reporting views.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PeriodFilterArgs {
    /// Filter to a reporting year
    #[arg(long)]
    pub year: Option<i32>,

    /// Filter to a week of the year (weekly deployments)
    #[arg(long, requires = "year", conflicts_with = "month")]
    pub week: Option<u32>,

    /// Filter to a month of the year (monthly deployments)
    #[arg(long, requires = "year")]
    pub month: Option<u32>,
}

/// Arguments for `report`.
#[derive(clap::Args, Debug, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub period: PeriodFilterArgs,

    /// Filter to a single cluster
    #[arg(long)]
    pub cluster: Option<String>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,
}

/// Arguments for `headoffice`.
#[derive(clap::Args, Debug, Clone)]
pub struct HeadofficeArgs {
    /// Head-office credential
    ///
    /// Can also be set via the RETAILBENCH_CREDENTIAL env var. Leaving it
    /// empty shows neither the view nor a rejection.
    #[arg(
        long,
        env = "RETAILBENCH_CREDENTIAL",
        default_value = "",
        hide_env_values = true
    )]
    pub credential: String,

    #[command(flatten)]
    pub period: PeriodFilterArgs,

    /// Filter to a single cluster
    #[arg(long)]
    pub cluster: Option<String>,

    /// Write the rendered view to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,
}

/// Output format for the rendered views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the config-independent parts of the arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

impl SubmitArgs {
    /// Build the reporting period, checking granularity agreement.
    pub fn period(&self, granularity: PeriodGranularity) -> Result<Period, String> {
        match granularity {
            PeriodGranularity::Year => {
                if self.week.is_some() || self.month.is_some() {
                    return Err("This deployment reports yearly; drop --week/--month".to_string());
                }
                Ok(Period::Year(self.year))
            }
            PeriodGranularity::Week => match self.week {
                Some(week) => Ok(Period::Week { year: self.year, week }),
                None => Err("This deployment reports weekly; --week is required".to_string()),
            },
            PeriodGranularity::Month => match self.month {
                Some(month) => Ok(Period::Month { year: self.year, month }),
                None => Err("This deployment reports monthly; --month is required".to_string()),
            },
        }
    }

    /// Validate every field against its declared range and the deployment
    /// configuration. A submission failing here is never persisted.
    pub fn validate(&self, config: &Config) -> Result<(), String> {
        self.period(config.benchmark.granularity)?;

        if !config.benchmark.years.contains(&self.year) {
            return Err(format!(
                "Year {} is not accepted; valid years: {:?}",
                self.year, config.benchmark.years
            ));
        }

        if let Some(week) = self.week {
            if !(1..=53).contains(&week) {
                return Err(format!("Week must be between 1 and 53, got {}", week));
            }
        }

        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(format!("Month must be between 1 and 12, got {}", month));
            }
        }

        if self.cluster.trim().is_empty() {
            return Err("Cluster name must not be empty".to_string());
        }

        if config.benchmark.restrict_clusters
            && !config.benchmark.clusters.contains(&self.cluster)
        {
            return Err(format!(
                "Unknown cluster '{}'; expected one of: {}",
                self.cluster,
                config.benchmark.clusters.join(", ")
            ));
        }

        if !config.benchmark.companies.contains(&self.company) {
            return Err(format!(
                "Unknown company '{}'; expected one of: {}",
                self.company,
                config.benchmark.companies.join(", ")
            ));
        }

        for (name, value) in [
            ("Retail area", self.area),
            ("Revenue per store", self.revenue_per_store),
            ("Margin per store", self.margin_per_store),
            ("Average bill value", self.abv),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, value));
            }
        }

        if !self.lfl.is_finite() || !(-100.0..=100.0).contains(&self.lfl) {
            return Err(format!(
                "LFL growth must be between -100 and 100, got {}",
                self.lfl
            ));
        }

        Ok(())
    }
}

impl PeriodFilterArgs {
    /// Build the optional period filter, checking granularity agreement.
    pub fn period(&self, granularity: PeriodGranularity) -> Result<Option<Period>, String> {
        let Some(year) = self.year else {
            return Ok(None);
        };

        match granularity {
            PeriodGranularity::Year => {
                if self.week.is_some() || self.month.is_some() {
                    return Err("This deployment reports yearly; drop --week/--month".to_string());
                }
                Ok(Some(Period::Year(year)))
            }
            PeriodGranularity::Week => match self.week {
                Some(week) if (1..=53).contains(&week) => Ok(Some(Period::Week { year, week })),
                Some(week) => Err(format!("Week must be between 1 and 53, got {}", week)),
                None => {
                    Err("This deployment reports weekly; filter with --year and --week".to_string())
                }
            },
            PeriodGranularity::Month => match self.month {
                Some(month) if (1..=12).contains(&month) => {
                    Ok(Some(Period::Month { year, month }))
                }
                Some(month) => Err(format!("Month must be between 1 and 12, got {}", month)),
                None => Err(
                    "This deployment reports monthly; filter with --year and --month".to_string(),
                ),
            },
        }
    }
}
