//! RetailBench - Retail Benchmark Data Collection
//!
//! A CLI tool for collecting cluster-level retail performance submissions
//! and rolling them up into store- and revenue-weighted company benchmarks
//! for a head-office view.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (rejected submission, corrupt table, config failure, etc.)
//!   2 - Head-office credential rejected

mod analysis;
mod cli;
mod config;
mod gate;
mod models;
mod report;
mod store;

use analysis::{aggregate_by_company, aggregate_by_period, filter_rows, submission_status, RowFilter};
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, Command, HeadofficeArgs, ReportArgs, SubmitArgs};
use config::Config;
use gate::{AccessGate, GateOutcome};
use models::{BenchmarkReport, ReportMetadata, Submission};
use std::path::PathBuf;
use store::RecordStore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if matches!(args.command, Command::InitConfig) {
        match handle_init_config() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("\n❌ Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    // Initialize logging
    init_logging(&args);

    info!("RetailBench v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle `init-config`: generate a default retailbench.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new("retailbench.toml");

    if path.exists() {
        eprintln!("⚠️  retailbench.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write retailbench.toml")?;

    println!("✅ Created retailbench.toml with default settings.");
    println!("   Edit it to customize companies, clusters, granularity, and the credential.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the selected command. Returns the process exit code.
fn run(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let store = RecordStore::new(&config.general.data_file, config.benchmark.granularity);
    info!("Submission table at: {}", store.path().display());

    match args.command {
        Command::Submit(ref submit_args) => handle_submit(submit_args, &config, &store),
        Command::Report(ref report_args) => handle_report(report_args, &config, &store),
        Command::Headoffice(ref ho_args) => handle_headoffice(ho_args, &config, &store),
        Command::InitConfig => unreachable!("handled before logging init"),
    }
}

/// Handle `submit`: validate one submission and append it to the table.
fn handle_submit(args: &SubmitArgs, config: &Config, store: &RecordStore) -> Result<i32> {
    if let Err(e) = args.validate(config) {
        eprintln!("❌ Submission rejected: {}", e);
        return Ok(1);
    }

    let period = args
        .period(config.benchmark.granularity)
        .map_err(anyhow::Error::msg)?;

    let submission = Submission {
        period,
        cluster: args.cluster.trim().to_string(),
        company: args.company.clone(),
        stores: args.stores,
        area_mn_sqft: args.area,
        revenue_per_store: args.revenue_per_store,
        margin_per_store: args.margin_per_store,
        net_additions: args.net_additions,
        lfl_growth: args.lfl,
        bills_per_store: args.bills,
        abv: args.abv,
    };

    store.append(&submission)?;
    let total = store.load()?.len();

    println!(
        "✅ Data submitted successfully: {} / {} for {}",
        submission.cluster, submission.company, submission.period
    );
    println!("   Table now holds {} submissions", total);

    Ok(0)
}

/// Handle `report`: render the ungated aggregated benchmark view.
fn handle_report(args: &ReportArgs, config: &Config, store: &RecordStore) -> Result<i32> {
    let filter = RowFilter {
        period: args
            .period
            .period(config.benchmark.granularity)
            .map_err(anyhow::Error::msg)?,
        cluster: args.cluster.clone(),
    };

    let report = build_report(config, store, &filter, false)?;

    let content = report::render(&report, args.format)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.general.output));
    std::fs::write(&output, &content)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;

    println!("📊 Benchmark Summary:");
    println!(
        "   Submissions in view: {} of {}",
        report.metadata.submissions_in_view, report.metadata.submissions_total
    );
    println!("   Aggregate rows: {}", report.summary.len());
    println!("\n✅ Report saved to: {}", output.display());

    Ok(0)
}

/// Handle `headoffice`: check the gate, then render the gated view.
fn handle_headoffice(args: &HeadofficeArgs, config: &Config, store: &RecordStore) -> Result<i32> {
    let gate = AccessGate::new(config.headoffice.credential.clone());

    match gate.check(&args.credential) {
        GateOutcome::Empty => {
            println!("🔒 Enter the head-office credential to view the aggregated benchmark.");
            return Ok(0);
        }
        GateOutcome::Rejected => {
            warn!("Head-office credential rejected");
            eprintln!("⛔ Invalid head-office credential.");
            return Ok(2);
        }
        GateOutcome::Granted => {
            debug!("Head-office credential accepted");
        }
    }

    let filter = RowFilter {
        period: args
            .period
            .period(config.benchmark.granularity)
            .map_err(anyhow::Error::msg)?,
        cluster: args.cluster.clone(),
    };

    let report = build_report(config, store, &filter, true)?;
    let content = report::render(&report, args.format)?;

    match args.output {
        Some(ref output) => {
            std::fs::write(output, &content)
                .with_context(|| format!("Failed to write report to {}", output.display()))?;
            println!("🔓 Access granted.");
            println!("\n✅ Report saved to: {}", output.display());
        }
        None => {
            println!("🔓 Access granted.\n");
            println!("{}", content);
        }
    }

    Ok(0)
}

/// Load the table and build a benchmark report for the given filter.
///
/// With a period filter the summary groups by (period, company); without,
/// by company alone. The status check belongs to the head-office view and
/// is only computed when the view is narrowed to one period.
fn build_report(
    config: &Config,
    store: &RecordStore,
    filter: &RowFilter,
    with_status: bool,
) -> Result<BenchmarkReport> {
    let submissions = store.load()?;
    let rows = filter_rows(&submissions, filter);

    let summary = if filter.period.is_some() {
        aggregate_by_period(&rows)
    } else {
        aggregate_by_company(&rows)
    };

    // Status covers the whole period, ignoring any cluster filter.
    let status = match (with_status, filter.period) {
        (true, Some(period)) => {
            let period_filter = RowFilter {
                period: Some(period),
                cluster: None,
            };
            let period_rows = filter_rows(&submissions, &period_filter);
            Some(submission_status(&config.benchmark.clusters, &period_rows))
        }
        _ => None,
    };

    Ok(BenchmarkReport {
        metadata: ReportMetadata {
            generated_at: Utc::now(),
            data_file: config.general.data_file.clone(),
            submissions_total: submissions.len(),
            submissions_in_view: rows.len(),
            filter: filter.describe(),
        },
        summary,
        status,
    })
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from retailbench.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
