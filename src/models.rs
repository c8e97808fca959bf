//! Data models for the retail benchmark tool.
//!
//! This module contains all the core data structures used throughout
//! the application for representing submissions, aggregates, and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reporting period granularity of a deployment.
///
/// Fixed per deployment via configuration; decides which period columns the
/// submission table carries and which period arguments `submit` requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodGranularity {
    /// Yearly reporting (period is a year only)
    Year,
    /// Weekly reporting (period is year + week number)
    Week,
    /// Monthly reporting (period is year + month number)
    Month,
}

impl fmt::Display for PeriodGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodGranularity::Year => write!(f, "year"),
            PeriodGranularity::Week => write!(f, "week"),
            PeriodGranularity::Month => write!(f, "month"),
        }
    }
}

/// A reporting period at the deployment's granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    /// A full year, e.g. `2025`.
    Year(i32),
    /// A week of a year, e.g. `2025-W31`.
    Week { year: i32, week: u32 },
    /// A month of a year, e.g. `2025-M07`.
    Month { year: i32, month: u32 },
}

impl Period {
    /// The year component, present at every granularity.
    #[allow(dead_code)] // Utility accessor
    pub fn year(&self) -> i32 {
        match self {
            Period::Year(year) => *year,
            Period::Week { year, .. } => *year,
            Period::Month { year, .. } => *year,
        }
    }

    /// The granularity this period value belongs to.
    #[allow(dead_code)] // Utility accessor
    pub fn granularity(&self) -> PeriodGranularity {
        match self {
            Period::Year(_) => PeriodGranularity::Year,
            Period::Week { .. } => PeriodGranularity::Week,
            Period::Month { .. } => PeriodGranularity::Month,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Year(year) => write!(f, "{}", year),
            Period::Week { year, week } => write!(f, "{}-W{:02}", year, week),
            Period::Month { year, month } => write!(f, "{}-M{:02}", year, month),
        }
    }
}

impl Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single cluster-manager submission.
///
/// Submissions are immutable once written. Repeated submissions for the same
/// (period, cluster, company) are kept verbatim; the aggregator sums over
/// every row that exists, duplicates included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    /// Reporting period of the submission.
    pub period: Period,
    /// Cluster name the figures belong to.
    pub cluster: String,
    /// Company the figures belong to.
    pub company: String,
    /// Total number of stores in the cluster.
    pub stores: u32,
    /// Retail area in millions of square feet.
    pub area_mn_sqft: f64,
    /// Revenue per store in Rs. crore.
    pub revenue_per_store: f64,
    /// Margin per store in Rs. crore.
    pub margin_per_store: f64,
    /// Net store additions (may be negative).
    pub net_additions: i64,
    /// Like-for-like revenue growth in percent, within [-100, 100].
    pub lfl_growth: f64,
    /// Number of bills per store.
    pub bills_per_store: u32,
    /// Average bill value in rupees.
    pub abv: f64,
}

/// One aggregated row of the benchmark view, per group key.
///
/// Derived on every render; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateRow {
    /// Period of the group (per-period view only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    /// Company of the group.
    pub company: String,
    /// Total number of stores across the group.
    pub total_stores: u64,
    /// Total retail area in millions of square feet.
    pub total_area_mn_sqft: f64,
    /// Store-weighted revenue per store in Rs. crore.
    pub revenue_per_store: f64,
    /// Store-weighted margin per store in Rs. crore.
    pub margin_per_store: f64,
    /// Revenue per square foot in rupees.
    pub revenue_per_sqft: f64,
    /// Margin per square foot in rupees.
    pub margin_per_sqft: f64,
    /// Net store additions, plain sum.
    pub net_additions: i64,
    /// Revenue-weighted like-for-like growth in percent.
    pub lfl_growth: f64,
    /// Store-weighted bills per store.
    pub bills_per_store: f64,
    /// Store-weighted average bill value in rupees.
    pub abv: f64,
}

/// Which clusters have reported for a period, and which are still pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionStatus {
    /// Number of clusters expected to report.
    pub expected: usize,
    /// Number of distinct clusters present in the filtered table.
    pub submitted: usize,
    /// Expected clusters with no submission yet, sorted by name.
    pub pending: Vec<String>,
}

impl SubmissionStatus {
    /// Whether every expected cluster has reported.
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Metadata about a generated benchmark report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Path of the submission table the report was built from.
    pub data_file: String,
    /// Total number of submissions in the table.
    pub submissions_total: usize,
    /// Number of submissions left after filtering.
    pub submissions_in_view: usize,
    /// Human-readable description of the applied filter, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// The complete benchmark report.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Aggregated benchmark rows, one per group key.
    pub summary: Vec<AggregateRow>,
    /// Submission status for the selected period (head-office view only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SubmissionStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_display() {
        assert_eq!(Period::Year(2025).to_string(), "2025");
        assert_eq!(Period::Week { year: 2025, week: 3 }.to_string(), "2025-W03");
        assert_eq!(
            Period::Month { year: 2025, month: 11 }.to_string(),
            "2025-M11"
        );
    }

    #[test]
    fn test_period_year_accessor() {
        assert_eq!(Period::Year(2024).year(), 2024);
        assert_eq!(Period::Week { year: 2025, week: 31 }.year(), 2025);
        assert_eq!(Period::Month { year: 2026, month: 1 }.year(), 2026);
    }

    #[test]
    fn test_period_granularity() {
        assert_eq!(Period::Year(2025).granularity(), PeriodGranularity::Year);
        assert_eq!(
            Period::Week { year: 2025, week: 1 }.granularity(),
            PeriodGranularity::Week
        );
        assert_eq!(
            Period::Month { year: 2025, month: 1 }.granularity(),
            PeriodGranularity::Month
        );
    }

    #[test]
    fn test_period_ordering_within_granularity() {
        let mut weeks = vec![
            Period::Week { year: 2025, week: 10 },
            Period::Week { year: 2024, week: 52 },
            Period::Week { year: 2025, week: 2 },
        ];
        weeks.sort();
        assert_eq!(
            weeks,
            vec![
                Period::Week { year: 2024, week: 52 },
                Period::Week { year: 2025, week: 2 },
                Period::Week { year: 2025, week: 10 },
            ]
        );
    }

    #[test]
    fn test_period_serializes_as_display_string() {
        let json = serde_json::to_string(&Period::Week { year: 2025, week: 7 }).unwrap();
        assert_eq!(json, "\"2025-W07\"");
    }

    #[test]
    fn test_granularity_config_names() {
        let g: PeriodGranularity = serde_json::from_str("\"week\"").unwrap();
        assert_eq!(g, PeriodGranularity::Week);
        assert_eq!(g.to_string(), "week");
    }

    #[test]
    fn test_status_is_complete() {
        let done = SubmissionStatus {
            expected: 2,
            submitted: 2,
            pending: vec![],
        };
        assert!(done.is_complete());

        let waiting = SubmissionStatus {
            expected: 2,
            submitted: 1,
            pending: vec!["South 1".to_string()],
        };
        assert!(!waiting.is_complete());
    }
}
