//! Markdown report generation.
//!
//! This module renders benchmark reports as Markdown tables (column labels
//! match the data-entry form) or as JSON for downstream tooling.

use crate::cli::OutputFormat;
use crate::models::{AggregateRow, BenchmarkReport, ReportMetadata, SubmissionStatus};
use anyhow::Result;

/// Render a report in the requested format.
pub fn render(report: &BenchmarkReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(generate_markdown_report(report)),
        OutputFormat::Json => generate_json_report(report),
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &BenchmarkReport) -> String {
    let mut output = String::new();

    output.push_str("# Retail Benchmark Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.summary));

    if let Some(ref status) = report.status {
        output.push_str(&generate_status_section(status));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Data File:** `{}`\n", metadata.data_file));
    section.push_str(&format!(
        "- **Submissions:** {} total, {} in view\n",
        metadata.submissions_total, metadata.submissions_in_view
    ));
    if let Some(ref filter) = metadata.filter {
        section.push_str(&format!("- **Filter:** {}\n", filter));
    }
    section.push('\n');

    section
}

/// Generate the aggregated benchmark table.
fn generate_summary_section(summary: &[AggregateRow]) -> String {
    let mut section = String::new();

    section.push_str("## Aggregated Benchmark View\n\n");

    if summary.is_empty() {
        section.push_str("No data submitted yet.\n\n");
        return section;
    }

    let with_period = summary.iter().any(|row| row.period.is_some());

    if with_period {
        section.push_str("| Period ");
    }
    section.push_str(
        "| Company | Total number of stores | Retail area (mn sq. ft.) \
         | Revenue per store (Rs. crore) | Margin per store (Rs. crore) \
         | Revenue per sq. ft. (Rs.) | Margin per sq. ft. (Rs.) \
         | Net store additions | LFL growth in revenue (%) \
         | # of bills per store | Average bill value (Rs.) |\n",
    );
    if with_period {
        section.push_str("|:---");
    }
    section.push_str("|:---|---:|---:|---:|---:|---:|---:|---:|---:|---:|---:|\n");

    for row in summary {
        if with_period {
            let period = row
                .period
                .map(|period| period.to_string())
                .unwrap_or_default();
            section.push_str(&format!("| {} ", period));
        }
        section.push_str(&format!(
            "| {} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {} | {:.2} | {:.0} | {:.2} |\n",
            row.company,
            row.total_stores,
            row.total_area_mn_sqft,
            row.revenue_per_store,
            row.margin_per_store,
            row.revenue_per_sqft,
            row.margin_per_sqft,
            row.net_additions,
            row.lfl_growth,
            row.bills_per_store,
            row.abv,
        ));
    }
    section.push('\n');

    section
}

/// Generate the submission status section.
fn generate_status_section(status: &SubmissionStatus) -> String {
    let mut section = String::new();

    section.push_str("## Submission Status\n\n");
    section.push_str(&format!(
        "- **Expected clusters:** {}\n- **Submitted:** {}\n- **Pending:** {}\n\n",
        status.expected,
        status.submitted,
        status.pending.len()
    ));

    if status.is_complete() {
        section.push_str("All expected clusters have submitted. ✅\n\n");
    } else {
        section.push_str("Still pending:\n\n");
        for cluster in &status.pending {
            section.push_str(&format!("- {}\n", cluster));
        }
        section.push('\n');
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by RetailBench*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &BenchmarkReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
