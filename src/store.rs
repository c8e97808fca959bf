//! Submission table persistence.
//!
//! This module owns the flat CSV file that is the single source of truth
//! for submitted cluster data. The table is read in full on every
//! interaction and rewritten in full on every append; an interleaved append
//! from a second process can therefore be lost to the later rewrite.

use crate::models::{Period, PeriodGranularity, Submission};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Identity and metric columns shared by every deployment variant.
///
/// Period columns are prepended depending on the granularity. Column order
/// is fixed and must match on read and write.
const BASE_COLUMNS: [&str; 10] = [
    "Cluster",
    "Company",
    "Stores",
    "Area_mn_sqft",
    "Revenue_per_store",
    "Margin_per_store",
    "Net_additions",
    "LFL_growth",
    "Bills_per_store",
    "ABV",
];

/// Errors raised by the submission table.
///
/// A table that exists but cannot be parsed is fatal for the current
/// interaction; there is no repair or migration path.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The table file could not be read.
    #[error("Failed to read submission table {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The table file could not be written.
    #[error("Failed to write submission table {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The header row does not match the deployment's column set.
    #[error("Submission table {} has unexpected columns: expected [{expected}], found [{found}]", path.display())]
    HeaderMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// A field value could not be parsed.
    #[error("Corrupt value {value:?} in {} at row {row}, column {column}", path.display())]
    Corrupt {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },
}

/// The persisted, append-only submission table.
pub struct RecordStore {
    path: PathBuf,
    granularity: PeriodGranularity,
}

impl RecordStore {
    /// Create a store for the given file and deployment granularity.
    ///
    /// The file is not touched until `load` or `append` is called.
    pub fn new(path: impl Into<PathBuf>, granularity: PeriodGranularity) -> Self {
        Self {
            path: path.into(),
            granularity,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The canonical column set for this deployment.
    fn columns(&self) -> Vec<&'static str> {
        let period_columns: &[&str] = match self.granularity {
            PeriodGranularity::Year => &["Year"],
            PeriodGranularity::Week => &["Year", "Week"],
            PeriodGranularity::Month => &["Year", "Month"],
        };

        period_columns
            .iter()
            .chain(BASE_COLUMNS.iter())
            .copied()
            .collect()
    }

    /// Load every persisted submission.
    ///
    /// A missing file is not an error: it yields an empty table.
    pub fn load(&self) -> Result<Vec<Submission>, StoreError> {
        if !self.path.exists() {
            debug!("No submission table at {}, starting empty", self.path.display());
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        let expected = self.columns();
        let headers = reader.headers().map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        let found: Vec<&str> = headers.iter().collect();
        if found != expected {
            return Err(StoreError::HeaderMismatch {
                path: self.path.clone(),
                expected: expected.join(", "),
                found: found.join(", "),
            });
        }

        let mut submissions = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })?;

            // Row 1 is the header; data rows start at 2.
            let row = index + 2;
            submissions.push(self.parse_record(row, &record)?);
        }

        debug!(
            "Loaded {} submissions from {}",
            submissions.len(),
            self.path.display()
        );
        Ok(submissions)
    }

    /// Append one submission and persist the table.
    ///
    /// The full table is loaded, extended, and rewritten; the new row is
    /// visible to the very next `load`. Range validation is the entry
    /// surface's responsibility, not the store's.
    pub fn append(&self, submission: &Submission) -> Result<(), StoreError> {
        let mut submissions = self.load()?;
        submissions.push(submission.clone());
        self.write_all(&submissions)?;

        debug!(
            "Appended submission for {} / {} ({} rows total)",
            submission.cluster,
            submission.company,
            submissions.len()
        );
        Ok(())
    }

    /// Rewrite the whole table, header first.
    fn write_all(&self, submissions: &[Submission]) -> Result<(), StoreError> {
        let mut writer = csv::Writer::from_path(&self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        writer
            .write_record(self.columns())
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        for submission in submissions {
            writer
                .write_record(self.record_fields(submission))
                .map_err(|source| StoreError::Write {
                    path: self.path.clone(),
                    source,
                })?;
        }
        writer.flush().map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source: csv::Error::from(source),
        })?;

        Ok(())
    }

    /// Serialize one submission into the deployment's column order.
    fn record_fields(&self, submission: &Submission) -> Vec<String> {
        let mut fields = Vec::with_capacity(self.columns().len());

        match submission.period {
            Period::Year(year) => fields.push(year.to_string()),
            Period::Week { year, week } => {
                fields.push(year.to_string());
                fields.push(week.to_string());
            }
            Period::Month { year, month } => {
                fields.push(year.to_string());
                fields.push(month.to_string());
            }
        }

        fields.push(submission.cluster.clone());
        fields.push(submission.company.clone());
        fields.push(submission.stores.to_string());
        fields.push(submission.area_mn_sqft.to_string());
        fields.push(submission.revenue_per_store.to_string());
        fields.push(submission.margin_per_store.to_string());
        fields.push(submission.net_additions.to_string());
        fields.push(submission.lfl_growth.to_string());
        fields.push(submission.bills_per_store.to_string());
        fields.push(submission.abv.to_string());

        fields
    }

    /// Parse one data row back into a submission.
    fn parse_record(&self, row: usize, record: &csv::StringRecord) -> Result<Submission, StoreError> {
        let columns = self.columns();
        let field = |index: usize| record.get(index).unwrap_or("");

        let year: i32 = self.parse_field(row, "Year", field(0))?;
        let (period, offset) = match self.granularity {
            PeriodGranularity::Year => (Period::Year(year), 1),
            PeriodGranularity::Week => {
                let week: u32 = self.parse_field(row, "Week", field(1))?;
                (Period::Week { year, week }, 2)
            }
            PeriodGranularity::Month => {
                let month: u32 = self.parse_field(row, "Month", field(1))?;
                (Period::Month { year, month }, 2)
            }
        };

        Ok(Submission {
            period,
            cluster: field(offset).to_string(),
            company: field(offset + 1).to_string(),
            stores: self.parse_field(row, columns[offset + 2], field(offset + 2))?,
            area_mn_sqft: self.parse_field(row, columns[offset + 3], field(offset + 3))?,
            revenue_per_store: self.parse_field(row, columns[offset + 4], field(offset + 4))?,
            margin_per_store: self.parse_field(row, columns[offset + 5], field(offset + 5))?,
            net_additions: self.parse_field(row, columns[offset + 6], field(offset + 6))?,
            lfl_growth: self.parse_field(row, columns[offset + 7], field(offset + 7))?,
            bills_per_store: self.parse_field(row, columns[offset + 8], field(offset + 8))?,
            abv: self.parse_field(row, columns[offset + 9], field(offset + 9))?,
        })
    }

    /// Parse a single field, reporting the row and column on failure.
    fn parse_field<T: FromStr>(
        &self,
        row: usize,
        column: &str,
        value: &str,
    ) -> Result<T, StoreError> {
        value.parse().map_err(|_| StoreError::Corrupt {
            path: self.path.clone(),
            row,
            column: column.to_string(),
            value: value.to_string(),
        })
    }
}
