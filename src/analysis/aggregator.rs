//! Weighted benchmark aggregation.
//!
//! This module rolls per-cluster submissions up into company- or
//! period-level benchmark rows. Per-store figures are weighted back up by
//! store count before summing; like-for-like growth is weighted by each
//! row's revenue contribution.

use crate::models::{AggregateRow, Period, Submission};
use std::collections::HashMap;

/// Rupees per Rs. crore.
const RUPEES_PER_CRORE: f64 = 1e7;

/// Square feet per million square feet.
const SQFT_PER_MN: f64 = 1e6;

/// Narrows the submission table before aggregation.
#[derive(Debug, Clone, Default)]
pub struct RowFilter {
    /// Keep only submissions for this period.
    pub period: Option<Period>,
    /// Keep only submissions for this cluster.
    pub cluster: Option<String>,
}

impl RowFilter {
    /// A filter that keeps everything.
    #[allow(dead_code)] // Utility constructor
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether this filter narrows the table at all.
    #[allow(dead_code)] // Utility for callers that branch on filtering
    pub fn is_empty(&self) -> bool {
        self.period.is_none() && self.cluster.is_none()
    }

    /// Whether a submission passes the filter.
    pub fn matches(&self, submission: &Submission) -> bool {
        if let Some(period) = self.period {
            if submission.period != period {
                return false;
            }
        }
        if let Some(ref cluster) = self.cluster {
            if &submission.cluster != cluster {
                return false;
            }
        }
        true
    }

    /// Human-readable description for report metadata.
    pub fn describe(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(period) = self.period {
            parts.push(format!("period {}", period));
        }
        if let Some(ref cluster) = self.cluster {
            parts.push(format!("cluster {}", cluster));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Keep only the submissions that pass the filter.
pub fn filter_rows(rows: &[Submission], filter: &RowFilter) -> Vec<Submission> {
    rows.iter()
        .filter(|row| filter.matches(row))
        .cloned()
        .collect()
}

/// Aggregate the table by company: the global, all-time benchmark view.
///
/// Output rows are sorted by company name. One row per distinct company
/// observed in the input.
pub fn aggregate_by_company(rows: &[Submission]) -> Vec<AggregateRow> {
    let mut groups: HashMap<&str, Vec<&Submission>> = HashMap::new();
    for row in rows {
        groups.entry(row.company.as_str()).or_default().push(row);
    }

    let mut companies: Vec<&str> = groups.keys().copied().collect();
    companies.sort_unstable();

    companies
        .into_iter()
        .map(|company| roll_up(None, company, &groups[company]))
        .collect()
}

/// Aggregate the table by (period, company): the per-period view.
///
/// Used once a period filter has narrowed the table. Output rows are
/// sorted by period, then company.
pub fn aggregate_by_period(rows: &[Submission]) -> Vec<AggregateRow> {
    let mut groups: HashMap<(Period, &str), Vec<&Submission>> = HashMap::new();
    for row in rows {
        groups
            .entry((row.period, row.company.as_str()))
            .or_default()
            .push(row);
    }

    let mut keys: Vec<(Period, &str)> = groups.keys().copied().collect();
    keys.sort_unstable();

    keys.into_iter()
        .map(|key| roll_up(Some(key.0), key.1, &groups[&key]))
        .collect()
}

/// Roll one group of submissions up into a single benchmark row.
///
/// Every division is zero-guarded: a group with no stores, no area, or no
/// revenue resolves the affected metrics to 0, never to NaN.
fn roll_up(period: Option<Period>, company: &str, rows: &[&Submission]) -> AggregateRow {
    let total_stores: u64 = rows.iter().map(|r| u64::from(r.stores)).sum();
    let total_area: f64 = rows.iter().map(|r| r.area_mn_sqft).sum();
    let total_revenue: f64 = rows
        .iter()
        .map(|r| r.revenue_per_store * f64::from(r.stores))
        .sum();
    let total_margin: f64 = rows
        .iter()
        .map(|r| r.margin_per_store * f64::from(r.stores))
        .sum();

    let per_store = |weighted_sum: f64| {
        if total_stores == 0 {
            0.0
        } else {
            weighted_sum / total_stores as f64
        }
    };
    let per_sqft = |crore_total: f64| {
        if total_area == 0.0 {
            0.0
        } else {
            (crore_total * RUPEES_PER_CRORE) / (total_area * SQFT_PER_MN)
        }
    };

    let lfl_weighted: f64 = rows
        .iter()
        .map(|r| r.lfl_growth * r.revenue_per_store * f64::from(r.stores))
        .sum();
    let bills_weighted: f64 = rows
        .iter()
        .map(|r| f64::from(r.bills_per_store) * f64::from(r.stores))
        .sum();
    let abv_weighted: f64 = rows.iter().map(|r| r.abv * f64::from(r.stores)).sum();

    AggregateRow {
        period,
        company: company.to_string(),
        total_stores,
        total_area_mn_sqft: total_area,
        revenue_per_store: per_store(total_revenue),
        margin_per_store: per_store(total_margin),
        revenue_per_sqft: per_sqft(total_revenue),
        margin_per_sqft: per_sqft(total_margin),
        net_additions: rows.iter().map(|r| r.net_additions).sum(),
        lfl_growth: if total_revenue == 0.0 {
            0.0
        } else {
            lfl_weighted / total_revenue
        },
        bills_per_store: per_store(bills_weighted),
        abv: per_store(abv_weighted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn make_row(company: &str, stores: u32, revenue_per_store: f64) -> Submission {
        Submission {
            period: Period::Week { year: 2025, week: 31 },
            cluster: "North 1".to_string(),
            company: company.to_string(),
            stores,
            area_mn_sqft: 1.0,
            revenue_per_store,
            margin_per_store: 0.5,
            net_additions: 2,
            lfl_growth: 3.0,
            bills_per_store: 1000,
            abv: 400.0,
        }
    }

    #[test]
    fn test_store_weighted_revenue() {
        let rows = vec![make_row("A", 10, 5.0), make_row("A", 20, 10.0)];

        let summary = aggregate_by_company(&rows);
        assert_eq!(summary.len(), 1);

        let row = &summary[0];
        assert_eq!(row.total_stores, 30);
        // total revenue = 10*5 + 20*10 = 250, so per store = 250/30
        assert!((row.revenue_per_store - 250.0 / 30.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_weighted_average_round_trip() {
        let rows = vec![
            make_row("A", 7, 3.2),
            make_row("A", 13, 8.1),
            make_row("A", 25, 1.7),
        ];

        let row = &aggregate_by_company(&rows)[0];
        let total_revenue: f64 = rows
            .iter()
            .map(|r| r.revenue_per_store * f64::from(r.stores))
            .sum();

        assert!((row.revenue_per_store * row.total_stores as f64 - total_revenue).abs() < TOLERANCE);
    }

    #[test]
    fn test_zero_stores_and_area_resolve_to_zero() {
        let mut empty = make_row("A", 0, 5.0);
        empty.area_mn_sqft = 0.0;

        let summary = aggregate_by_company(&[empty]);
        let row = &summary[0];

        assert_eq!(row.total_stores, 0);
        assert_eq!(row.revenue_per_store, 0.0);
        assert_eq!(row.margin_per_store, 0.0);
        assert_eq!(row.revenue_per_sqft, 0.0);
        assert_eq!(row.margin_per_sqft, 0.0);
        assert_eq!(row.lfl_growth, 0.0);
        assert_eq!(row.bills_per_store, 0.0);
        assert_eq!(row.abv, 0.0);
        assert!(!row.revenue_per_store.is_nan());
    }

    #[test]
    fn test_lfl_growth_is_revenue_weighted() {
        let mut high = make_row("A", 10, 5.0);
        high.lfl_growth = 10.0;
        let mut low = make_row("A", 20, 10.0);
        low.lfl_growth = -2.0;

        let row = &aggregate_by_company(&[high, low])[0];
        // (10*5*10 + -2*10*20) / 250 = (500 - 400) / 250
        assert!((row.lfl_growth - 0.4).abs() < TOLERANCE);
    }

    #[test]
    fn test_bills_and_abv_are_store_weighted() {
        let mut small = make_row("A", 10, 5.0);
        small.bills_per_store = 100;
        small.abv = 200.0;
        let mut large = make_row("A", 30, 5.0);
        large.bills_per_store = 200;
        large.abv = 600.0;

        let row = &aggregate_by_company(&[small, large])[0];
        assert!((row.bills_per_store - 175.0).abs() < TOLERANCE);
        assert!((row.abv - 500.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_per_sqft_conversion() {
        let mut row = make_row("A", 10, 5.0);
        row.area_mn_sqft = 2.0;
        row.margin_per_store = 1.0;

        let agg = &aggregate_by_company(&[row])[0];
        // 50 crore over 2 mn sqft = 50e7 / 2e6 = 250 Rs./sqft
        assert!((agg.revenue_per_sqft - 250.0).abs() < TOLERANCE);
        // 10 crore over 2 mn sqft = 50 Rs./sqft
        assert!((agg.margin_per_sqft - 50.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_net_additions_plain_sum() {
        let mut opened = make_row("A", 10, 5.0);
        opened.net_additions = 7;
        let mut closed = make_row("A", 20, 5.0);
        closed.net_additions = -3;

        let row = &aggregate_by_company(&[opened, closed])[0];
        assert_eq!(row.net_additions, 4);
    }

    #[test]
    fn test_duplicate_rows_are_summed() {
        let row = make_row("A", 10, 5.0);
        let once = aggregate_by_company(&[row.clone()]);
        let twice = aggregate_by_company(&[row.clone(), row]);

        assert_eq!(twice[0].total_stores, 2 * once[0].total_stores);
        assert!((twice[0].total_area_mn_sqft - 2.0 * once[0].total_area_mn_sqft).abs() < TOLERANCE);
        // per-store averages are unchanged by duplication
        assert!((twice[0].revenue_per_store - once[0].revenue_per_store).abs() < TOLERANCE);
    }

    #[test]
    fn test_companies_grouped_and_sorted() {
        let rows = vec![
            make_row("Competitor 1", 5, 2.0),
            make_row("Reliance Retail", 10, 5.0),
            make_row("Competitor 1", 5, 4.0),
        ];

        let summary = aggregate_by_company(&rows);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].company, "Competitor 1");
        assert_eq!(summary[1].company, "Reliance Retail");
        assert_eq!(summary[0].total_stores, 10);
        assert!(summary.iter().all(|row| row.period.is_none()));
    }

    #[test]
    fn test_period_view_groups_by_period_and_company() {
        let mut early = make_row("A", 10, 5.0);
        early.period = Period::Week { year: 2025, week: 30 };
        let mut late = make_row("A", 20, 5.0);
        late.period = Period::Week { year: 2025, week: 31 };
        let mut other = make_row("B", 5, 2.0);
        other.period = Period::Week { year: 2025, week: 30 };

        let summary = aggregate_by_period(&[late, other, early]);
        assert_eq!(summary.len(), 3);
        assert_eq!(
            summary[0].period,
            Some(Period::Week { year: 2025, week: 30 })
        );
        assert_eq!(summary[0].company, "A");
        assert_eq!(summary[1].company, "B");
        assert_eq!(
            summary[2].period,
            Some(Period::Week { year: 2025, week: 31 })
        );
    }

    #[test]
    fn test_filter_rows_by_period_and_cluster() {
        let mut kept = make_row("A", 10, 5.0);
        kept.cluster = "North 1".to_string();
        let mut wrong_cluster = make_row("A", 10, 5.0);
        wrong_cluster.cluster = "South 1".to_string();
        let mut wrong_period = make_row("A", 10, 5.0);
        wrong_period.period = Period::Week { year: 2025, week: 1 };

        let rows = vec![kept.clone(), wrong_cluster, wrong_period];
        let filter = RowFilter {
            period: Some(Period::Week { year: 2025, week: 31 }),
            cluster: Some("North 1".to_string()),
        };

        let filtered = filter_rows(&rows, &filter);
        assert_eq!(filtered, vec![kept]);
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let rows = vec![make_row("A", 10, 5.0), make_row("B", 20, 10.0)];
        let filter = RowFilter::none();

        assert!(filter.is_empty());
        assert_eq!(filter.describe(), None);
        assert_eq!(filter_rows(&rows, &filter).len(), 2);
    }

    #[test]
    fn test_filter_description() {
        let filter = RowFilter {
            period: Some(Period::Week { year: 2025, week: 31 }),
            cluster: Some("North 1".to_string()),
        };
        assert_eq!(
            filter.describe(),
            Some("period 2025-W31, cluster North 1".to_string())
        );
    }
}
