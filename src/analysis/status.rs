//! Submission status for the head-office view.
//!
//! Reports which expected clusters have submitted for a period and which
//! are still pending. Pure set computation, no aggregation math.

use crate::models::{Submission, SubmissionStatus};
use std::collections::HashSet;

/// Compute the submission status over a table filtered to one period.
///
/// `submitted` counts every distinct cluster present in the rows, including
/// names outside the expected list; `pending` is the expected clusters with
/// no submission, sorted by name.
pub fn submission_status(expected: &[String], rows: &[Submission]) -> SubmissionStatus {
    let submitted: HashSet<&str> = rows.iter().map(|row| row.cluster.as_str()).collect();

    let mut pending: Vec<String> = expected
        .iter()
        .filter(|cluster| !submitted.contains(cluster.as_str()))
        .cloned()
        .collect();
    pending.sort();

    SubmissionStatus {
        expected: expected.len(),
        submitted: submitted.len(),
        pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Period;

    fn make_row(cluster: &str) -> Submission {
        Submission {
            period: Period::Week { year: 2025, week: 31 },
            cluster: cluster.to_string(),
            company: "Reliance Retail".to_string(),
            stores: 10,
            area_mn_sqft: 1.0,
            revenue_per_store: 5.0,
            margin_per_store: 0.5,
            net_additions: 0,
            lfl_growth: 0.0,
            bills_per_store: 1000,
            abv: 400.0,
        }
    }

    fn expected(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_one_cluster_pending() {
        let status = submission_status(&expected(&["North 1", "South 1"]), &[make_row("North 1")]);

        assert_eq!(status.expected, 2);
        assert_eq!(status.submitted, 1);
        assert_eq!(status.pending, vec!["South 1"]);
    }

    #[test]
    fn test_empty_table_leaves_everything_pending() {
        let status = submission_status(&expected(&["South 1", "North 1"]), &[]);

        assert_eq!(status.submitted, 0);
        assert_eq!(status.pending, vec!["North 1", "South 1"]);
        assert!(!status.is_complete());
    }

    #[test]
    fn test_all_submitted() {
        let rows = vec![make_row("North 1"), make_row("South 1")];
        let status = submission_status(&expected(&["North 1", "South 1"]), &rows);

        assert_eq!(status.submitted, 2);
        assert!(status.pending.is_empty());
        assert!(status.is_complete());
    }

    #[test]
    fn test_duplicate_submissions_count_once() {
        let rows = vec![make_row("North 1"), make_row("North 1")];
        let status = submission_status(&expected(&["North 1", "South 1"]), &rows);

        assert_eq!(status.submitted, 1);
        assert_eq!(status.pending, vec!["South 1"]);
    }

    #[test]
    fn test_unexpected_cluster_counts_as_submitted() {
        let rows = vec![make_row("North 1"), make_row("Central 9")];
        let status = submission_status(&expected(&["North 1", "South 1"]), &rows);

        assert_eq!(status.submitted, 2);
        assert_eq!(status.pending, vec!["South 1"]);
    }

    #[test]
    fn test_pending_is_subset_of_expected_and_disjoint_from_submitted() {
        let all = expected(&["East 1", "North 1", "North 2", "South 1"]);
        let rows = vec![make_row("North 2"), make_row("West 9")];
        let status = submission_status(&all, &rows);

        assert!(status.pending.iter().all(|cluster| all.contains(cluster)));
        assert!(status
            .pending
            .iter()
            .all(|cluster| rows.iter().all(|row| &row.cluster != cluster)));
    }
}
