#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for ingesting vessel-activity events from the tracking API into
//! the document store.
//!
//! The pipeline is: load the vessel list, dispatch one task per vessel
//! across a bounded worker pool, fetch every requested dataset plus the
//! enrichment documents per vessel, upsert the results, and aggregate the
//! per-vessel outcomes into a [`JobReport`].

pub mod progress;
pub mod runner;
pub mod scheduler;
pub mod vessels;
pub mod writer;

#[cfg(test)]
pub(crate) mod testing;

use seatrace_ingest_models::{JobReport, TaskOutcome};

pub use runner::run_vessel;
pub use scheduler::run_job;
pub use vessels::load_vessels;
pub use writer::write_payload;

/// Aggregates per-vessel outcomes into the final report.
///
/// Pure: counts outcomes without an error as processed and collects the
/// erring ones verbatim. Retries are deliberately nobody's job; the
/// operator re-runs the whole job, which the idempotent upserts make safe.
#[must_use]
pub fn summarize(total_vessels: u64, outcomes: Vec<TaskOutcome>) -> JobReport {
    let processed = outcomes.iter().filter(|o| o.error.is_none()).count() as u64;
    let failed: Vec<TaskOutcome> = outcomes
        .iter()
        .filter(|o| o.error.is_some())
        .cloned()
        .collect();

    JobReport {
        total_vessels,
        processed,
        failed,
        results: outcomes,
    }
}

#[cfg(test)]
mod tests {
    use seatrace_ingest_models::VesselRef;

    use super::*;

    fn vessel(id: &str) -> VesselRef {
        VesselRef {
            vessel_id: id.to_owned(),
            name: None,
        }
    }

    #[test]
    fn summarize_counts_successes_and_collects_failures() {
        let outcomes = vec![
            TaskOutcome {
                vessel_id: "v1".to_owned(),
                name: Some("Alpha".to_owned()),
                events_written: 3,
                skipped: false,
                error: None,
            },
            TaskOutcome::skipped(&vessel("v2")),
            TaskOutcome::failed(&vessel("v3"), "connection reset".to_owned()),
        ];

        let report = summarize(3, outcomes);

        assert_eq!(report.total_vessels, 3);
        assert_eq!(report.processed, 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].vessel_id, "v3");
        assert_eq!(
            report.failed[0].error.as_deref(),
            Some("connection reset")
        );
        assert_eq!(report.results.len(), 3);
    }

    #[test]
    fn summarize_of_empty_run_is_empty() {
        let report = summarize(0, Vec::new());
        assert_eq!(report.total_vessels, 0);
        assert_eq!(report.processed, 0);
        assert!(report.failed.is_empty());
    }
}
