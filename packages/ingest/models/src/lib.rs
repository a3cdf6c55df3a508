#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ingestion run options, per-vessel outcomes, and job report types.

use std::collections::BTreeMap;

use seatrace_tracking_models::{DateRange, EventRecord, VesselEnrichment};
use serde::{Deserialize, Serialize};

/// One vessel from the input list.
///
/// `vessel_id` is the unique key everywhere downstream. The loader never
/// deduplicates; a duplicate entry just redoes idempotent work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VesselRef {
    /// Upstream vessel identifier (non-empty).
    pub vessel_id: String,
    /// Optional display name.
    pub name: Option<String>,
}

/// Configuration for one ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Inclusive date window for the event sweep.
    pub range: DateRange,
    /// Dataset ids to query, or the single-element `auto` sentinel.
    pub datasets: Vec<String>,
    /// Events per page for the paginated fetch.
    pub page_size: u64,
    /// Worker-pool width: maximum vessels in flight at once.
    pub workers: usize,
    /// Embed the full event list inline on the vessel document.
    pub embed_events: bool,
    /// Also maintain the separate indexed event collection.
    pub write_events: bool,
}

/// Everything fetched for one vessel, ready for the writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VesselPayload {
    /// The vessel this payload belongs to.
    pub vessel: VesselRef,
    /// Summary documents; `None` when the vessel had zero events.
    pub enrichment: Option<VesselEnrichment>,
    /// Events accumulated across every requested dataset.
    pub events: Vec<EventRecord>,
    /// Server-reported event totals per dataset.
    pub events_count_by_dataset: BTreeMap<String, u64>,
}

/// Terminal result for one vessel task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutcome {
    /// The vessel this outcome belongs to.
    pub vessel_id: String,
    /// Display name carried through for reporting.
    pub name: Option<String>,
    /// Events written to the event collection (0 when disabled).
    pub events_written: u64,
    /// True when the vessel had zero events and nothing was written.
    pub skipped: bool,
    /// Error message when the vessel task failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskOutcome {
    /// Outcome for a vessel whose task failed.
    #[must_use]
    pub fn failed(vessel: &VesselRef, error: String) -> Self {
        Self {
            vessel_id: vessel.vessel_id.clone(),
            name: vessel.name.clone(),
            events_written: 0,
            skipped: false,
            error: Some(error),
        }
    }

    /// Outcome for a vessel with no events in the window.
    #[must_use]
    pub fn skipped(vessel: &VesselRef) -> Self {
        Self {
            vessel_id: vessel.vessel_id.clone(),
            name: vessel.name.clone(),
            events_written: 0,
            skipped: true,
            error: None,
        }
    }
}

/// Aggregated result of one ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    /// Vessels dispatched (duplicates included).
    pub total_vessels: u64,
    /// Outcomes that completed without an error.
    pub processed: u64,
    /// Outcomes with an error, verbatim.
    pub failed: Vec<TaskOutcome>,
    /// Every outcome, in completion order.
    pub results: Vec<TaskOutcome>,
}
