#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Wire and domain types for the vessel tracking API.
//!
//! Event payloads are kept as open JSON maps. The upstream schema varies
//! per dataset (loitering, gaps, encounters, port visits) and the pipeline
//! never inspects fields beyond the event id.

use serde::{Deserialize, Serialize};

/// Event datasets queried when the caller passes the `auto` sentinel.
pub const DEFAULT_EVENT_DATASETS: [&str; 4] = [
    "public-global-gaps-events:latest",
    "public-global-loitering-events:latest",
    "public-global-encounters-events:latest",
    "public-global-port-visits-events:latest",
];

/// Identity dataset used for vessel detail lookups.
pub const VESSEL_IDENTITY_DATASET: &str = "public-global-vessel-identity:latest";

/// Inclusive date window for event and insight queries.
///
/// Dates are ISO `YYYY-MM-DD` strings, exactly as the upstream API expects
/// them. Validation happens at the CLI boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the window.
    pub start_date: String,
    /// Last day of the window.
    pub end_date: String,
}

/// One page of the events-listing endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsPage {
    /// Page size the server applied.
    pub limit: u64,
    /// Offset this page starts at.
    pub offset: u64,
    /// Offset of the next page, absent when this page is the last.
    #[serde(default)]
    pub next_offset: Option<u64>,
    /// Total matching events across all pages.
    pub total: u64,
    /// Raw event objects.
    #[serde(default)]
    pub entries: Vec<serde_json::Value>,
}

/// A single vessel-activity event, tagged with its origin.
///
/// `event_id` is the upstream `id` field when present. Events without one
/// cannot be updated idempotently and are written insert-only downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Dataset the event was fetched from.
    pub dataset_id: String,
    /// Stable upstream event id, if the entry carries one.
    pub event_id: Option<String>,
    /// Vessel the event belongs to.
    pub vessel_id: String,
    /// The raw upstream entry.
    pub fields: serde_json::Value,
}

impl EventRecord {
    /// Tags a raw upstream entry with its dataset and vessel, extracting
    /// the stable id when the entry has one.
    #[must_use]
    pub fn from_entry(dataset_id: &str, vessel_id: &str, entry: serde_json::Value) -> Self {
        let event_id = entry
            .get("id")
            .and_then(serde_json::Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_owned);
        Self {
            dataset_id: dataset_id.to_owned(),
            event_id,
            vessel_id: vessel_id.to_owned(),
            fields: entry,
        }
    }
}

/// Per-vessel summary documents fetched after the event sweep.
///
/// Both halves are open maps: the insights and identity schemas are rich
/// and versioned upstream, and the store persists them verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VesselEnrichment {
    /// Response body of the insights endpoint.
    pub insights: Option<serde_json::Value>,
    /// Response body of the vessel details endpoint.
    pub details: Option<serde_json::Value>,
}

/// Resolves the dataset list for a run.
///
/// A single-element list whose only entry is `auto` (case-insensitive)
/// expands to [`DEFAULT_EVENT_DATASETS`]; anything else is used as given.
#[must_use]
pub fn resolve_datasets(datasets: &[String]) -> Vec<String> {
    if let [only] = datasets
        && only.eq_ignore_ascii_case("auto")
    {
        return DEFAULT_EVENT_DATASETS
            .iter()
            .map(|ds| (*ds).to_owned())
            .collect();
    }
    datasets.to_vec()
}
