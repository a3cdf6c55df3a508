#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Document store for vessel summaries and activity events.
//!
//! [`VesselStore`] is the persistence seam: the pipeline only ever upserts,
//! so implementations need no read path beyond what tests inspect. The
//! MongoDB implementation is the production backend; [`memory::MemoryStore`]
//! backs `--dry-run` and tests.

pub mod memory;
pub mod mongo;

use std::collections::BTreeMap;

use async_trait::async_trait;
use seatrace_tracking_models::EventRecord;
use serde::Serialize;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// MongoDB driver error (connectivity, write failure, bad URI).
    #[error("store request failed: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// A document could not be converted to BSON.
    #[error("BSON conversion error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),

    /// A document could not be converted to JSON (in-memory backend).
    #[error("JSON conversion error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store rejected the operation outright.
    #[error("store unavailable: {message}")]
    Unavailable {
        /// Description of what went wrong.
        message: String,
    },
}

/// Summary fields persisted for one vessel.
///
/// The whole document is `$set`-replaced on every successful run:
/// last-writer-wins, no field-level merge history.
#[derive(Debug, Clone, Serialize)]
pub struct VesselDoc {
    /// Unique vessel key.
    pub vessel_id: String,
    /// Display name from the input list.
    pub name: Option<String>,
    /// Insights response body, verbatim.
    pub insights: Option<serde_json::Value>,
    /// Identity details response body, verbatim.
    pub details: Option<serde_json::Value>,
    /// Total events found across all datasets this run.
    pub events_count: u64,
    /// Server-reported totals per dataset.
    pub events_count_by_dataset: BTreeMap<String, u64>,
    /// Full event list, embedded only when the caller enables inline mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<EventRecord>>,
}

/// The persistence surface consumed by the ingestion pipeline.
///
/// Implementations must be safe for concurrent use from multiple worker
/// tasks; every operation is an upsert or insert-only write, so callers
/// never read-modify-write.
#[async_trait]
pub trait VesselStore: Send + Sync {
    /// Creates the uniqueness and lookup indexes the write paths rely on.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if index creation fails.
    async fn ensure_indexes(&self) -> Result<(), StoreError>;

    /// Upserts the vessel summary document, keyed by `vessel_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    async fn upsert_vessel(&self, doc: &VesselDoc) -> Result<(), StoreError>;

    /// Bulk-upserts individual event documents for one vessel.
    ///
    /// Events with a stable id are keyed `(vessel_id, event_id)` and
    /// replaced; events without one are written insert-only under a fresh
    /// random disambiguator. Returns the number of events written; on a
    /// partial bulk failure implementations report the full attempted
    /// count (a documented approximation).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on a hard connectivity or batch-level
    /// failure.
    async fn upsert_events(
        &self,
        vessel_id: &str,
        name: Option<&str>,
        events: &[EventRecord],
    ) -> Result<u64, StoreError>;
}
