#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Vessel tracking API client and paginated event fetchers.
//!
//! [`TrackingApi`] is the seam between the ingestion pipeline and the
//! upstream HTTP service: production code uses the [`client::ApiClient`]
//! implementation, tests substitute scripted fakes.

pub mod client;
pub mod events;
pub mod progress;

use async_trait::async_trait;
use seatrace_tracking_models::{DateRange, EventsPage};

/// Errors that can occur while talking to the tracking API.
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    /// HTTP request failed (transport, timeout, or non-2xx status).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The upstream tracking API surface consumed by the pipeline.
///
/// One events-listing endpoint plus the two per-vessel enrichment
/// endpoints. Implementations must be safe to share across worker tasks.
#[async_trait]
pub trait TrackingApi: Send + Sync {
    /// Fetches one page of events for a vessel and dataset.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] if the request or decoding fails.
    async fn events_page(
        &self,
        vessel_id: &str,
        dataset_id: &str,
        range: &DateRange,
        limit: u64,
        offset: u64,
    ) -> Result<EventsPage, TrackingError>;

    /// Fetches the summary insights document for a vessel.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] if the request or decoding fails.
    async fn vessel_insights(
        &self,
        vessel_id: &str,
        range: &DateRange,
    ) -> Result<serde_json::Value, TrackingError>;

    /// Fetches the identity details document for a vessel.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] if the request or decoding fails.
    async fn vessel_details(&self, vessel_id: &str) -> Result<serde_json::Value, TrackingError>;
}
