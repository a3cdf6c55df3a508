//! Scripted [`TrackingApi`] fake shared by the pipeline tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use seatrace_tracking::{TrackingApi, TrackingError};
use seatrace_tracking_models::{DateRange, EventsPage};
use serde_json::json;

/// Serves canned event lists page-by-page and records enrichment calls.
#[derive(Default)]
pub struct ScriptedApi {
    events: BTreeMap<(String, String), Vec<serde_json::Value>>,
    failing_vessels: BTreeSet<String>,
    insights_calls: Mutex<Vec<String>>,
    details_calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the full event list for a `(vessel, dataset)` pair; pages
    /// are sliced from it according to the requested offset and limit.
    pub fn with_events(
        mut self,
        vessel_id: &str,
        dataset_id: &str,
        entries: Vec<serde_json::Value>,
    ) -> Self {
        self.events
            .insert((vessel_id.to_owned(), dataset_id.to_owned()), entries);
        self
    }

    /// Makes every call for `vessel_id` fail with a decode error.
    pub fn with_failing_vessel(mut self, vessel_id: &str) -> Self {
        self.failing_vessels.insert(vessel_id.to_owned());
        self
    }

    pub fn insights_calls_for(&self, vessel_id: &str) -> usize {
        self.insights_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|v| *v == vessel_id)
            .count()
    }

    pub fn details_calls_for(&self, vessel_id: &str) -> usize {
        self.details_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|v| *v == vessel_id)
            .count()
    }

    fn transport_error() -> TrackingError {
        serde_json::from_str::<EventsPage>("simulated transport failure")
            .unwrap_err()
            .into()
    }

    fn check(&self, vessel_id: &str) -> Result<(), TrackingError> {
        if self.failing_vessels.contains(vessel_id) {
            return Err(Self::transport_error());
        }
        Ok(())
    }
}

#[async_trait]
impl TrackingApi for ScriptedApi {
    async fn events_page(
        &self,
        vessel_id: &str,
        dataset_id: &str,
        _range: &DateRange,
        limit: u64,
        offset: u64,
    ) -> Result<EventsPage, TrackingError> {
        self.check(vessel_id)?;

        let all = self
            .events
            .get(&(vessel_id.to_owned(), dataset_id.to_owned()))
            .cloned()
            .unwrap_or_default();

        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(all.len());
        let end = start
            .saturating_add(usize::try_from(limit).unwrap_or(usize::MAX))
            .min(all.len());

        Ok(EventsPage {
            limit,
            offset,
            next_offset: (end < all.len()).then(|| end as u64),
            total: all.len() as u64,
            entries: all[start..end].to_vec(),
        })
    }

    async fn vessel_insights(
        &self,
        vessel_id: &str,
        _range: &DateRange,
    ) -> Result<serde_json::Value, TrackingError> {
        self.check(vessel_id)?;
        self.insights_calls
            .lock()
            .unwrap()
            .push(vessel_id.to_owned());
        Ok(json!({"apparentFishing": {"datasets": []}}))
    }

    async fn vessel_details(&self, vessel_id: &str) -> Result<serde_json::Value, TrackingError> {
        self.check(vessel_id)?;
        self.details_calls
            .lock()
            .unwrap()
            .push(vessel_id.to_owned());
        Ok(json!({"selfReportedInfo": []}))
    }
}
