//! In-memory [`VesselStore`] for `--dry-run` and tests.
//!
//! Keeps the same keying discipline as the MongoDB backend: vessels by
//! `vessel_id`, events by `(vessel_id, event_id)` with fresh random keys
//! for events lacking a stable id. A configurable failure set lets tests
//! exercise the partial-failure paths without a live server.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use seatrace_tracking_models::EventRecord;

use crate::{StoreError, VesselDoc, VesselStore};

#[derive(Default)]
struct Inner {
    vessels: BTreeMap<String, serde_json::Value>,
    events: BTreeMap<(String, String), serde_json::Value>,
    failing_vessels: BTreeSet<String>,
}

/// Mutex-guarded in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write for `vessel_id` fail with
    /// [`StoreError::Unavailable`].
    pub fn fail_writes_for(&self, vessel_id: &str) {
        self.lock().failing_vessels.insert(vessel_id.to_owned());
    }

    /// Returns the stored summary document for a vessel, if any.
    #[must_use]
    pub fn vessel(&self, vessel_id: &str) -> Option<serde_json::Value> {
        self.lock().vessels.get(vessel_id).cloned()
    }

    /// Number of vessel summary documents stored.
    #[must_use]
    pub fn vessel_count(&self) -> usize {
        self.lock().vessels.len()
    }

    /// Number of individual event documents stored.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.lock().events.len()
    }

    /// Event documents stored for one vessel.
    #[must_use]
    pub fn events_for(&self, vessel_id: &str) -> Vec<serde_json::Value> {
        self.lock()
            .events
            .iter()
            .filter(|((vid, _), _)| vid == vessel_id)
            .map(|(_, doc)| doc.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn check_available(inner: &Inner, vessel_id: &str) -> Result<(), StoreError> {
        if inner.failing_vessels.contains(vessel_id) {
            return Err(StoreError::Unavailable {
                message: format!("injected write failure for {vessel_id}"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VesselStore for MemoryStore {
    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn upsert_vessel(&self, doc: &VesselDoc) -> Result<(), StoreError> {
        let mut inner = self.lock();
        Self::check_available(&inner, &doc.vessel_id)?;

        let value = serde_json::to_value(doc)?;
        inner.vessels.insert(doc.vessel_id.clone(), value);
        Ok(())
    }

    async fn upsert_events(
        &self,
        vessel_id: &str,
        name: Option<&str>,
        events: &[EventRecord],
    ) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        Self::check_available(&inner, vessel_id)?;

        for event in events {
            let key = event.event_id.clone().unwrap_or_else(|| {
                // Insert-only: anonymous events never overwrite anything.
                uuid::Uuid::new_v4().simple().to_string()
            });

            let mut doc = match &event.fields {
                serde_json::Value::Object(map) => map.clone(),
                other => {
                    let mut map = serde_json::Map::new();
                    map.insert("payload".to_owned(), other.clone());
                    map
                }
            };
            doc.insert("dataset_id".to_owned(), event.dataset_id.clone().into());
            doc.insert("vessel_id".to_owned(), vessel_id.into());
            doc.insert(
                "name".to_owned(),
                name.map_or(serde_json::Value::Null, Into::into),
            );

            inner
                .events
                .insert((vessel_id.to_owned(), key), serde_json::Value::Object(doc));
        }

        Ok(events.len() as u64)
    }
}
