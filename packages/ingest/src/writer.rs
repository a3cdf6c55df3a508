//! Upsert writer: turns a fetched payload into store writes.
//!
//! A payload with no events writes nothing at all, so a zero-activity
//! window never overwrites a vessel's last-known-good enrichment with an
//! empty result.

use seatrace_ingest_models::{IngestOptions, TaskOutcome, VesselPayload};
use seatrace_store::{StoreError, VesselDoc, VesselStore};

/// Writes one vessel payload: the summary upsert, then (when the event
/// collection is enabled) the bulk event upsert.
///
/// # Errors
///
/// Returns [`StoreError`] on a hard store failure; the caller attributes
/// it to this vessel's outcome.
pub async fn write_payload(
    store: &dyn VesselStore,
    payload: &VesselPayload,
    options: &IngestOptions,
) -> Result<TaskOutcome, StoreError> {
    let vessel = &payload.vessel;

    if payload.events.is_empty() {
        log::info!("[{}] no events in window, skipping write", vessel.vessel_id);
        return Ok(TaskOutcome::skipped(vessel));
    }

    let enrichment = payload.enrichment.clone().unwrap_or_default();

    let doc = VesselDoc {
        vessel_id: vessel.vessel_id.clone(),
        name: vessel.name.clone(),
        insights: enrichment.insights,
        details: enrichment.details,
        events_count: payload.events.len() as u64,
        events_count_by_dataset: payload.events_count_by_dataset.clone(),
        events: options.embed_events.then(|| payload.events.clone()),
    };

    store.upsert_vessel(&doc).await?;

    let events_written = if options.write_events {
        store
            .upsert_events(&vessel.vessel_id, vessel.name.as_deref(), &payload.events)
            .await?
    } else {
        0
    };

    log::info!(
        "[{}] upserted summary ({} events, {events_written} written to event collection)",
        vessel.vessel_id,
        payload.events.len()
    );

    Ok(TaskOutcome {
        vessel_id: vessel.vessel_id.clone(),
        name: vessel.name.clone(),
        events_written,
        skipped: false,
        error: None,
    })
}
