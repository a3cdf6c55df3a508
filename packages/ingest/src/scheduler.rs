//! Bounded-concurrency vessel scheduler.
//!
//! One future per vessel, at most `workers` in flight. This is the sole
//! boundary where task errors become data: a vessel's failure is caught
//! here and converted into its [`TaskOutcome`], never aborting siblings
//! or the job.

use std::sync::Arc;

use futures::StreamExt as _;
use futures::stream;
use seatrace_ingest_models::{IngestOptions, TaskOutcome, VesselRef};
use seatrace_store::VesselStore;
use seatrace_tracking::TrackingApi;
use seatrace_tracking::progress::ProgressCallback;

use crate::runner::run_vessel;
use crate::writer::write_payload;

/// Runs one vessel task end to end, converting any failure into the
/// outcome for that vessel.
async fn process_vessel(
    api: &dyn TrackingApi,
    store: &dyn VesselStore,
    vessel: &VesselRef,
    options: &IngestOptions,
) -> TaskOutcome {
    let payload = match run_vessel(api, vessel, options).await {
        Ok(payload) => payload,
        Err(e) => {
            log::warn!("[{}] fetch failed: {e}", vessel.vessel_id);
            return TaskOutcome::failed(vessel, e.to_string());
        }
    };

    match write_payload(store, &payload, options).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log::warn!("[{}] write failed: {e}", vessel.vessel_id);
            TaskOutcome::failed(vessel, e.to_string())
        }
    }
}

/// Dispatches one task per vessel across a pool of at most
/// `options.workers` concurrent tasks and collects every outcome.
///
/// Outcomes arrive in completion order, not submission order. The
/// returned vector is complete: the call joins every task before
/// returning. Duplicate vessel ids are dispatched as-is.
pub async fn run_job(
    api: &Arc<dyn TrackingApi>,
    store: &Arc<dyn VesselStore>,
    vessels: &[VesselRef],
    options: &IngestOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Vec<TaskOutcome> {
    progress.set_total(vessels.len() as u64);

    let outcomes: Vec<TaskOutcome> = stream::iter(vessels.iter().map(|vessel| {
        let api = Arc::clone(api);
        let store = Arc::clone(store);
        let progress = Arc::clone(progress);
        async move {
            let outcome = process_vessel(api.as_ref(), store.as_ref(), vessel, options).await;
            progress.inc(1);
            outcome
        }
    }))
    .buffer_unordered(options.workers.max(1))
    .collect()
    .await;

    outcomes
}
