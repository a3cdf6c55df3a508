//! Per-vessel task runner.
//!
//! One vessel task covers every requested dataset plus the enrichment
//! pair. Dataset fetches run sequentially, which bounds per-vessel
//! concurrency and keeps accumulation simple; the scheduler provides the
//! cross-vessel parallelism.

use std::collections::BTreeMap;

use seatrace_ingest_models::{IngestOptions, VesselPayload, VesselRef};
use seatrace_tracking::events::{fetch_dataset_events, fetch_enrichment};
use seatrace_tracking::{TrackingApi, TrackingError};
use seatrace_tracking_models::resolve_datasets;

/// Fetches all datasets and enrichment for one vessel and assembles the
/// upsert payload. Performs no writes.
///
/// Enrichment is only fetched when at least one event was found: a
/// vessel with no activity in the window has nothing meaningful to
/// enrich, and skipping the calls keeps zero-activity runs cheap.
///
/// # Errors
///
/// Returns [`TrackingError`] on the first dataset or enrichment failure;
/// the vessel task is all-or-nothing for a given run.
pub async fn run_vessel(
    api: &dyn TrackingApi,
    vessel: &VesselRef,
    options: &IngestOptions,
) -> Result<VesselPayload, TrackingError> {
    let datasets = resolve_datasets(&options.datasets);

    let mut events = Vec::new();
    let mut events_count_by_dataset = BTreeMap::new();

    for dataset_id in &datasets {
        let (dataset_events, total) = fetch_dataset_events(
            api,
            &vessel.vessel_id,
            dataset_id,
            &options.range,
            options.page_size,
        )
        .await?;

        events_count_by_dataset.insert(dataset_id.clone(), total);
        events.extend(dataset_events);
    }

    let enrichment = if events.is_empty() {
        None
    } else {
        Some(fetch_enrichment(api, &vessel.vessel_id, &options.range).await?)
    };

    Ok(VesselPayload {
        vessel: vessel.clone(),
        enrichment,
        events,
        events_count_by_dataset,
    })
}

#[cfg(test)]
mod tests {
    use seatrace_tracking_models::DateRange;
    use serde_json::json;

    use crate::testing::ScriptedApi;

    use super::*;

    fn options(datasets: &[&str]) -> IngestOptions {
        IngestOptions {
            range: DateRange {
                start_date: "2023-01-01".to_owned(),
                end_date: "2025-12-31".to_owned(),
            },
            datasets: datasets.iter().map(|ds| (*ds).to_owned()).collect(),
            page_size: 2,
            workers: 1,
            embed_events: true,
            write_events: false,
        }
    }

    fn vessel(id: &str, name: &str) -> VesselRef {
        VesselRef {
            vessel_id: id.to_owned(),
            name: Some(name.to_owned()),
        }
    }

    #[tokio::test]
    async fn merges_events_across_datasets() {
        let api = ScriptedApi::new()
            .with_events("v1", "ds-a", vec![json!({"id": "a1"}), json!({"id": "a2"})])
            .with_events("v1", "ds-b", vec![json!({"id": "b1"})]);

        let payload = run_vessel(&api, &vessel("v1", "Alpha"), &options(&["ds-a", "ds-b"]))
            .await
            .unwrap();

        assert_eq!(payload.events.len(), 3);
        assert_eq!(payload.events_count_by_dataset["ds-a"], 2);
        assert_eq!(payload.events_count_by_dataset["ds-b"], 1);
        assert!(payload.enrichment.is_some());
    }

    #[tokio::test]
    async fn zero_event_vessel_skips_enrichment() {
        let api = ScriptedApi::new();

        let payload = run_vessel(&api, &vessel("v1", "Alpha"), &options(&["ds-a"]))
            .await
            .unwrap();

        assert!(payload.events.is_empty());
        assert!(payload.enrichment.is_none());
        assert_eq!(api.insights_calls_for("v1"), 0);
        assert_eq!(api.details_calls_for("v1"), 0);
        // The dataset total is still recorded, as zero.
        assert_eq!(payload.events_count_by_dataset["ds-a"], 0);
    }

    #[tokio::test]
    async fn enrichment_is_fetched_once_for_active_vessels() {
        let api = ScriptedApi::new()
            .with_events("v1", "ds-a", vec![json!({"id": "a1"})])
            .with_events("v1", "ds-b", vec![json!({"id": "b1"})]);

        run_vessel(&api, &vessel("v1", "Alpha"), &options(&["ds-a", "ds-b"]))
            .await
            .unwrap();

        assert_eq!(api.insights_calls_for("v1"), 1);
        assert_eq!(api.details_calls_for("v1"), 1);
    }

    #[tokio::test]
    async fn auto_sentinel_queries_the_default_datasets() {
        let api = ScriptedApi::new().with_events(
            "v1",
            "public-global-loitering-events:latest",
            vec![json!({"id": "l1"})],
        );

        let payload = run_vessel(&api, &vessel("v1", "Alpha"), &options(&["auto"]))
            .await
            .unwrap();

        assert_eq!(payload.events.len(), 1);
        assert_eq!(payload.events_count_by_dataset.len(), 4);
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let api = ScriptedApi::new().with_failing_vessel("v1");

        let result = run_vessel(&api, &vessel("v1", "Alpha"), &options(&["ds-a"])).await;
        assert!(result.is_err());
    }
}
