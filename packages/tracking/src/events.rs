//! Paginated event fetching and per-vessel enrichment.
//!
//! [`fetch_dataset_events`] walks the offset-paginated events endpoint for
//! one `(vessel, dataset)` pair until the server stops returning a next
//! offset. Pages are accumulated in memory; event volume per vessel per
//! window is small (hundreds, not millions).

use seatrace_tracking_models::{DateRange, EventRecord, VesselEnrichment};

use crate::{TrackingApi, TrackingError};

/// Courtesy pause between page fetches. A fixed delay, not a rate limiter.
pub const PAGE_DELAY_MS: u64 = 50;

/// Fetches every event for one vessel and dataset within the date range.
///
/// Returns the tagged events plus the server-reported total for the
/// dataset. The total can exceed the accumulated count only if the server
/// misreports; callers treat it as informational.
///
/// # Errors
///
/// Returns [`TrackingError`] if any page request or decode fails. Pages
/// fetched before the failure are discarded with the error; the caller
/// fails the whole vessel task.
pub async fn fetch_dataset_events(
    api: &dyn TrackingApi,
    vessel_id: &str,
    dataset_id: &str,
    range: &DateRange,
    page_size: u64,
) -> Result<(Vec<EventRecord>, u64), TrackingError> {
    let mut events: Vec<EventRecord> = Vec::new();
    let mut offset: u64 = 0;
    let mut total: u64 = 0;

    loop {
        let page = api
            .events_page(vessel_id, dataset_id, range, page_size, offset)
            .await?;

        let count = page.entries.len();
        total = page.total.max(events.len() as u64 + count as u64);

        events.extend(
            page.entries
                .into_iter()
                .map(|entry| EventRecord::from_entry(dataset_id, vessel_id, entry)),
        );

        log::debug!(
            "[{vessel_id}] {dataset_id} offset {offset}: {count} events (accumulated: {})",
            events.len()
        );

        let Some(next) = page.next_offset else {
            break;
        };
        offset = next;

        tokio::time::sleep(std::time::Duration::from_millis(PAGE_DELAY_MS)).await;
    }

    log::info!(
        "[{vessel_id}] {dataset_id}: {} events (server total {total})",
        events.len()
    );

    Ok((events, total))
}

/// Fetches the insights and details documents for a vessel.
///
/// Callers invoke this only for vessels with at least one event: a vessel
/// with no activity in the window has nothing meaningful to enrich.
///
/// # Errors
///
/// Returns [`TrackingError`] if either call fails; the enclosing vessel
/// task fails with it.
pub async fn fetch_enrichment(
    api: &dyn TrackingApi,
    vessel_id: &str,
    range: &DateRange,
) -> Result<VesselEnrichment, TrackingError> {
    let insights = api.vessel_insights(vessel_id, range).await?;
    let details = api.vessel_details(vessel_id).await?;

    Ok(VesselEnrichment {
        insights: Some(insights),
        details: Some(details),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use seatrace_tracking_models::EventsPage;
    use serde_json::json;

    use super::*;

    /// Serves a scripted sequence of pages keyed by offset.
    struct PagedApi {
        pages: Vec<EventsPage>,
        requested_offsets: Mutex<Vec<u64>>,
    }

    #[async_trait]
    impl TrackingApi for PagedApi {
        async fn events_page(
            &self,
            _vessel_id: &str,
            _dataset_id: &str,
            _range: &DateRange,
            _limit: u64,
            offset: u64,
        ) -> Result<EventsPage, TrackingError> {
            self.requested_offsets.lock().unwrap().push(offset);
            let page = self
                .pages
                .iter()
                .find(|p| p.offset == offset)
                .expect("unexpected offset requested");
            Ok(page.clone())
        }

        async fn vessel_insights(
            &self,
            _vessel_id: &str,
            _range: &DateRange,
        ) -> Result<serde_json::Value, TrackingError> {
            Ok(json!({}))
        }

        async fn vessel_details(
            &self,
            _vessel_id: &str,
        ) -> Result<serde_json::Value, TrackingError> {
            Ok(json!({}))
        }
    }

    fn range() -> DateRange {
        DateRange {
            start_date: "2023-01-01".to_owned(),
            end_date: "2025-12-31".to_owned(),
        }
    }

    fn page(offset: u64, next: Option<u64>, ids: &[&str]) -> EventsPage {
        EventsPage {
            limit: 2,
            offset,
            next_offset: next,
            total: 3,
            entries: ids.iter().map(|id| json!({"id": id})).collect(),
        }
    }

    #[tokio::test]
    async fn walks_pages_until_next_offset_is_absent() {
        let api = PagedApi {
            pages: vec![
                page(0, Some(2), &["e1", "e2"]),
                page(2, None, &["e3"]),
            ],
            requested_offsets: Mutex::new(Vec::new()),
        };

        let (events, total) =
            fetch_dataset_events(&api, "v1", "ds-a", &range(), 2).await.unwrap();

        assert_eq!(events.len(), 3);
        assert_eq!(total, 3);
        assert_eq!(*api.requested_offsets.lock().unwrap(), vec![0, 2]);
        assert!(events.iter().all(|e| e.dataset_id == "ds-a"));
        assert!(events.iter().all(|e| e.vessel_id == "v1"));
        assert_eq!(events[2].event_id.as_deref(), Some("e3"));
    }

    #[tokio::test]
    async fn single_empty_page_yields_no_events() {
        let api = PagedApi {
            pages: vec![EventsPage {
                limit: 2,
                offset: 0,
                next_offset: None,
                total: 0,
                entries: Vec::new(),
            }],
            requested_offsets: Mutex::new(Vec::new()),
        };

        let (events, total) =
            fetch_dataset_events(&api, "v1", "ds-a", &range(), 2).await.unwrap();

        assert!(events.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn enrichment_returns_both_documents() {
        let api = PagedApi {
            pages: Vec::new(),
            requested_offsets: Mutex::new(Vec::new()),
        };

        let enrichment = fetch_enrichment(&api, "v1", &range()).await.unwrap();
        assert!(enrichment.insights.is_some());
        assert!(enrichment.details.is_some());
    }
}
