//! Bearer-authenticated HTTP client for the tracking gateway.
//!
//! Mirrors the upstream v3 API: a POST events-listing endpoint with
//! offset/limit query parameters, a POST insights endpoint, and a GET
//! per-vessel details endpoint.

use async_trait::async_trait;
use seatrace_tracking_models::{DateRange, EventsPage, VESSEL_IDENTITY_DATASET};
use serde_json::json;

use crate::{TrackingApi, TrackingError};

/// Default API gateway.
pub const DEFAULT_BASE_URL: &str = "https://gateway.api.globalfishingwatch.org";

/// Connect timeout for every outbound call.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Total request timeout; a stalled page fetch is treated as a transport
/// failure rather than hanging the vessel task.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Concrete [`TrackingApi`] implementation over `reqwest`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    /// Creates a client authenticated with the given bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Http`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(token: &str) -> Result<Self, TrackingError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_owned(),
            token: token.to_owned(),
        })
    }

    /// Overrides the gateway base URL (used to point at a local stub).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }
}

#[async_trait]
impl TrackingApi for ApiClient {
    async fn events_page(
        &self,
        vessel_id: &str,
        dataset_id: &str,
        range: &DateRange,
        limit: u64,
        offset: u64,
    ) -> Result<EventsPage, TrackingError> {
        let url = format!(
            "{}/v3/events?offset={offset}&limit={limit}",
            self.base_url
        );
        let body = json!({
            "datasets": [dataset_id],
            "startDate": range.start_date,
            "endDate": range.end_date,
            "vessels": [vessel_id],
        });

        log::debug!("POST {url} vessel={vessel_id} dataset={dataset_id}");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<EventsPage>().await?)
    }

    async fn vessel_insights(
        &self,
        vessel_id: &str,
        range: &DateRange,
    ) -> Result<serde_json::Value, TrackingError> {
        let url = format!("{}/v3/insights/vessels", self.base_url);
        let body = json!({
            "includes": ["FISHING"],
            "startDate": range.start_date,
            "endDate": range.end_date,
            "vessels": [{
                "datasetId": VESSEL_IDENTITY_DATASET,
                "vesselId": vessel_id,
            }],
        });

        log::debug!("POST {url} vessel={vessel_id}");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<serde_json::Value>().await?)
    }

    async fn vessel_details(&self, vessel_id: &str) -> Result<serde_json::Value, TrackingError> {
        let url = format!("{}/v3/vessels/{vessel_id}", self.base_url);

        log::debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .query(&[("dataset", VESSEL_IDENTITY_DATASET)])
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<serde_json::Value>().await?)
    }
}
