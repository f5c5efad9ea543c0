use crate::config::{AirbnbConfig, Settings};
use crate::model::{ListingResult, ScraperError};
use crate::parser::{UpstreamPayload, extract_from_upstream};
use crate::scraper::traits::ReviewSource;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

const MAX_BACKOFF_SECS: u64 = 10;

/// Query variables the web app sends to PdpReviews (observed shape).
#[derive(Debug, Serialize)]
struct QueryVariables<'a> {
    request: ReviewsRequest<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewsRequest<'a> {
    field_selector: &'a str,
    limit: u32,
    listing_id: &'a str,
    offset: u32,
    showing_translation_button: bool,
    number_of_stars: u32,
    cursor: Option<&'a str>,
    search_type: &'a str,
    is_order_by_most_relevant: bool,
    language: &'a str,
}

/// Client for the unofficial PdpReviews endpoint. One instance is shared by
/// every task; `reqwest::Client` pools connections internally.
pub struct AirbnbClient {
    client: Client,
    config: AirbnbConfig,
    max_attempts: u32,
}

impl AirbnbClient {
    pub fn new(settings: &Settings) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.request_timeout_seconds))
            .default_headers(build_headers(&settings.airbnb.headers))
            .build()
            .map_err(|e| ScraperError::Transport(e.to_string()))?;

        debug!(
            "retry_backoff_seconds={} ignored, backoff is 1s doubling up to {}s",
            settings.retry_backoff_seconds, MAX_BACKOFF_SECS
        );

        Ok(Self {
            client,
            config: settings.airbnb.clone(),
            max_attempts: settings.max_retries.max(1),
        })
    }

    fn query_params(&self, listing_id: &str, limit: u32) -> Result<Vec<(&'static str, String)>, ScraperError> {
        // Single page only: cursor stays null.
        let variables = QueryVariables {
            request: ReviewsRequest {
                field_selector: "for_p3",
                limit,
                listing_id,
                offset: 0,
                showing_translation_button: true,
                number_of_stars: 0,
                cursor: None,
                search_type: "PAGINATION",
                is_order_by_most_relevant: false,
                language: &self.config.locale,
            },
        };
        let variables = serde_json::to_string(&variables).map_err(|e| ScraperError::Decode(e.to_string()))?;

        Ok(vec![
            ("operationName", self.config.operation_name.clone()),
            ("locale", self.config.locale.clone()),
            ("currency", self.config.currency.clone()),
            ("variables", variables),
        ])
    }

    /// Fetches one page of reviews. Transport failures are retried with
    /// backoff; an HTTP error status or an undecodable body is returned at once.
    pub async fn fetch_reviews(&self, listing_id: &str, limit: u32) -> Result<UpstreamPayload, ScraperError> {
        let params = self.query_params(listing_id, limit)?;
        let mut attempt = 1;

        loop {
            debug!("Requesting reviews for {} (attempt {})", listing_id, attempt);
            match self.fetch_once(&params).await {
                Err(ScraperError::Transport(msg)) if attempt < self.max_attempts => {
                    let delay = backoff_delay(attempt);
                    warn!(
                        "Request for {} failed: {}. Retrying in {}s ({}/{})",
                        listing_id,
                        msg,
                        delay.as_secs(),
                        attempt,
                        self.max_attempts
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn fetch_once(&self, params: &[(&'static str, String)]) -> Result<UpstreamPayload, ScraperError> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(params)
            .send()
            .await
            .map_err(|e| ScraperError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::Status { status: status.as_u16() });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ScraperError::Transport(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| ScraperError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl ReviewSource for AirbnbClient {
    async fn fetch_listing(&self, listing_id: &str, limit: u32) -> Result<ListingResult, ScraperError> {
        let payload = self.fetch_reviews(listing_id, limit).await?;
        Ok(extract_from_upstream(listing_id, payload))
    }
}

/// Delay after the given failed attempt: 1s, 2s, 4s, 8s, then 10s.
pub fn backoff_delay(attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(6);
    Duration::from_secs((1u64 << exp).min(MAX_BACKOFF_SECS))
}

fn build_headers(extra: &HashMap<String, String>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in extra {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!("Skipping invalid header {:?}", name),
        }
    }
    headers
}
