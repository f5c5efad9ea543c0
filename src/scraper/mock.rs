// Offline source backed by a pre-recorded fixture file
use crate::model::{ListingResult, ScraperError};
use crate::parser::extract_from_mock;
use crate::scraper::traits::ReviewSource;
use crate::utils::read_json_file;

use serde_json::Value;
use std::path::PathBuf;

pub struct MockSource {
    fixture: PathBuf,
}

impl MockSource {
    pub fn new(fixture: impl Into<PathBuf>) -> Self {
        Self {
            fixture: fixture.into(),
        }
    }
}

#[async_trait::async_trait]
impl ReviewSource for MockSource {
    /// Each call re-reads the fixture; `limit` does not apply to recorded data.
    async fn fetch_listing(&self, listing_id: &str, _limit: u32) -> Result<ListingResult, ScraperError> {
        let fixture = self.fixture.clone();
        let payload: Value = tokio::task::spawn_blocking(move || read_json_file(&fixture))
            .await
            .map_err(|e| ScraperError::Fixture(e.to_string()))?
            .map_err(|e| ScraperError::Fixture(e.to_string()))?;
        extract_from_mock(listing_id, &payload)
    }
}
