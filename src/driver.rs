// Bounded concurrent fan-out over listing ids
use crate::config::{Mode, Settings};
use crate::model::{ListingResult, ScraperError};
use crate::scraper::{AirbnbClient, MockSource, ReviewSource};

use futures::stream::{self, StreamExt};
use std::pin::pin;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Picks the live client or the fixture-backed source for `mode`.
pub fn build_source(mode: Mode, settings: &Settings) -> Result<Arc<dyn ReviewSource>, ScraperError> {
    let source: Arc<dyn ReviewSource> = match mode {
        Mode::Live => Arc::new(AirbnbClient::new(settings)?),
        Mode::Mock => Arc::new(MockSource::new(settings.mock_fixture.clone())),
    };
    Ok(source)
}

pub struct FetchDriver {
    source: Arc<dyn ReviewSource>,
    concurrency: usize,
}

impl FetchDriver {
    pub fn new(source: Arc<dyn ReviewSource>, concurrency: usize) -> Self {
        if concurrency == 0 {
            warn!("Concurrency must be at least 1, using 1");
        }
        Self {
            source,
            concurrency: concurrency.max(1),
        }
    }

    /// Runs one task per listing, at most `concurrency` at a time.
    ///
    /// Results come back in completion order. A task that fails or panics is
    /// logged and left out; it never affects the other tasks.
    pub async fn run(&self, roomids: &[String], limit: u32) -> Vec<ListingResult> {
        let total = roomids.len();
        let tasks = stream::iter(roomids.iter().cloned())
            .map(|roomid| {
                let source = Arc::clone(&self.source);
                async move {
                    let task_id = roomid.clone();
                    let outcome = tokio::spawn(async move { source.fetch_listing(&task_id, limit).await }).await;
                    (roomid, outcome)
                }
            })
            .buffer_unordered(self.concurrency);
        let mut tasks = pin!(tasks);

        let mut results = Vec::with_capacity(total);
        let mut done = 0;
        while let Some((roomid, outcome)) = tasks.next().await {
            done += 1;
            match outcome {
                Ok(Ok(result)) => {
                    info!("Collected {} review(s) for {} [{}/{}]", result.count, roomid, done, total);
                    results.push(result);
                }
                Ok(Err(e)) => error!("Task failed for {}: {} [{}/{}]", roomid, e, done, total),
                Err(e) => error!("Task for {} aborted: {} [{}/{}]", roomid, e, done, total),
            }
        }
        results
    }
}
