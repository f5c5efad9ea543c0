use crate::model::{ListingResult, ScraperError};

/// Produces the result record for one listing.
#[async_trait::async_trait]
pub trait ReviewSource: Send + Sync {
    async fn fetch_listing(&self, listing_id: &str, limit: u32) -> Result<ListingResult, ScraperError>;
}
