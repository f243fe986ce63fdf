use crate::model::{RawRecord, ScrapeError};

/// Seam over the external content-extraction API.
#[async_trait::async_trait]
pub trait ProductSource: Send + Sync {
    /// Extracts a single product from a product page.
    async fn scrape_product(&self, url: &str) -> Result<RawRecord, ScrapeError>;

    /// Extracts every product found on a shop or listing page.
    async fn scrape_listing(&self, url: &str) -> Result<Vec<RawRecord>, ScrapeError>;

    /// Keyword search returning raw records for the best product matches.
    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<RawRecord>, ScrapeError>;
}
