// Firecrawl v1 API client: JSON-schema extraction for product pages plus
// keyword search with a metadata fallback.
use crate::model::{RawRecord, ScrapeError};
use crate::normalizer::guess_category;
use crate::scraper::traits::ProductSource;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.firecrawl.dev/v1";

/// At most this many search hits are scraped individually before falling back
/// to search metadata.
const MAX_DETAIL_SCRAPES: usize = 5;

pub struct FirecrawlClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    data: Option<ScrapeData>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    json: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ListingPayload {
    #[serde(default)]
    products: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    url: Option<String>,
    title: Option<String>,
    markdown: Option<String>,
    metadata: Option<SearchHitMetadata>,
}

#[derive(Debug, Deserialize)]
struct SearchHitMetadata {
    title: Option<String>,
    #[serde(rename = "siteName")]
    site_name: Option<String>,
    #[serde(rename = "ogImage")]
    og_image: Option<String>,
}

impl FirecrawlClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self, ScrapeError> {
        if api_key.trim().is_empty() {
            return Err(ScrapeError::MissingApiKey);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { client, base_url, api_key })
    }

    async fn post(&self, endpoint: &str, body: Value) -> Result<reqwest::Response, ScrapeError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(ScrapeError::InvalidApiKey),
            StatusCode::PAYMENT_REQUIRED => Err(ScrapeError::OutOfCredits),
            StatusCode::TOO_MANY_REQUESTS => Err(ScrapeError::RateLimited),
            status if !status.is_success() => {
                let message = response.text().await.unwrap_or_default();
                Err(ScrapeError::InvalidResponse(format!("{status}: {message}")))
            }
            _ => Ok(response),
        }
    }

    async fn scrape_json(&self, url: &str, schema: Value, timeout_ms: u64) -> Result<Value, ScrapeError> {
        let body = json!({
            "url": url,
            "formats": [{ "type": "json", "schema": schema }],
            "actions": [
                { "type": "wait", "milliseconds": 2000 },
                { "type": "scroll", "direction": "down" }
            ],
            "timeout": timeout_ms,
        });
        let response: ScrapeResponse = self.post("/scrape", body).await?.json().await?;
        response
            .data
            .and_then(|d| d.json)
            .ok_or_else(|| ScrapeError::InvalidResponse("no extracted JSON in response".into()))
    }

    /// Builds a raw record from search metadata when per-page extraction came
    /// up empty. Title-based category guess, price sniffed from page text.
    fn record_from_hit(hit: &SearchHit, keyword: &str, index: usize) -> RawRecord {
        let title = hit
            .title
            .clone()
            .or_else(|| hit.metadata.as_ref().and_then(|m| m.title.clone()))
            .unwrap_or_else(|| format!("{keyword} product {}", index + 1));
        let title: String = title.chars().take(100).collect();

        RawRecord {
            price: hit.markdown.as_deref().and_then(extract_price),
            category: Some(guess_category(&title).as_str().to_string()),
            seller_name: hit.metadata.as_ref().and_then(|m| m.site_name.clone()),
            product_image: hit.metadata.as_ref().and_then(|m| m.og_image.clone()),
            product_url: hit.url.clone(),
            product_name: Some(title),
            ..RawRecord::default()
        }
    }
}

#[async_trait::async_trait]
impl ProductSource for FirecrawlClient {
    async fn scrape_product(&self, url: &str) -> Result<RawRecord, ScrapeError> {
        let payload = self.scrape_json(url, product_schema(), 30_000).await?;
        serde_json::from_value(payload)
            .map_err(|e| ScrapeError::InvalidResponse(e.to_string()))
    }

    async fn scrape_listing(&self, url: &str) -> Result<Vec<RawRecord>, ScrapeError> {
        let payload = self.scrape_json(url, listing_schema(), 60_000).await?;
        let listing: ListingPayload = serde_json::from_value(payload)
            .map_err(|e| ScrapeError::InvalidResponse(e.to_string()))?;
        Ok(listing.products)
    }

    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<RawRecord>, ScrapeError> {
        let body = json!({
            "query": format!("{keyword} TikTok Shop"),
            "limit": limit * 2,
            "scrapeOptions": { "formats": ["markdown"], "onlyMainContent": true },
        });
        let response: SearchResponse = self.post("/search", body).await?.json().await?;

        let product_urls: Vec<String> = response
            .data
            .iter()
            .filter_map(|hit| hit.url.clone())
            .filter(|url| looks_like_product_url(url))
            .take(limit)
            .collect();
        info!("search '{}': {} candidate product pages", keyword, product_urls.len());

        // Scrape candidates individually. One bad page must not sink the batch.
        let mut records = Vec::new();
        for url in product_urls.iter().take(MAX_DETAIL_SCRAPES) {
            match self.scrape_product(url).await {
                Ok(record) if record.product_name.is_some() => records.push(record),
                Ok(_) => warn!("no product data extracted from {}", url),
                Err(e) => warn!("failed to scrape {}: {}", url, e),
            }
        }

        // Fall back to search metadata when extraction failed everywhere.
        if records.is_empty() {
            records = response
                .data
                .iter()
                .take(limit)
                .enumerate()
                .map(|(i, hit)| Self::record_from_hit(hit, keyword, i))
                .collect();
        }
        Ok(records)
    }
}

fn looks_like_product_url(url: &str) -> bool {
    url.contains("tiktok.com")
        || url.contains("shop.tiktok")
        || url.contains("product")
        || url.contains("item")
}

/// First plausible price figure in scraped page text.
fn extract_price(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b',' || bytes[i] == b'.') {
                i += 1;
            }
            let candidate: String = text[start..i].chars().filter(|&c| c != ',').collect();
            if let Ok(price) = candidate.parse::<f64>() {
                if price > 0.0 {
                    return Some(price);
                }
            }
        } else {
            i += 1;
        }
    }
    None
}

fn product_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "product_name": { "type": "string", "description": "Name of the product" },
            "price": { "type": "number", "description": "Current price in local currency" },
            "original_price": { "type": "number", "description": "Original price before discount" },
            "discount_percentage": { "type": "number", "description": "Discount percentage" },
            "sold_count": { "type": "number", "description": "Number of items sold" },
            "sold_text": { "type": "string", "description": "Sold count as displayed text" },
            "rating": { "type": "number", "description": "Product rating out of 5" },
            "review_count": { "type": "number", "description": "Number of reviews" },
            "category": { "type": "string", "description": "Product category" },
            "seller_name": { "type": "string", "description": "Seller/Shop name" },
            "product_image": { "type": "string", "description": "Main product image URL" },
            "product_url": { "type": "string", "description": "Product URL" },
            "commission_rate": { "type": "number", "description": "Affiliate commission rate if available" },
            "affiliate_link": { "type": "string", "description": "Affiliate link if available" }
        },
        "required": ["product_name", "price"]
    })
}

fn listing_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "products": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "product_name": { "type": "string" },
                        "price": { "type": "number" },
                        "original_price": { "type": "number" },
                        "sold_count": { "type": "number" },
                        "sold_text": { "type": "string" },
                        "rating": { "type": "number" },
                        "category": { "type": "string" },
                        "seller_name": { "type": "string" },
                        "product_image": { "type": "string" },
                        "product_url": { "type": "string" }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_url_detection() {
        assert!(looks_like_product_url("https://shop.tiktok.com/view/x"));
        assert!(looks_like_product_url("https://example.com/product/123"));
        assert!(!looks_like_product_url("https://example.com/blog/post"));
    }

    #[test]
    fn price_extraction_from_page_text() {
        assert_eq!(extract_price("only ฿1,299.00 today"), Some(1299.0));
        assert_eq!(extract_price("$49 flash sale"), Some(49.0));
        assert_eq!(extract_price("no numbers"), None);
    }

    #[test]
    fn metadata_fallback_guesses_category() {
        let hit = SearchHit {
            url: Some("https://shop.tiktok.com/item/1".to_string()),
            title: Some("Velvet Lip Tint".to_string()),
            markdown: Some("best seller at ฿259".to_string()),
            metadata: None,
        };
        let record = FirecrawlClient::record_from_hit(&hit, "lip tint", 0);
        assert_eq!(record.category.as_deref(), Some("Beauty"));
        assert_eq!(record.price, Some(259.0));
        assert_eq!(record.product_url.as_deref(), Some("https://shop.tiktok.com/item/1"));
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let err = FirecrawlClient::new("  ".to_string(), DEFAULT_BASE_URL.to_string());
        assert!(matches!(err, Err(ScrapeError::MissingApiKey)));
    }
}
