// Core records: RawRecord, Product, category/competition enums, error types.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed product category enumeration. Anything the source sends that we
/// don't recognize lands in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    Beauty,
    Fashion,
    Electronics,
    HomeLiving,
    Food,
    Health,
    Sports,
    #[default]
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Beauty => "Beauty",
            Category::Fashion => "Fashion",
            Category::Electronics => "Electronics",
            Category::HomeLiving => "Home & Living",
            Category::Food => "Food",
            Category::Health => "Health",
            Category::Sports => "Sports",
            Category::Other => "Other",
        }
    }

    /// Case-insensitive parse; unrecognized input maps to `Other`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "beauty" => Category::Beauty,
            "fashion" => Category::Fashion,
            "electronics" => Category::Electronics,
            "home & living" | "home and living" | "home" => Category::HomeLiving,
            "food" => Category::Food,
            "health" => Category::Health,
            "sports" => Category::Sports,
            _ => Category::Other,
        }
    }

    /// Typical TikTok Shop affiliate commission rate for this category, in percent.
    pub fn default_commission(&self) -> u32 {
        match self {
            Category::Beauty => 15,
            Category::Fashion => 12,
            Category::Electronics => 8,
            Category::HomeLiving => 10,
            Category::Food => 10,
            Category::Health => 15,
            Category::Sports => 12,
            Category::Other => 10,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Competition tier derived from the saturation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompetitionLevel {
    Low,
    Medium,
    High,
}

impl CompetitionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionLevel::Low => "Low",
            CompetitionLevel::Medium => "Medium",
            CompetitionLevel::High => "High",
        }
    }
}

impl std::fmt::Display for CompetitionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loosely-typed product data as extracted by the scrape API. Every field is
/// optional; the normalizer fills the gaps.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    pub product_name: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub sold_count: Option<u64>,
    pub sold_text: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
    pub category: Option<String>,
    pub seller_name: Option<String>,
    pub product_image: Option<String>,
    pub product_url: Option<String>,
    pub commission_rate: Option<f64>,
    pub affiliate_link: Option<String>,
}

/// Canonical product record. Created once by the normalizer; derived scores
/// (saturation, competition level) are recomputed on demand, never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub original_price: f64,
    pub discount_percentage: u32,
    pub sold_count: u64,
    pub sold_text: String,
    pub rating: f64,
    pub review_count: u64,
    pub category: Category,
    pub seller_name: String,
    pub image: String,
    pub url: String,
    pub affiliate_link: String,
    pub commission_rate: u32,
    pub growth_rate: u32,
    pub potential_earnings: f64,
    pub scraped_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("API key is not configured")]
    MissingApiKey,
    #[error("API key rejected by the scrape API")]
    InvalidApiKey,
    #[error("scrape API credits exhausted")]
    OutOfCredits,
    #[error("rate limited by the scrape API")]
    RateLimited,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected API response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("corrupt stored value: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}
