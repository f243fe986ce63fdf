use crate::model::ConfigError;
use crate::scraper::firecrawl::DEFAULT_BASE_URL;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub firecrawl_api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Appended to product URLs that come without an affiliate link.
    #[serde(default = "default_affiliate_tag")]
    pub affiliate_tag: String,
    pub searches: Vec<SearchConfig>,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_minutes: i64,
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// Growth floor for the trending report.
    #[serde(default)]
    pub min_growth: u32,
    /// Commission floor for the top-commission report.
    #[serde(default = "default_min_commission")]
    pub min_commission: u32,
    /// Sort order for the filtered listing: growth, commission, sales,
    /// competition, earnings, price-low, price-high.
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
}

fn default_limit() -> usize {
    10
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_affiliate_tag() -> String {
    "your_id".to_string()
}

fn default_cache_ttl() -> i64 {
    30
}

fn default_db_path() -> String {
    "data.db".to_string()
}

fn default_min_commission() -> u32 {
    10
}

fn default_sort_by() -> String {
    "growth".to_string()
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "firecrawl_api_key": "fc-test", "searches": [{ "query": "lip tint" }] }"#,
        )
        .unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.searches[0].limit, 10);
        assert_eq!(config.cache_ttl_minutes, 30);
        assert_eq!(config.min_growth, 0);
        assert_eq!(config.min_commission, 10);
        assert_eq!(config.sort_by, "growth");
    }
}
