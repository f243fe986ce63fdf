mod analyzer;
mod config;
mod demo;
mod model;
mod normalizer;
mod scraper;
mod storage;
mod utils;

use analyzer::query::{self, FilterCriteria, SortKey};
use analyzer::scoring;
use config::{load_config, AppConfig, SearchConfig};
use futures::future::join_all;
use model::Product;
use normalizer::normalize_all;
use scraper::{FirecrawlClient, ProductSource};
use std::sync::Arc;
use storage::SqliteStorage;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use utils::format_earnings;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {panic_info:?}");
    }));

    let config: Arc<AppConfig> = match load_config("config.json") {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let storage = match SqliteStorage::new(&config.db_path) {
        Ok(s) => Arc::new(Mutex::new(s)),
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            return;
        }
    };

    let client = match FirecrawlClient::new(
        config.firecrawl_api_key.clone(),
        config.base_url.clone(),
    ) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create scrape client: {}", e);
            return;
        }
    };

    match storage.lock().await.wishlist() {
        Ok(saved) => info!("{} products on the wishlist", saved.len()),
        Err(e) => warn!("Wishlist read failed: {}", e),
    }

    info!("Searches to run: {}", config.searches.len());

    // Run all searches concurrently; one failed search must not abort the rest.
    let tasks: Vec<_> = config
        .searches
        .iter()
        .map(|search| run_search(search, &client, storage.clone(), config.clone()))
        .collect();
    let mut products: Vec<Product> = join_all(tasks).await.into_iter().flatten().collect();

    if products.is_empty() {
        warn!("No products from any search; loading demo data");
        products = demo::sample_products(20, &config.affiliate_tag);
    }

    report(&products, &config);
}

/// Fetches one configured search: cache lookup, then either a direct scrape
/// (URL input) or a keyword search, then normalization and caching.
async fn run_search(
    search: &SearchConfig,
    client: &FirecrawlClient,
    storage: Arc<Mutex<SqliteStorage>>,
    config: Arc<AppConfig>,
) -> Vec<Product> {
    let cache_key = format!("search_{}_{}", search.query, search.limit);

    match storage.lock().await.cached_products(&cache_key) {
        Ok(Some(products)) => {
            info!("'{}': {} products from cache", search.query, products.len());
            return products;
        }
        Ok(None) => {}
        Err(e) => warn!("Cache read failed for '{}': {}", search.query, e),
    }

    info!("Fetching '{}'...", search.query);
    let raws = if search.query.starts_with("http") {
        if search.query.contains("/product/") || search.query.contains("item_id") {
            client
                .scrape_product(&search.query)
                .await
                .map(|raw| vec![raw])
        } else {
            client.scrape_listing(&search.query).await
        }
    } else {
        client.search(&search.query, search.limit).await
    };

    let raws = match raws {
        Ok(raws) => raws,
        Err(e) => {
            warn!("'{}' failed: {}", search.query, e);
            return Vec::new();
        }
    };

    let products = normalize_all(&raws, &search.query, &config.affiliate_tag);
    info!("'{}': {} products", search.query, products.len());

    if let Err(e) = storage
        .lock()
        .await
        .cache_products(&cache_key, &products, config.cache_ttl_minutes)
    {
        warn!("Cache write failed for '{}': {}", search.query, e);
    }
    products
}

/// Logs the collection-level report: summary statistics, chart distributions,
/// and the top entries of each product segment.
fn report(products: &[Product], config: &AppConfig) {
    let stats = analyzer::statistics(products);
    info!(
        "{} products | avg growth {}% | avg commission {}% | avg price ฿{} | est. total {}/mo",
        stats.count,
        stats.avg_growth,
        stats.avg_commission,
        stats.avg_price,
        format_earnings(stats.total_potential_earnings as f64),
    );
    info!("Hidden gems in collection: {}", stats.hidden_gems_count);

    for bucket in analyzer::growth_distribution(products) {
        info!("Growth {}: {} products", bucket.label, bucket.count);
    }
    for summary in analyzer::category_breakdown(products) {
        info!(
            "{}: {} products, {} units sold, est. {}/mo",
            summary.category,
            summary.count,
            summary.total_sales,
            format_earnings(summary.total_earnings),
        );
    }

    // The main listing: config-driven filter bar plus sort order.
    let criteria = FilterCriteria {
        min_growth: (config.min_growth > 0).then_some(config.min_growth),
        min_commission: (config.min_commission > 0).then_some(config.min_commission),
        ..Default::default()
    };
    let listing = query::sort(
        &query::filter(products, &criteria),
        SortKey::parse(&config.sort_by).unwrap_or(SortKey::Growth),
    );
    log_segment("Listing", &listing);

    log_segment("Trending", &query::find_trending(products, config.min_growth));
    log_segment("Hidden gems", &query::find_hidden_gems(products));
    log_segment("Rising stars", &query::find_rising_stars(products));
    log_segment(
        "Top commission",
        &query::find_top_commission(products, config.min_commission),
    );
}

fn log_segment(label: &str, products: &[Product]) {
    info!("{}: {} products", label, products.len());
    for p in products.iter().take(5) {
        let level = scoring::competition_level(scoring::saturation_score(p));
        info!(
            "  {} | +{}% growth | {}% commission | {} competition | {}/mo",
            p.name,
            p.growth_rate,
            p.commission_rate,
            level,
            format_earnings(p.potential_earnings),
        );
    }
}
