// Offline sample data. Used when every configured search fails, so the
// pipeline and report still have something to chew on.
use crate::model::{Category, Product, RawRecord};
use crate::normalizer::normalize_all;
use rand::Rng;

const DEMO_CATEGORIES: [Category; 5] = [
    Category::Beauty,
    Category::Fashion,
    Category::Electronics,
    Category::HomeLiving,
    Category::Food,
];

pub fn sample_products(count: usize, affiliate_tag: &str) -> Vec<Product> {
    let mut rng = rand::rng();
    let raws: Vec<RawRecord> = (0..count)
        .map(|i| {
            let category = DEMO_CATEGORIES[i % DEMO_CATEGORIES.len()];
            let price = rng.random_range(100..=2000) as f64;
            RawRecord {
                product_name: Some(format!("Sample {} Product {}", category, i + 1)),
                price: Some(price),
                original_price: Some(price * rng.random_range(1.0..=1.5)),
                sold_count: Some(rng.random_range(100..=10_000)),
                rating: Some(rng.random_range(4.0..=5.0)),
                review_count: Some(rng.random_range(0..=500)),
                category: Some(category.as_str().to_string()),
                seller_name: Some(format!("Shop {}", i + 1)),
                product_url: Some("https://shop.tiktok.com".to_string()),
                ..RawRecord::default()
            }
        })
        .collect();
    normalize_all(&raws, "https://shop.tiktok.com", affiliate_tag)
}
