use crate::model::{Category, Product, RawRecord};
use chrono::Utc;

/// Image shown when the source has none.
const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x300?text=No+Image";
const PLACEHOLDER_NAME: &str = "Unknown Product";
const PLACEHOLDER_SELLER: &str = "Unknown Seller";

/// Keyword lists for guessing a category from a free-text title.
/// Checked in order; first match wins.
const CATEGORY_KEYWORDS: [(Category, &[&str]); 7] = [
    (Category::Beauty, &["beauty", "lip", "cream", "serum", "makeup", "skincare", "cosmetic"]),
    (Category::Fashion, &["bag", "dress", "shirt", "fashion", "shoe", "jacket", "jeans"]),
    (Category::Electronics, &["phone", "case", "headphone", "earbud", "charger", "gadget"]),
    (Category::HomeLiving, &["home", "kitchen", "decor", "lamp", "bedding", "furniture"]),
    (Category::Food, &["food", "snack", "drink", "coffee", "tea", "sauce"]),
    (Category::Health, &["health", "vitamin", "supplement", "massage", "wellness"]),
    (Category::Sports, &["sport", "gym", "fitness", "yoga", "running", "workout"]),
];

pub fn normalize_all(raws: &[RawRecord], source_url: &str, affiliate_tag: &str) -> Vec<Product> {
    raws.iter()
        .enumerate()
        .map(|(i, raw)| normalize(raw, source_url, i, affiliate_tag))
        .collect()
}

/// Converts a loosely-typed scrape result into a canonical [`Product`].
/// Total: every missing or malformed field falls back to a default.
pub fn normalize(raw: &RawRecord, source_url: &str, index: usize, affiliate_tag: &str) -> Product {
    let scraped_at = Utc::now();
    let id = format!("prod_{}_{}", scraped_at.timestamp_millis(), index);

    let price = raw.price.unwrap_or(0.0).max(0.0);
    let original_price = raw.original_price.unwrap_or(price).max(0.0);

    let sold_count = raw
        .sold_count
        .or_else(|| raw.sold_text.as_deref().map(parse_sold_text))
        .unwrap_or(0);
    let sold_text = raw
        .sold_text
        .clone()
        .unwrap_or_else(|| format_sold_count(sold_count));

    let category = raw
        .category
        .as_deref()
        .map(Category::parse)
        .unwrap_or_default();

    let commission_rate = raw
        .commission_rate
        .map(|r| (r.max(0.0).min(100.0)).round() as u32)
        .unwrap_or_else(|| category.default_commission());

    let discount_percentage = raw
        .discount_percentage
        .map(|d| d.round().clamp(0.0, 100.0) as u32)
        .unwrap_or_else(|| derive_discount(price, original_price));

    let url = raw
        .product_url
        .clone()
        .unwrap_or_else(|| source_url.to_string());
    let affiliate_link = raw
        .affiliate_link
        .clone()
        .unwrap_or_else(|| affiliate_link_for(&url, affiliate_tag));

    Product {
        id,
        name: raw
            .product_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| PLACEHOLDER_NAME.to_string()),
        price,
        original_price,
        discount_percentage,
        sold_count,
        sold_text,
        rating: raw.rating.unwrap_or(4.5),
        review_count: raw.review_count.unwrap_or(0),
        category,
        seller_name: raw
            .seller_name
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_SELLER.to_string()),
        image: raw
            .product_image
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        url,
        affiliate_link,
        commission_rate,
        growth_rate: estimate_growth_rate(sold_count),
        potential_earnings: potential_earnings(price, sold_count, commission_rate),
        scraped_at,
    }
}

/// Parses display text like "1.2K sold" or "3m sold" into a unit count.
/// Unparsable text yields 0.
pub fn parse_sold_text(text: &str) -> u64 {
    let start = match text.find(|c: char| c.is_ascii_digit()) {
        Some(i) => i,
        None => return 0,
    };
    let rest = &text[start..];
    let num_len = rest
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(rest.len());
    let num: f64 = match rest[..num_len].parse() {
        Ok(n) => n,
        Err(_) => return 0,
    };

    let suffix = rest[num_len..].trim_start().chars().next();
    let scale = match suffix {
        Some('k') | Some('K') => 1_000.0,
        Some('m') | Some('M') => 1_000_000.0,
        _ => 1.0,
    };
    (num * scale).round() as u64
}

/// Inverse of [`parse_sold_text`]: renders a count as display text with one
/// decimal place above a thousand.
pub fn format_sold_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M sold", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K sold", count as f64 / 1_000.0)
    } else {
        format!("{count} sold")
    }
}

/// Guesses a category from a free-text title by keyword match. Only used when
/// the source supplies no structured category (search-metadata fallback).
pub fn guess_category(title: &str) -> Category {
    let lower = title.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|k| lower.contains(k)) {
            return category;
        }
    }
    Category::Other
}

/// Projected monthly commission income: units sold per month times the
/// per-unit commission.
pub fn potential_earnings(price: f64, sold_count: u64, commission_rate: u32) -> f64 {
    (sold_count as f64 * price * commission_rate as f64 / 100.0)
        .round()
        .max(0.0)
}

/// Growth estimate standing in for unavailable historical data. Deterministic
/// and monotonically non-decreasing in `sold_count`.
pub fn estimate_growth_rate(sold_count: u64) -> u32 {
    if sold_count > 10_000 {
        120
    } else if sold_count > 5_000 {
        75
    } else if sold_count > 1_000 {
        45
    } else if sold_count > 100 {
        25
    } else {
        10
    }
}

fn derive_discount(price: f64, original_price: f64) -> u32 {
    if original_price <= 0.0 || price >= original_price {
        return 0;
    }
    (((1.0 - price / original_price) * 100.0).round()).clamp(0.0, 100.0) as u32
}

fn affiliate_link_for(url: &str, tag: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}affiliate={tag}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_raw() -> RawRecord {
        RawRecord {
            product_name: Some("Widget".to_string()),
            price: Some(100.0),
            ..RawRecord::default()
        }
    }

    #[test]
    fn minimal_record_gets_documented_defaults() {
        let p = normalize(&minimal_raw(), "https://shop.example", 0, "my_tag");
        assert_eq!(p.name, "Widget");
        assert_eq!(p.price, 100.0);
        assert_eq!(p.original_price, 100.0);
        assert_eq!(p.discount_percentage, 0);
        assert_eq!(p.sold_count, 0);
        assert_eq!(p.category, Category::Other);
        assert_eq!(p.commission_rate, 10);
        assert_eq!(p.potential_earnings, 0.0);
        assert_eq!(p.url, "https://shop.example");
        assert_eq!(p.affiliate_link, "https://shop.example?affiliate=my_tag");
    }

    #[test]
    fn empty_record_never_fails() {
        let p = normalize(&RawRecord::default(), "", 3, "tag");
        assert_eq!(p.name, "Unknown Product");
        assert_eq!(p.seller_name, "Unknown Seller");
        assert_eq!(p.price, 0.0);
        assert_eq!(p.rating, 4.5);
        assert!(p.affiliate_link.is_empty());
    }

    #[test]
    fn sold_text_round_trip() {
        assert_eq!(parse_sold_text("1.2K sold"), 1200);
        assert_eq!(format_sold_count(1200), "1.2K sold");
    }

    #[test]
    fn sold_text_suffixes() {
        assert_eq!(parse_sold_text("500 sold"), 500);
        assert_eq!(parse_sold_text("3m sold"), 3_000_000);
        assert_eq!(parse_sold_text("2.5 M sold"), 2_500_000);
        assert_eq!(parse_sold_text("no numbers here"), 0);
        assert_eq!(parse_sold_text(""), 0);
    }

    #[test]
    fn sold_count_derived_from_text_when_absent() {
        let raw = RawRecord {
            sold_text: Some("4.2k sold".to_string()),
            ..minimal_raw()
        };
        let p = normalize(&raw, "", 0, "tag");
        assert_eq!(p.sold_count, 4200);
        assert_eq!(p.sold_text, "4.2k sold");
    }

    #[test]
    fn discount_derived_from_prices() {
        let raw = RawRecord {
            price: Some(75.0),
            original_price: Some(100.0),
            ..minimal_raw()
        };
        let p = normalize(&raw, "", 0, "tag");
        assert_eq!(p.discount_percentage, 25);
    }

    #[test]
    fn commission_defaults_per_category() {
        let raw = RawRecord {
            category: Some("Beauty".to_string()),
            ..minimal_raw()
        };
        let p = normalize(&raw, "", 0, "tag");
        assert_eq!(p.commission_rate, 15);
        assert_eq!(p.category, Category::Beauty);
    }

    #[test]
    fn unrecognized_category_maps_to_other() {
        let raw = RawRecord {
            category: Some("Garden Gnomes".to_string()),
            ..minimal_raw()
        };
        assert_eq!(normalize(&raw, "", 0, "tag").category, Category::Other);
    }

    #[test]
    fn growth_estimate_is_monotonic() {
        let counts = [0, 50, 101, 1_001, 5_001, 10_001, 1_000_000];
        let rates: Vec<u32> = counts.iter().map(|&c| estimate_growth_rate(c)).collect();
        assert!(rates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn earnings_formula() {
        // 1200 sold * 50.0 price * 12% commission
        assert_eq!(potential_earnings(50.0, 1200, 12), 7200.0);
    }

    #[test]
    fn category_guessing_first_match_wins() {
        assert_eq!(guess_category("Matte Lip Tint Set"), Category::Beauty);
        assert_eq!(guess_category("Crossbody BAG for women"), Category::Fashion);
        assert_eq!(guess_category("Wireless earbud case"), Category::Electronics);
        assert_eq!(guess_category("Mystery item 42"), Category::Other);
    }
}
