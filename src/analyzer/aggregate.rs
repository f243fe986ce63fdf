use crate::analyzer::scoring::is_hidden_gem;
use crate::model::{Category, Product};
use serde::Serialize;

/// Collection-level summary shown on the stat cards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Statistics {
    pub count: usize,
    /// Average growth rate in percent, rounded to the nearest integer.
    pub avg_growth: u32,
    /// Average commission rate in percent, rounded to the nearest integer.
    pub avg_commission: u32,
    /// Average price, rounded to the nearest integer.
    pub avg_price: u64,
    /// Sum of per-product monthly earnings estimates, rounded.
    pub total_potential_earnings: u64,
    pub hidden_gems_count: usize,
}

/// One bar of the growth-distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrowthBucket {
    pub label: &'static str,
    pub count: usize,
}

/// Per-category totals for the breakdown chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub count: usize,
    pub total_sales: u64,
    pub total_earnings: f64,
}

/// Fixed growth buckets, inclusive upper bounds. All five labels are always
/// present in the output, in this order.
const GROWTH_BUCKETS: [(&str, u32); 4] = [
    ("0-25%", 25),
    ("26-50%", 50),
    ("51-100%", 100),
    ("101-200%", 200),
];
const OVERFLOW_BUCKET: &str = "200%+";

/// Reduces a collection to its summary numbers. Empty input is a valid
/// collection and yields the all-zero summary.
pub fn statistics(products: &[Product]) -> Statistics {
    if products.is_empty() {
        return Statistics::default();
    }

    let n = products.len() as f64;
    let avg = |sum: f64| (sum / n).round();

    Statistics {
        count: products.len(),
        avg_growth: avg(products.iter().map(|p| p.growth_rate as f64).sum()) as u32,
        avg_commission: avg(products.iter().map(|p| p.commission_rate as f64).sum()) as u32,
        avg_price: avg(products.iter().map(|p| p.price).sum()) as u64,
        total_potential_earnings: products
            .iter()
            .map(|p| p.potential_earnings)
            .sum::<f64>()
            .round() as u64,
        hidden_gems_count: products.iter().filter(|p| is_hidden_gem(p)).count(),
    }
}

/// Buckets products by growth rate for the distribution chart.
pub fn growth_distribution(products: &[Product]) -> Vec<GrowthBucket> {
    let mut counts = [0usize; 5];
    for p in products {
        let idx = GROWTH_BUCKETS
            .iter()
            .position(|&(_, upper)| p.growth_rate <= upper)
            .unwrap_or(4);
        counts[idx] += 1;
    }

    GROWTH_BUCKETS
        .iter()
        .map(|&(label, _)| label)
        .chain(std::iter::once(OVERFLOW_BUCKET))
        .zip(counts)
        .map(|(label, count)| GrowthBucket { label, count })
        .collect()
}

/// Per-category totals, in first-seen order. Categories absent from the input
/// do not appear.
pub fn category_breakdown(products: &[Product]) -> Vec<CategorySummary> {
    let mut breakdown: Vec<CategorySummary> = Vec::new();
    for p in products {
        let idx = match breakdown.iter().position(|s| s.category == p.category) {
            Some(idx) => idx,
            None => {
                breakdown.push(CategorySummary {
                    category: p.category,
                    count: 0,
                    total_sales: 0,
                    total_earnings: 0.0,
                });
                breakdown.len() - 1
            }
        };
        let entry = &mut breakdown[idx];
        entry.count += 1;
        entry.total_sales += p.sold_count;
        entry.total_earnings += p.potential_earnings;
    }
    breakdown
}
