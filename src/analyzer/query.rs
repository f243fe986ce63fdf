use crate::analyzer::scoring::{competition_level, is_hidden_gem, is_rising_star, saturation_score};
use crate::model::{Category, CompetitionLevel, Product};

/// User-selected filter options. Unset fields impose no constraint.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub category: Option<Category>,
    pub min_growth: Option<u32>,
    pub min_commission: Option<u32>,
    pub competition: Option<CompetitionLevel>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// Sort orders offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Growth,
    Commission,
    Sales,
    /// Ascending saturation score: lower competition sorts first.
    Competition,
    Earnings,
    PriceLow,
    PriceHigh,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "growth" => Some(SortKey::Growth),
            "commission" => Some(SortKey::Commission),
            "sales" => Some(SortKey::Sales),
            "competition" => Some(SortKey::Competition),
            "earnings" => Some(SortKey::Earnings),
            "price-low" => Some(SortKey::PriceLow),
            "price-high" => Some(SortKey::PriceHigh),
            _ => None,
        }
    }
}

/// Keeps the subsequence matching `criteria`, preserving input order.
pub fn filter(products: &[Product], criteria: &FilterCriteria) -> Vec<Product> {
    products
        .iter()
        .filter(|p| matches_criteria(p, criteria))
        .cloned()
        .collect()
}

fn matches_criteria(p: &Product, c: &FilterCriteria) -> bool {
    if let Some(category) = c.category {
        if p.category != category {
            return false;
        }
    }
    if let Some(min) = c.min_growth {
        if p.growth_rate < min {
            return false;
        }
    }
    if let Some(min) = c.min_commission {
        if p.commission_rate < min {
            return false;
        }
    }
    if let Some(level) = c.competition {
        if competition_level(saturation_score(p)) != level {
            return false;
        }
    }
    if let Some(min) = c.min_price {
        if p.price < min {
            return false;
        }
    }
    if let Some(max) = c.max_price {
        if p.price > max {
            return false;
        }
    }
    true
}

/// Returns a sorted copy; the input is never mutated. Ties keep input order
/// (stable sort). Numeric keys sort descending except `Competition` and
/// `PriceLow`.
pub fn sort(products: &[Product], key: SortKey) -> Vec<Product> {
    let mut sorted = products.to_vec();
    match key {
        SortKey::Growth => sorted.sort_by(|a, b| b.growth_rate.cmp(&a.growth_rate)),
        SortKey::Commission => sorted.sort_by(|a, b| b.commission_rate.cmp(&a.commission_rate)),
        SortKey::Sales => sorted.sort_by(|a, b| b.sold_count.cmp(&a.sold_count)),
        SortKey::Competition => {
            sorted.sort_by(|a, b| saturation_score(a).cmp(&saturation_score(b)))
        }
        SortKey::Earnings => {
            sorted.sort_by(|a, b| b.potential_earnings.total_cmp(&a.potential_earnings))
        }
        SortKey::PriceLow => sorted.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortKey::PriceHigh => sorted.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }
    sorted
}

/// Products growing at least `min_growth` percent, fastest first.
pub fn find_trending(products: &[Product], min_growth: u32) -> Vec<Product> {
    let mut trending: Vec<Product> = products
        .iter()
        .filter(|p| p.growth_rate >= min_growth)
        .cloned()
        .collect();
    trending.sort_by(|a, b| b.growth_rate.cmp(&a.growth_rate));
    trending
}

/// Hidden gems ranked by sales volume per unit of competition.
pub fn find_hidden_gems(products: &[Product]) -> Vec<Product> {
    let mut gems: Vec<Product> = products.iter().filter(|p| is_hidden_gem(p)).cloned().collect();
    gems.sort_by(|a, b| gem_value(b).total_cmp(&gem_value(a)));
    gems
}

fn gem_value(p: &Product) -> f64 {
    p.sold_count as f64 / saturation_score(p).max(1) as f64
}

/// Rising stars ranked by how far growth outruns saturation.
pub fn find_rising_stars(products: &[Product]) -> Vec<Product> {
    let mut stars: Vec<Product> = products.iter().filter(|p| is_rising_star(p)).cloned().collect();
    stars.sort_by_key(|p| std::cmp::Reverse(p.growth_rate as i64 - saturation_score(p) as i64));
    stars
}

/// Products paying at least `min_commission` percent, best earners first.
pub fn find_top_commission(products: &[Product], min_commission: u32) -> Vec<Product> {
    let mut top: Vec<Product> = products
        .iter()
        .filter(|p| p.commission_rate >= min_commission)
        .cloned()
        .collect();
    top.sort_by(|a, b| b.potential_earnings.total_cmp(&a.potential_earnings));
    top
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::test_support::product;

    fn with_growth(rates: &[u32]) -> Vec<Product> {
        rates
            .iter()
            .map(|&g| product(Category::Other, 500, 50, g))
            .collect()
    }

    #[test]
    fn trending_filters_and_sorts_descending() {
        let products = with_growth(&[10, 60, 25]);
        let trending = find_trending(&products, 20);
        let rates: Vec<u32> = trending.iter().map(|p| p.growth_rate).collect();
        assert_eq!(rates, vec![60, 25]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(filter(&[], &FilterCriteria::default()).is_empty());
        assert!(sort(&[], SortKey::Growth).is_empty());
        assert!(find_trending(&[], 0).is_empty());
        assert!(find_hidden_gems(&[]).is_empty());
        assert!(find_rising_stars(&[]).is_empty());
        assert!(find_top_commission(&[], 0).is_empty());
    }

    #[test]
    fn sort_is_idempotent_and_non_mutating() {
        let products = with_growth(&[10, 60, 25, 60]);
        let once = sort(&products, SortKey::Growth);
        let twice = sort(&once, SortKey::Growth);
        let ids_once: Vec<&str> = once.iter().map(|p| p.id.as_str()).collect();
        let ids_twice: Vec<&str> = twice.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids_once, ids_twice);

        // Input order untouched.
        let rates: Vec<u32> = products.iter().map(|p| p.growth_rate).collect();
        assert_eq!(rates, vec![10, 60, 25, 60]);
    }

    #[test]
    fn sort_ties_preserve_input_order() {
        let mut products = with_growth(&[50, 50, 50]);
        for (i, p) in products.iter_mut().enumerate() {
            p.id = format!("p{i}");
        }
        let sorted = sort(&products, SortKey::Growth);
        let ids: Vec<&str> = sorted.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p0", "p1", "p2"]);
    }

    #[test]
    fn price_sorts_in_both_directions() {
        let mut products = with_growth(&[0, 0, 0]);
        products[0].price = 20.0;
        products[1].price = 5.0;
        products[2].price = 50.0;

        let low: Vec<u64> = sort(&products, SortKey::PriceLow)
            .iter()
            .map(|p| p.price as u64)
            .collect();
        assert_eq!(low, vec![5, 20, 50]);

        let high: Vec<u64> = sort(&products, SortKey::PriceHigh)
            .iter()
            .map(|p| p.price as u64)
            .collect();
        assert_eq!(high, vec![50, 20, 5]);
    }

    #[test]
    fn filter_preserves_order_and_unset_means_unconstrained() {
        let products = with_growth(&[10, 60, 25]);
        let all = filter(&products, &FilterCriteria::default());
        assert_eq!(all.len(), 3);
        let rates: Vec<u32> = all.iter().map(|p| p.growth_rate).collect();
        assert_eq!(rates, vec![10, 60, 25]);
    }

    #[test]
    fn relaxing_a_bound_is_monotonic() {
        let products = with_growth(&[10, 60, 25, 90]);
        let strict = filter(
            &products,
            &FilterCriteria { min_growth: Some(50), ..Default::default() },
        );
        let relaxed = filter(
            &products,
            &FilterCriteria { min_growth: Some(20), ..Default::default() },
        );
        for p in &strict {
            assert!(relaxed.iter().any(|q| q.id == p.id));
        }
    }

    #[test]
    fn category_filter_is_exact() {
        let mut products = with_growth(&[10, 20]);
        products[0].category = Category::Beauty;
        let beauty = filter(
            &products,
            &FilterCriteria { category: Some(Category::Beauty), ..Default::default() },
        );
        assert_eq!(beauty.len(), 1);
        assert_eq!(beauty[0].growth_rate, 10);
    }

    #[test]
    fn competition_filter_uses_computed_level() {
        // Food/low-review/high-ratio products score 15 -> Low.
        let low = product(Category::Food, 5_000, 0, 0);
        // Beauty with heavy reviews scores 80 -> High.
        let high = product(Category::Beauty, 4_000, 2_000, 0);
        let products = vec![low, high];

        let kept = filter(
            &products,
            &FilterCriteria {
                competition: Some(CompetitionLevel::Low),
                ..Default::default()
            },
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].category, Category::Food);
    }

    #[test]
    fn hidden_gems_ranked_by_value_per_competition() {
        let big = product(Category::Food, 50_000, 0, 0);
        let small = product(Category::Food, 5_000, 0, 0);
        let gems = find_hidden_gems(&[small.clone(), big.clone()]);
        assert_eq!(gems.len(), 2);
        assert_eq!(gems[0].sold_count, 50_000);
    }

    #[test]
    fn top_commission_sorted_by_earnings() {
        let mut a = product(Category::Beauty, 1_000, 50, 0);
        a.potential_earnings = 500.0;
        let mut b = product(Category::Beauty, 1_000, 50, 0);
        b.potential_earnings = 9_000.0;
        let mut c = product(Category::Electronics, 1_000, 50, 0);
        c.commission_rate = 8;
        c.potential_earnings = 99_999.0;

        let top = find_top_commission(&[a, b, c], 10);
        let earnings: Vec<u64> = top.iter().map(|p| p.potential_earnings as u64).collect();
        assert_eq!(earnings, vec![9_000, 500]);
    }

    #[test]
    fn sort_key_parsing() {
        assert_eq!(SortKey::parse("growth"), Some(SortKey::Growth));
        assert_eq!(SortKey::parse("price-low"), Some(SortKey::PriceLow));
        assert_eq!(SortKey::parse("bogus"), None);
    }
}
