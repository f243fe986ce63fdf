use crate::model::{Category, CompetitionLevel, Product};

/// Saturation a category carries before looking at the listing itself.
/// Crowded affiliate niches (beauty, fashion) start higher.
fn category_base_score(category: Category) -> i64 {
    match category {
        Category::Beauty => 60,
        Category::Fashion => 55,
        Category::Electronics => 50,
        Category::HomeLiving => 45,
        Category::Food => 40,
        Category::Health => 45,
        Category::Sports => 40,
        Category::Other => 50,
    }
}

/// Heuristic 0-100 estimate of how many other affiliates are likely already
/// promoting this product. Lower is better. Direct competitor counts are not
/// available, so the score is inferred from review volume and the
/// sales-to-reviews ratio: high sales with few reviews is the strongest
/// inverse signal of saturation.
pub fn saturation_score(p: &Product) -> u32 {
    let mut score = category_base_score(p.category);

    // Established review base means an established affiliate market.
    // Sparse reviews signal an opportunity.
    score += if p.review_count > 1_000 {
        20
    } else if p.review_count > 500 {
        10
    } else if p.review_count > 100 {
        5
    } else {
        -10
    };

    let ratio = p.sold_count as f64 / p.review_count.max(1) as f64;
    score += if ratio > 100.0 {
        -15
    } else if ratio > 50.0 {
        -10
    } else if ratio > 20.0 {
        -5
    } else {
        0
    };

    score.clamp(0, 100) as u32
}

/// Competition tier for a saturation score. Total over the whole range.
pub fn competition_level(score: u32) -> CompetitionLevel {
    if score < 30 {
        CompetitionLevel::Low
    } else if score < 60 {
        CompetitionLevel::Medium
    } else {
        CompetitionLevel::High
    }
}

/// Low competition with meaningful sales volume: an underexploited listing.
pub fn is_hidden_gem(p: &Product) -> bool {
    saturation_score(p) < 30 && p.sold_count > 100
}

/// High growth while saturation is still below the midpoint: an early-stage
/// opportunity.
pub fn is_rising_star(p: &Product) -> bool {
    p.growth_rate >= 50 && saturation_score(p) < 50
}
