// Utility functions

/// Renders a currency amount compactly for report lines ("฿12.5K", "฿1.2M").
pub fn format_earnings(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("฿{:.1}M", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("฿{:.1}K", amount / 1_000.0)
    } else {
        format!("฿{}", amount.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earnings_formatting() {
        assert_eq!(format_earnings(999.0), "฿999");
        assert_eq!(format_earnings(12_500.0), "฿12.5K");
        assert_eq!(format_earnings(1_200_000.0), "฿1.2M");
    }
}
