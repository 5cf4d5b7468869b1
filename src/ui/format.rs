//! Display formatting helpers ("trader precision").

/// Precision scales with magnitude: sub-penny prices need the decimals,
/// large prices get thousands separators.
pub fn format_price(price: f64) -> String {
    if price < 0.01 {
        format!("{:.6}", price)
    } else if price < 1.0 {
        format!("{:.4}", price)
    } else if price < 100.0 {
        format!("{:.2}", price)
    } else {
        // Round to whole cents first so e.g. x.999 carries into the next
        // whole unit instead of clamping.
        let cents = (price * 100.0).round() as i64;
        let whole = cents / 100;
        let frac = cents % 100;
        let mut grouped = String::new();
        for (i, ch) in whole.to_string().chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let whole_grouped: String = grouped.chars().rev().collect();
        format!("{}.{:02}", whole_grouped, frac)
    }
}

pub fn format_volume(volume: f64) -> String {
    if volume >= 1_000_000_000.0 {
        format!("{:.1}B", volume / 1_000_000_000.0)
    } else if volume >= 1_000_000.0 {
        format!("{:.1}M", volume / 1_000_000.0)
    } else if volume >= 1_000.0 {
        format!("{:.1}K", volume / 1_000.0)
    } else {
        format!("{:.2}", volume)
    }
}

pub fn format_percentage(percentage: f64) -> String {
    if percentage > 0.0 {
        format!("+{:.2}%", percentage)
    } else {
        format!("{:.2}%", percentage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_precision_scales_with_magnitude() {
        assert_eq!(format_price(0.002314), "0.002314");
        assert_eq!(format_price(0.5123), "0.5123");
        assert_eq!(format_price(45.678), "45.68");
        assert_eq!(format_price(45000.0), "45,000.00");
        assert_eq!(format_price(1234567.89), "1,234,567.89");
    }

    #[test]
    fn cent_rounding_carries_into_the_whole_part() {
        assert_eq!(format_price(45000.999), "45,001.00");
        assert_eq!(format_price(999.999), "1,000.00");
    }

    #[test]
    fn volume_gets_magnitude_suffixes() {
        assert_eq!(format_volume(950.0), "950.00");
        assert_eq!(format_volume(1_250.0), "1.2K");
        assert_eq!(format_volume(3_400_000.0), "3.4M");
        assert_eq!(format_volume(2_100_000_000.0), "2.1B");
    }

    #[test]
    fn percentage_keeps_the_sign_convention() {
        assert_eq!(format_percentage(1.12), "+1.12%");
        assert_eq!(format_percentage(-3.5), "-3.50%");
        assert_eq!(format_percentage(0.0), "0.00%");
    }
}
