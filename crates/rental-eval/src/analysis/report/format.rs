/// Whole-dollar amount with thousands separators, e.g. `$1,234,568`.
pub fn currency(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_thousands(&digits);
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

pub fn percent(ratio: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, ratio * 100.0)
}

/// Bathroom counts print without a trailing `.0` when whole.
pub fn count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(currency(0.0), "$0");
        assert_eq!(currency(999.4), "$999");
        assert_eq!(currency(12_240.0), "$12,240");
        assert_eq!(currency(1_234_567.8), "$1,234,568");
        assert_eq!(currency(-2_500.0), "-$2,500");
    }

    #[test]
    fn counts_drop_trailing_zero() {
        assert_eq!(count(2.0), "2");
        assert_eq!(count(2.5), "2.5");
    }

    #[test]
    fn percent_scales_ratios() {
        assert_eq!(percent(0.49, 1), "49.0%");
        assert_eq!(percent(0.08, 2), "8.00%");
    }
}
