//! Currency formatting and amount parsing.
//!
//! Prices are Naira amounts shown with thousands separators and exactly
//! two decimals, e.g. `₦12,500.00`.

/// Display symbol prefixed to every formatted amount.
pub const CURRENCY_SYMBOL: &str = "₦";

/// Format an amount as currency: `₦1,234.56`, negatives as `-₦50.00`.
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-{}{}", CURRENCY_SYMBOL, format_amount(-amount))
    } else {
        format!("{}{}", CURRENCY_SYMBOL, format_amount(amount))
    }
}

/// Like [`format_currency`] but always carries a sign, for ledger rows
/// (`+₦200.00` / `-₦50.00`).
pub fn format_signed_currency(amount: f64) -> String {
    if amount > 0.0 {
        format!("+{}", format_currency(amount))
    } else {
        format_currency(amount)
    }
}

/// Format a non-negative amount with grouping and two decimals, no symbol.
pub fn format_amount(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let cents = (amount.abs() * 100.0).round() as u128;
    let whole = cents / 100;
    let frac = cents % 100;

    format!("{}.{:02}", group_thousands(whole), frac)
}

/// Parse free-text numeric input into a strictly positive, finite amount.
///
/// Returns `None` for anything a form should treat as "not filled in
/// yet": empty text, garbage, `NaN`, infinities, zero or negatives.
pub fn parse_positive_amount(input: &str) -> Option<f64> {
    let value = input.trim().replace(',', "").parse::<f64>().ok()?;
    if value.is_finite() && value > 0.0 {
        Some(value)
    } else {
        None
    }
}

fn group_thousands(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut groups = Vec::new();
    while value > 0 {
        groups.push(value % 1000);
        value /= 1000;
    }

    let mut out = String::new();
    for (i, group) in groups.iter().rev().enumerate() {
        if i == 0 {
            out.push_str(&group.to_string());
        } else {
            out.push_str(&format!(",{:03}", group));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_grouping_and_two_decimals() {
        assert_eq!(format_currency(12500.0), "₦12,500.00");
        assert_eq!(format_currency(4_500_000.0), "₦4,500,000.00");
        assert_eq!(format_currency(0.0), "₦0.00");
        assert_eq!(format_currency(999.999), "₦1,000.00");
        assert_eq!(format_currency(1234.5), "₦1,234.50");
    }

    #[test]
    fn negative_amounts_put_the_sign_first() {
        assert_eq!(format_currency(-50.0), "-₦50.00");
        assert_eq!(format_signed_currency(200.0), "+₦200.00");
        assert_eq!(format_signed_currency(-50.0), "-₦50.00");
    }

    #[test]
    fn parse_rejects_incomplete_input() {
        assert_eq!(parse_positive_amount("100"), Some(100.0));
        assert_eq!(parse_positive_amount(" 12,500.50 "), Some(12500.5));
        assert_eq!(parse_positive_amount(""), None);
        assert_eq!(parse_positive_amount("abc"), None);
        assert_eq!(parse_positive_amount("NaN"), None);
        assert_eq!(parse_positive_amount("inf"), None);
        assert_eq!(parse_positive_amount("0"), None);
        assert_eq!(parse_positive_amount("-3"), None);
    }
}
