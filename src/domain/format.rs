//! Display helpers for probabilities and money.
//!
//! Currency is rounded through `Decimal` so that values such as 142.857
//! render as `$142.86` without binary floating-point artefacts.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Converts a percentage (0 – 100) to a probability (0.0 – 1.0).
pub fn percent_to_decimal(percent: f64) -> f64 {
    percent / 100.0
}

/// Converts a probability (0.0 – 1.0) to a percentage (0 – 100).
pub fn decimal_to_percent(decimal: f64) -> f64 {
    decimal * 100.0
}

/// Rounds an amount to cents (half away from zero).
///
/// Returns `None` for NaN, infinities and values outside `Decimal` range
/// (magnitudes above roughly 7.9e28).
pub fn round_currency(amount: f64) -> Option<Decimal> {
    Decimal::from_f64(amount)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Formats an amount as US dollars, e.g. `$1,234.57` or `-$5.00`.
pub fn format_currency(amount: f64) -> String {
    if amount.is_nan() {
        return "$NaN".to_string();
    }

    if amount.is_infinite() {
        let sign = if amount.is_sign_negative() { "-" } else { "" };
        return format!("{sign}$∞");
    }

    // Finite amounts beyond Decimal's range fall back to float formatting.
    let (negative, text) = match round_currency(amount) {
        Some(rounded) => (
            rounded.is_sign_negative() && !rounded.is_zero(),
            format!("{:.2}", rounded.abs()),
        ),
        None => (amount.is_sign_negative(), format!("{:.2}", amount.abs())),
    };

    let sign = if negative { "-" } else { "" };
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Formats a probability as a percentage with `decimals` fractional digits.
pub fn format_percent(decimal: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, decimal_to_percent(decimal))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_conversion() {
        assert_eq!(percent_to_decimal(70.0), 0.7);
        assert_eq!(decimal_to_percent(0.5), 50.0);
    }

    #[test]
    fn test_round_currency() {
        assert_eq!(round_currency(142.857_142), Some(dec!(142.86)));
        assert_eq!(round_currency(-0.004), Some(dec!(0.00)));
        assert_eq!(round_currency(f64::INFINITY), None);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(142.857_142), "$142.86");
        assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_currency(-5.0), "-$5.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn test_format_currency_beyond_decimal_range() {
        assert_eq!(round_currency(1e30), None);
        assert_eq!(
            format_currency(1e30),
            "$1,000,000,000,000,000,019,884,624,838,656.00"
        );
        assert_eq!(
            format_currency(-1e30),
            "-$1,000,000,000,000,000,019,884,624,838,656.00"
        );

        let bet = crate::domain::kelly::compute_kelly(0.9, 0.5, 1e30).optimal_bet_size;
        let text = format_currency(bet);
        assert!(text.starts_with("$800,000,000,000,000,"), "got {text}");
        assert!(text.ends_with(".00"), "got {text}");
    }

    #[test]
    fn test_format_currency_non_finite() {
        assert_eq!(format_currency(f64::NAN), "$NaN");
        assert_eq!(format_currency(f64::NEG_INFINITY), "-$∞");
        assert_eq!(format_currency(f64::INFINITY), "$∞");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.142_857, 1), "14.3%");
        assert_eq!(format_percent(0.65, 0), "65%");
        assert_eq!(format_percent(0.05, 2), "5.00%");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("123456"), "123,456");
    }
}
