//! Conversion from raw form strings into computation values.
//!
//! Money arrives in transport form as integer cents (either as a digit string
//! typed into a masked currency field, or as an `i64`). It is converted to
//! `Money` exactly once, here. Every parser is total: anything it cannot read
//! becomes zero (or the caller's default) and never an error.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Cents, Money, Percent};

/// Unit the money fields of a form were captured in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountUnit {
    /// Integer minor units from a masked field: `"250000"` is 2500.00
    #[default]
    Cents,
    /// Whole currency units with an optional decimal point: `"2500.00"`
    Whole,
}

/// Interpret the digits of `raw` as integer cents. Every non-digit character is
/// dropped first, so `"R$ 2.500,00"`, `"2500,00"` and `"250000"` all read as 2500.00.
/// Digit strings beyond the `Cents` range read as zero.
pub fn parse_cents(raw: &str) -> Money {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits
        .parse::<Cents>()
        .map(cents_to_money)
        .unwrap_or(Decimal::ZERO)
}

/// Parse a money field in whichever unit the form was captured in.
pub fn parse_money(raw: &str, unit: AmountUnit) -> Money {
    match unit {
        AmountUnit::Cents => parse_cents(raw),
        AmountUnit::Whole => parse_amount(raw),
    }
}

/// Parse a whole-unit amount such as `"350000"` or `"1234.56"`.
pub fn parse_amount(raw: &str) -> Money {
    parse_decimal(raw).unwrap_or(Decimal::ZERO)
}

/// Parse a percentage such as `"10.5"`, `"10,5"` or `"8%"`. Unreadable → 0.
pub fn parse_percent(raw: &str) -> Percent {
    parse_percent_or(raw, Decimal::ZERO)
}

/// Parse a percentage, falling back to `default` when the field is empty or
/// unreadable. An explicit `"0"` is kept as zero.
pub fn parse_percent_or(raw: &str, default: Percent) -> Percent {
    let trimmed = raw.trim().trim_end_matches('%').trim();
    parse_decimal(&trimmed.replace(',', ".")).unwrap_or(default)
}

/// Parse a non-negative whole count such as a term in months. `"360 meses"` → 360.
pub fn parse_count(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u32>().ok()
}

/// Yes/no answers from a select box: `sim`, `s`, `yes`, `y`, `true`, `1`.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "sim" | "s" | "yes" | "y" | "true" | "1"
    )
}

pub fn cents_to_money(cents: Cents) -> Money {
    Decimal::from(cents) / dec!(100)
}

/// Round to the nearest cent, halves away from zero. Saturates at the `i64` range.
pub fn money_to_cents(amount: Money) -> Cents {
    let scaled = amount
        .checked_mul(dec!(100))
        .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero));
    match scaled.and_then(|v| v.to_i64()) {
        Some(cents) => cents,
        None if amount.is_sign_negative() => Cents::MIN,
        None => Cents::MAX,
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<Decimal>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cents_masked_input() {
        assert_eq!(parse_cents("250000"), dec!(2500));
        assert_eq!(parse_cents("R$ 2.500,00"), dec!(2500));
        assert_eq!(parse_cents("2500,50"), dec!(2500.50));
        assert_eq!(parse_cents("7"), dec!(0.07));
    }

    #[test]
    fn test_parse_cents_empty_or_garbage_is_zero() {
        assert_eq!(parse_cents(""), Decimal::ZERO);
        assert_eq!(parse_cents("abc"), Decimal::ZERO);
        assert_eq!(parse_cents("   "), Decimal::ZERO);
    }

    #[test]
    fn test_parse_cents_too_many_digits_is_zero() {
        let huge = "9".repeat(40);
        assert_eq!(parse_cents(&huge), Decimal::ZERO);
    }

    #[test]
    fn test_parse_cents_beyond_i64_is_zero() {
        assert_eq!(parse_cents("9223372036854775807"), cents_to_money(Cents::MAX));
        assert_eq!(parse_cents("9223372036854775808"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_money_by_unit() {
        assert_eq!(parse_money("250000", AmountUnit::Cents), dec!(2500));
        assert_eq!(parse_money("2500.50", AmountUnit::Whole), dec!(2500.50));
        assert_eq!(parse_money("2500.50", AmountUnit::Cents), dec!(2500.50));
        assert_eq!(parse_money("", AmountUnit::Whole), Decimal::ZERO);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("350000"), dec!(350000));
        assert_eq!(parse_amount(" 1234.56 "), dec!(1234.56));
        assert_eq!(parse_amount("not a number"), Decimal::ZERO);
        assert_eq!(parse_amount(""), Decimal::ZERO);
    }

    #[test]
    fn test_parse_percent_variants() {
        assert_eq!(parse_percent("10.5"), dec!(10.5));
        assert_eq!(parse_percent("10,5"), dec!(10.5));
        assert_eq!(parse_percent("8%"), dec!(8));
        assert_eq!(parse_percent("x"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_percent_default() {
        assert_eq!(parse_percent_or("", dec!(8.0)), dec!(8.0));
        assert_eq!(parse_percent_or("abc", dec!(8.0)), dec!(8.0));
        assert_eq!(parse_percent_or("0", dec!(8.0)), Decimal::ZERO);
        assert_eq!(parse_percent_or("12", dec!(8.0)), dec!(12));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("360"), Some(360));
        assert_eq!(parse_count(" 240 meses"), Some(240));
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("-12"), None);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("sim"));
        assert!(parse_flag("YES"));
        assert!(parse_flag("true"));
        assert!(!parse_flag("nao"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_cents_conversions() {
        assert_eq!(cents_to_money(250000), dec!(2500));
        assert_eq!(money_to_cents(dec!(2561.27)), 256127);
        assert_eq!(money_to_cents(dec!(0.005)), 1);
        assert_eq!(money_to_cents(dec!(-0.005)), -1);
        assert_eq!(money_to_cents(dec!(2561.2700245)), 256127);
    }
}
