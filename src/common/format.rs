// src/common/format.rs

use rust_decimal::{Decimal, RoundingStrategy};
use thousands::Separable;

// 1234567.891 -> "1,234,567.89"
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // evita "-0.00"
    let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };
    format!("{:.2}", rounded).separate_with_commas()
}

// 12345 -> "12,345"
pub fn format_count(value: i64) -> String {
    value.separate_with_commas()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn money_gets_separators_and_two_places() {
        assert_eq!(format_money(Decimal::from_str("1234567.891").unwrap()), "1,234,567.89");
        assert_eq!(format_money(Decimal::from_str("60").unwrap()), "60.00");
        assert_eq!(format_money(Decimal::ZERO), "0.00");
        assert_eq!(format_money(Decimal::from_str("999.995").unwrap()), "1,000.00");
    }

    #[test]
    fn negative_money_keeps_sign() {
        assert_eq!(format_money(Decimal::from_str("-1500.5").unwrap()), "-1,500.50");
        assert_eq!(format_money(Decimal::from_str("-0.001").unwrap()), "0.00");
    }

    #[test]
    fn counts_are_grouped() {
        assert_eq!(format_count(6), "6");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_count(-4200), "-4,200");
    }
}
