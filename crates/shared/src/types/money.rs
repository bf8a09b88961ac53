//! Rounding rules for return amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Sums are accumulated as `rust_decimal::Decimal` and only rounded once,
//! when a report line is rendered:
//! - Tax and cess amounts are whole rupees, half away from zero
//! - Taxable and supply values keep two decimals, half to even
//! - Rates become integer grouping keys by truncation

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use rust_decimal::prelude::ToPrimitive;

/// Rounds a tax or cess amount to a whole number of rupees.
///
/// An amount that is exactly zero renders as `0`; anything else rounds to
/// the nearest integer with ties going away from zero, so `2.5` becomes `3`.
/// Returns `None` when the rounded amount does not fit in an `i64`.
#[must_use]
pub fn round_whole(value: Decimal) -> Option<i64> {
    if value.is_zero() {
        return Some(0);
    }
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Rounds a taxable or supply value to two decimal places.
///
/// Uses banker's rounding (round half to even), matching how the return
/// totals have always been produced.
#[must_use]
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Scales a fractional rate (e.g. `0.09`) into an integer rate key.
///
/// The product is truncated toward zero, never rounded: `0.125 * 100`
/// yields `12`. Returns `None` on overflow.
#[must_use]
pub fn basis_rate(rate: Decimal, multiplier: u32) -> Option<i64> {
    rate.checked_mul(Decimal::from(multiplier))?.trunc().to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0), 0)]
    #[case(dec!(0.00), 0)]
    #[case(dec!(90.00), 90)]
    #[case(dec!(89.5), 90)]
    #[case(dec!(89.49), 89)]
    #[case(dec!(2.5), 3)]
    #[case(dec!(0.4), 0)]
    #[case(dec!(-2.5), -3)]
    fn test_round_whole(#[case] value: Decimal, #[case] expected: i64) {
        assert_eq!(round_whole(value), Some(expected));
    }

    #[test]
    fn test_round_whole_overflow() {
        assert_eq!(round_whole(Decimal::MAX), None);
    }

    #[rstest]
    #[case(dec!(1000), dec!(1000))]
    #[case(dec!(10.005), dec!(10.00))]
    #[case(dec!(10.015), dec!(10.02))]
    #[case(dec!(10.0151), dec!(10.02))]
    #[case(dec!(99.999), dec!(100.00))]
    fn test_round_cents(#[case] value: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_cents(value), expected);
    }

    #[rstest]
    #[case(dec!(0.18), 100, 18)]
    #[case(dec!(0.09), 200, 18)]
    #[case(dec!(0.025), 200, 5)]
    #[case(dec!(0.125), 100, 12)]
    #[case(dec!(0.001), 100, 0)]
    #[case(dec!(0), 200, 0)]
    fn test_basis_rate_truncates(
        #[case] rate: Decimal,
        #[case] multiplier: u32,
        #[case] expected: i64,
    ) {
        assert_eq!(basis_rate(rate, multiplier), Some(expected));
    }

    #[test]
    fn test_basis_rate_overflow() {
        assert_eq!(basis_rate(Decimal::MAX, 200), None);
    }

    proptest! {
        /// Rounding an already whole amount gives the same amount back.
        #[test]
        fn prop_round_whole_is_idempotent(units in -1_000_000_000i64..1_000_000_000) {
            let whole = Decimal::from(units);
            prop_assert_eq!(round_whole(whole), Some(units));
        }

        /// Rounded amounts never move by more than half a rupee.
        #[test]
        fn prop_round_whole_error_bounded(paise in 0i64..100_000_000_000) {
            let value = Decimal::new(paise, 2);
            let rounded = Decimal::from(round_whole(value).unwrap_or_default());
            prop_assert!((rounded - value).abs() <= dec!(0.5));
        }

        #[test]
        fn prop_round_cents_is_idempotent(paise in 0i64..100_000_000_000) {
            let value = Decimal::new(paise, 2);
            prop_assert_eq!(round_cents(value), value);
        }
    }
}
