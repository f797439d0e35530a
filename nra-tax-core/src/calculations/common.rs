//! Helpers shared by the calculators.
//!
//! Calculators never round intermediate values; [`round_half_up`] exists for
//! the presentation boundary only.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to cents, with midpoints rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use nra_tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(1.666666)), dec!(1.67));
/// assert_eq!(round_half_up(dec!(100.005)), dec!(100.01));
/// assert_eq!(round_half_up(dec!(100.004)), dec!(100.00));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use nra_tax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(14600), dec!(9200)), dec!(14600));
/// assert_eq!(max(dec!(-250.00), dec!(0)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps a value to zero from below.
pub fn non_negative(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}

/// `part / whole` expressed as a percentage, or zero when `whole` is not
/// positive.
///
/// Scales before dividing to keep precision; amounts too large to scale are
/// divided first instead.
pub fn percent_of(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    match part.checked_mul(Decimal::ONE_HUNDRED) {
        Some(scaled) => scaled / whole,
        None => part / whole * Decimal::ONE_HUNDRED,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_midpoint_away_from_zero() {
        assert_eq!(round_half_up(dec!(0.125)), dec!(0.13));
        assert_eq!(round_half_up(dec!(-0.125)), dec!(-0.13));
    }

    #[test]
    fn round_half_up_truncates_below_midpoint() {
        assert_eq!(round_half_up(dec!(3282.4449)), dec!(3282.44));
    }

    #[test]
    fn round_half_up_keeps_whole_amounts() {
        assert_eq!(round_half_up(dec!(1160)), dec!(1160.00));
    }

    // =========================================================================
    // non_negative tests
    // =========================================================================

    #[test]
    fn non_negative_clamps_negative_to_zero() {
        assert_eq!(non_negative(dec!(-3600)), dec!(0));
    }

    #[test]
    fn non_negative_passes_positive_through() {
        assert_eq!(non_negative(dec!(3600)), dec!(3600));
    }

    // =========================================================================
    // percent_of tests
    // =========================================================================

    #[test]
    fn percent_of_scales_to_hundred() {
        assert_eq!(percent_of(dec!(300), dec!(1000)), dec!(30));
    }

    #[test]
    fn percent_of_zero_whole_is_zero() {
        assert_eq!(percent_of(dec!(100), dec!(0)), dec!(0));
    }

    #[test]
    fn percent_of_amount_too_large_to_scale() {
        assert_eq!(percent_of(dec!(1e28), dec!(2e28)), dec!(50));
    }

    #[test]
    fn percent_of_repeating_fraction_rounds_at_presentation() {
        let rate = percent_of(dec!(100), dec!(6000));

        assert_eq!(round_half_up(rate), dec!(1.67));
    }
}
