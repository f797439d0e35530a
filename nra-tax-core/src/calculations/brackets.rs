//! Progressive rate schedule applied to effectively connected income.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use nra_tax_core::TaxYearConfig;
//! use nra_tax_core::calculations::BracketTaxCalculator;
//!
//! let config = TaxYearConfig::tax_year_2024();
//! let calculator = BracketTaxCalculator::new(&config.brackets);
//!
//! assert_eq!(calculator.tax(dec!(11600)), dec!(1160.00));
//! // 1160 + (30000 - 11600) * 12%
//! assert_eq!(calculator.tax(dec!(30000)), dec!(3368.00));
//! ```

use rust_decimal::Decimal;
use tracing::trace;

use crate::TaxBracket;

/// Computes tax owed on a taxable-income amount by walking the brackets in
/// ascending order.
#[derive(Debug, Clone)]
pub struct BracketTaxCalculator<'a> {
    brackets: &'a [TaxBracket],
}

impl<'a> BracketTaxCalculator<'a> {
    /// Brackets must be ascending with only the last one unbounded; see
    /// [`crate::TaxYearConfig::validate`].
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    /// Tax owed on `taxable_income`.
    ///
    /// Each bracket taxes the slice of income between the previous bracket's
    /// bound and its own. No rounding is applied. Callers clamp negative
    /// taxable income to zero before calling; a non-positive amount yields
    /// zero tax.
    pub fn tax(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        let mut tax = Decimal::ZERO;
        let mut remaining = taxable_income;
        let mut lower = Decimal::ZERO;

        for bracket in self.brackets {
            if remaining <= Decimal::ZERO {
                break;
            }

            let portion = match bracket.upper_bound {
                Some(upper) => remaining.min(upper - lower),
                None => remaining,
            };
            tax += portion * bracket.rate;
            remaining -= portion;

            trace!(rate = %bracket.rate, %portion, %tax, "bracket applied");

            if let Some(upper) = bracket.upper_bound {
                lower = upper;
            }
        }

        tax
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::TaxYearConfig;

    fn with_2024<T>(f: impl FnOnce(BracketTaxCalculator<'_>) -> T) -> T {
        let config = TaxYearConfig::tax_year_2024();
        f(BracketTaxCalculator::new(&config.brackets))
    }

    // =========================================================================
    // tax tests
    // =========================================================================

    #[test]
    fn tax_zero_income_is_zero() {
        assert_eq!(with_2024(|c| c.tax(dec!(0))), dec!(0));
    }

    #[test]
    fn tax_negative_income_is_zero() {
        assert_eq!(with_2024(|c| c.tax(dec!(-500))), dec!(0));
    }

    #[test]
    fn tax_first_bracket_boundary() {
        assert_eq!(with_2024(|c| c.tax(dec!(11600))), dec!(1160.00));
    }

    #[test]
    fn tax_within_first_bracket() {
        assert_eq!(with_2024(|c| c.tax(dec!(1000))), dec!(100.00));
    }

    #[test]
    fn tax_second_bracket_boundary() {
        // 1160 + 35550 * 0.12 = 5426
        assert_eq!(with_2024(|c| c.tax(dec!(47150))), dec!(5426.00));
    }

    #[test]
    fn tax_one_million_matches_closed_form() {
        // 1160 + 4266 + 11742.50 + 21942 + 16568 + 127968.75 + 144540.50
        assert_eq!(with_2024(|c| c.tax(dec!(1000000))), dec!(328187.75));
    }

    #[test]
    fn tax_is_continuous_at_each_boundary() {
        let config = TaxYearConfig::tax_year_2024();
        let calculator = BracketTaxCalculator::new(&config.brackets);
        let cent = dec!(0.01);

        for bound in config.brackets.iter().filter_map(|b| b.upper_bound) {
            let below = calculator.tax(bound - cent);
            let at = calculator.tax(bound);
            let above = calculator.tax(bound + cent);

            assert!(at - below <= dec!(0.0037), "jump below {bound}");
            assert!(above - at <= dec!(0.0037), "jump above {bound}");
        }
    }

    #[test]
    fn tax_is_strictly_increasing() {
        let config = TaxYearConfig::tax_year_2024();
        let calculator = BracketTaxCalculator::new(&config.brackets);

        let samples = [
            dec!(0),
            dec!(0.01),
            dec!(5000),
            dec!(11600),
            dec!(11600.01),
            dec!(47150),
            dec!(100525),
            dec!(191950),
            dec!(243725),
            dec!(609350),
            dec!(609350.01),
            dec!(2500000),
        ];

        for pair in samples.windows(2) {
            assert!(
                calculator.tax(pair[0]) < calculator.tax(pair[1]),
                "tax({}) should be below tax({})",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn tax_with_empty_schedule_is_zero() {
        let calculator = BracketTaxCalculator::new(&[]);

        assert_eq!(calculator.tax(dec!(50000)), dec!(0));
    }
}
