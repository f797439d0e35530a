use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::TaxBracket;

/// Errors found when validating a [`TaxYearConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxYearConfigError {
    #[error("bracket schedule is empty")]
    NoTaxBrackets,

    /// A bracket's upper bound is not above the one before it.
    #[error("bracket {index} upper bound {bound} does not exceed the previous bound")]
    NonAscendingBound { index: usize, bound: Decimal },

    #[error("the final bracket must be unbounded")]
    BoundedFinalBracket,

    #[error("bracket {0} is unbounded but is not the final bracket")]
    UnboundedInnerBracket(usize),

    #[error("bracket {index} rate must be between 0 and 1, got {rate}")]
    InvalidBracketRate { index: usize, rate: Decimal },

    #[error("standard deduction must be non-negative, got {0}")]
    InvalidStandardDeduction(Decimal),

    #[error("SALT cap must be non-negative, got {0}")]
    InvalidSaltCap(Decimal),

    #[error("default NEC rate must be between 0 and 1, got {0}")]
    InvalidNecRate(Decimal),
}

/// Statutory parameters for one tax year.
///
/// The default is the 2024 single-filer schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub tax_year: i32,

    /// Progressive schedule applied to effectively connected income.
    pub brackets: Vec<TaxBracket>,

    /// Standard deduction available to residents of India under Article 21(2)
    /// of the U.S.-India treaty.
    pub standard_deduction: Decimal,

    /// Federal cap on the state and local tax deduction.
    pub salt_cap: Decimal,

    /// Flat rate on income not effectively connected with a U.S. trade or
    /// business when no treaty rate applies.
    pub default_nec_rate: Decimal,
}

impl TaxYearConfig {
    pub fn tax_year_2024() -> Self {
        Self {
            tax_year: 2024,
            brackets: vec![
                TaxBracket::bounded(dec!(11600), dec!(0.10)),
                TaxBracket::bounded(dec!(47150), dec!(0.12)),
                TaxBracket::bounded(dec!(100525), dec!(0.22)),
                TaxBracket::bounded(dec!(191950), dec!(0.24)),
                TaxBracket::bounded(dec!(243725), dec!(0.32)),
                TaxBracket::bounded(dec!(609350), dec!(0.35)),
                TaxBracket::unbounded(dec!(0.37)),
            ],
            standard_deduction: dec!(14600),
            salt_cap: dec!(10000),
            default_nec_rate: dec!(0.30),
        }
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`TaxYearConfigError`] if:
    /// - the bracket schedule is empty
    /// - bracket bounds are not strictly ascending
    /// - any bracket other than the last is unbounded, or the last is bounded
    /// - a bracket rate or `default_nec_rate` is not in [0, 1]
    /// - `standard_deduction` or `salt_cap` is negative
    pub fn validate(&self) -> Result<(), TaxYearConfigError> {
        let Some(last_index) = self.brackets.len().checked_sub(1) else {
            return Err(TaxYearConfigError::NoTaxBrackets);
        };

        let mut previous = Decimal::ZERO;
        for (index, bracket) in self.brackets.iter().enumerate() {
            if !is_fraction(bracket.rate) {
                return Err(TaxYearConfigError::InvalidBracketRate {
                    index,
                    rate: bracket.rate,
                });
            }
            match bracket.upper_bound {
                Some(_) if index == last_index => {
                    return Err(TaxYearConfigError::BoundedFinalBracket);
                }
                Some(bound) if bound <= previous => {
                    return Err(TaxYearConfigError::NonAscendingBound { index, bound });
                }
                Some(bound) => previous = bound,
                None if index != last_index => {
                    return Err(TaxYearConfigError::UnboundedInnerBracket(index));
                }
                None => {}
            }
        }

        if self.standard_deduction < Decimal::ZERO {
            return Err(TaxYearConfigError::InvalidStandardDeduction(
                self.standard_deduction,
            ));
        }
        if self.salt_cap < Decimal::ZERO {
            return Err(TaxYearConfigError::InvalidSaltCap(self.salt_cap));
        }
        if !is_fraction(self.default_nec_rate) {
            return Err(TaxYearConfigError::InvalidNecRate(self.default_nec_rate));
        }

        Ok(())
    }
}

impl Default for TaxYearConfig {
    fn default() -> Self {
        Self::tax_year_2024()
    }
}

fn is_fraction(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= Decimal::ONE
}
