use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{IncomeCategory, IncomeTypeCode};

/// Errors raised when a [`TaxpayerInput`] carries values outside the engine's
/// domain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxInputError {
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("claimed amount for income code {code} must be non-negative, got {value}")]
    NegativeClaim { code: IncomeTypeCode, value: Decimal },

    #[error("{field} exceeds the largest supported amount {max}, got {value}", max = MAX_AMOUNT)]
    AmountTooLarge { field: &'static str, value: Decimal },

    #[error("claimed amount for income code {code} exceeds {max}, got {value}", max = MAX_AMOUNT)]
    ClaimTooLarge { code: IncomeTypeCode, value: Decimal },
}

/// Largest amount accepted in any money field or claim.
///
/// Sums and percentages of amounts up to this bound stay far inside
/// [`Decimal::MAX`], so the engine never overflows.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Everything the engine needs for one calculation.
///
/// Values are replaced wholesale rather than edited in place; see
/// [`crate::elections`] for the operations that keep `elected_exemptions`
/// consistent with the income fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxpayerInput {
    /// Country of tax residency, as a catalog identifier (e.g. `china`).
    pub foreign_country: String,

    /// Wages (Form 1040-NR, line 1a).
    pub wages: Decimal,

    /// Scholarship and fellowship grants (Schedule 1, line 8r).
    pub scholarships: Decimal,

    /// Capital gains (Schedule NEC, line 9).
    pub capital_gains: Decimal,

    /// Gifts to U.S. charities (Schedule A, line 5).
    pub charitable_distributions: Decimal,

    /// State and local income taxes (Schedule A, line 1a).
    pub state_local_taxes: Decimal,

    /// Claimed amount per elected exemption provision.
    pub elected_exemptions: BTreeMap<IncomeTypeCode, Decimal>,

    /// Whether the treaty rate is elected for each income category.
    pub elected_rates: BTreeMap<IncomeCategory, bool>,
}

impl TaxpayerInput {
    /// Creates an input with all amounts zero and nothing elected.
    pub fn new(foreign_country: impl Into<String>) -> Self {
        Self {
            foreign_country: foreign_country.into(),
            ..Default::default()
        }
    }

    /// Whether the treaty rate is elected for `category`.
    pub fn rate_elected(
        &self,
        category: IncomeCategory,
    ) -> bool {
        self.elected_rates.get(&category).copied().unwrap_or(false)
    }

    /// Total income before any treaty exemption.
    pub fn total_income(&self) -> Decimal {
        self.wages + self.scholarships + self.capital_gains
    }

    /// Checks that every money field and claimed amount is within
    /// `0..=MAX_AMOUNT`.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as a [`TaxInputError`].
    pub fn validate(&self) -> Result<(), TaxInputError> {
        let fields = [
            ("wages", self.wages),
            ("scholarships", self.scholarships),
            ("capital gains", self.capital_gains),
            ("charitable distributions", self.charitable_distributions),
            ("state and local taxes", self.state_local_taxes),
        ];
        if let Some((field, value)) = fields.into_iter().find(|(_, v)| *v < Decimal::ZERO) {
            return Err(TaxInputError::NegativeAmount { field, value });
        }
        if let Some((field, value)) = fields.into_iter().find(|(_, v)| *v > MAX_AMOUNT) {
            return Err(TaxInputError::AmountTooLarge { field, value });
        }

        if let Some((code, value)) = self
            .elected_exemptions
            .iter()
            .find(|(_, v)| **v < Decimal::ZERO)
        {
            return Err(TaxInputError::NegativeClaim {
                code: *code,
                value: *value,
            });
        }
        if let Some((code, value)) = self
            .elected_exemptions
            .iter()
            .find(|(_, v)| **v > MAX_AMOUNT)
        {
            return Err(TaxInputError::ClaimTooLarge {
                code: *code,
                value: *value,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_input_is_zeroed() {
        let input = TaxpayerInput::new("india");

        assert_eq!(input.foreign_country, "india");
        assert_eq!(input.total_income(), dec!(0));
        assert!(input.elected_exemptions.is_empty());
        assert!(!input.rate_elected(IncomeCategory::CapitalGains));
    }

    #[test]
    fn validate_accepts_zero_and_positive_values() {
        let mut input = TaxpayerInput::new("china");
        input.wages = dec!(6000);
        input
            .elected_exemptions
            .insert(IncomeTypeCode::StudyingTraining, dec!(5000));

        assert_eq!(input.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_wages() {
        let mut input = TaxpayerInput::new("china");
        input.wages = dec!(-1);

        assert_eq!(
            input.validate(),
            Err(TaxInputError::NegativeAmount {
                field: "wages",
                value: dec!(-1)
            })
        );
    }

    #[test]
    fn validate_rejects_negative_state_local_taxes() {
        let mut input = TaxpayerInput::new("other");
        input.state_local_taxes = dec!(-250.50);

        assert_eq!(
            input.validate(),
            Err(TaxInputError::NegativeAmount {
                field: "state and local taxes",
                value: dec!(-250.50)
            })
        );
    }

    #[test]
    fn validate_rejects_negative_claim() {
        let mut input = TaxpayerInput::new("southKorea");
        input
            .elected_exemptions
            .insert(IncomeTypeCode::Scholarship, dec!(-10));

        assert_eq!(
            input.validate(),
            Err(TaxInputError::NegativeClaim {
                code: IncomeTypeCode::Scholarship,
                value: dec!(-10)
            })
        );
    }

    #[test]
    fn validate_accepts_amount_at_upper_bound() {
        let mut input = TaxpayerInput::new("other");
        input.wages = MAX_AMOUNT;
        input.scholarships = MAX_AMOUNT;
        input.capital_gains = MAX_AMOUNT;

        assert_eq!(input.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_amount_above_upper_bound() {
        let mut input = TaxpayerInput::new("other");
        input.wages = dec!(1e28);

        assert_eq!(
            input.validate(),
            Err(TaxInputError::AmountTooLarge {
                field: "wages",
                value: dec!(1e28)
            })
        );
    }

    #[test]
    fn validate_rejects_claim_above_upper_bound() {
        let mut input = TaxpayerInput::new("southKorea");
        input
            .elected_exemptions
            .insert(IncomeTypeCode::Scholarship, Decimal::MAX);

        assert_eq!(
            input.validate(),
            Err(TaxInputError::ClaimTooLarge {
                code: IncomeTypeCode::Scholarship,
                value: Decimal::MAX
            })
        );
    }

    #[test]
    fn total_income_sums_income_fields_only() {
        let mut input = TaxpayerInput::new("other");
        input.wages = dec!(1000);
        input.scholarships = dec!(200);
        input.capital_gains = dec!(30);
        input.charitable_distributions = dec!(4000);

        assert_eq!(input.total_income(), dec!(1230));
    }
}
