//! Schedule A deductions for non-resident aliens.
//!
//! Non-resident aliens generally itemize: charitable gifts plus state and
//! local taxes, the latter subject to the federal SALT cap. Students from
//! India may instead take the standard deduction.

use rust_decimal::Decimal;

use crate::TaxYearConfig;
use crate::calculations::common::max;
use crate::catalog::INDIA;

#[derive(Debug, Clone)]
pub struct DeductionCalculator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> DeductionCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// Deduction amount reported on Form 1040-NR line 12.
    pub fn deduction(
        &self,
        country: &str,
        charitable: Decimal,
        state_local: Decimal,
    ) -> Decimal {
        let itemized = charitable + self.salt_deduction(state_local);

        // One-off rule: Article 21(2) of the U.S.-India treaty lets students
        // take the standard deduction, so it acts as a floor for India only.
        if country == INDIA {
            return max(self.config.standard_deduction, itemized);
        }

        itemized
    }

    fn salt_deduction(
        &self,
        state_local: Decimal,
    ) -> Decimal {
        state_local.min(self.config.salt_cap)
    }
}
