use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ExemptionTarget, IncomeCategory, IncomeTypeCode};

/// A treaty article exempting some or all of one income type from U.S. tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatyExemptionProvision {
    pub code: IncomeTypeCode,
    pub name: String,
    /// Upper limit on the exempt amount. `None` means uncapped.
    pub cap: Option<Decimal>,
    pub applies_to: ExemptionTarget,
}

impl TreatyExemptionProvision {
    /// Largest amount this provision can exempt from `income`.
    pub fn claimable(
        &self,
        income: Decimal,
    ) -> Decimal {
        match self.cap {
            Some(cap) => cap.min(income),
            None => income,
        }
    }
}

/// A treaty article substituting a reduced flat rate for an income category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatyRateProvision {
    pub category: IncomeCategory,
    pub name: String,
    pub rate: Decimal,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn provision(cap: Option<Decimal>) -> TreatyExemptionProvision {
        TreatyExemptionProvision {
            code: IncomeTypeCode::StudyingTraining,
            name: "Studying and Training".to_string(),
            cap,
            applies_to: ExemptionTarget::Wages,
        }
    }

    #[test]
    fn claimable_limited_by_cap() {
        assert_eq!(provision(Some(dec!(5000))).claimable(dec!(6000)), dec!(5000));
    }

    #[test]
    fn claimable_limited_by_income() {
        assert_eq!(provision(Some(dec!(5000))).claimable(dec!(1200)), dec!(1200));
    }

    #[test]
    fn claimable_uncapped_returns_income() {
        assert_eq!(provision(None).claimable(dec!(88000)), dec!(88000));
    }
}
