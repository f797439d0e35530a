//! Treaty exemption allocation.
//!
//! Determines how much of a taxpayer's wages and scholarships is exempt from
//! U.S. tax under the treaty provisions they elected.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use rust_decimal_macros::dec;
//! use nra_tax_core::calculations::ExemptionAllocator;
//! use nra_tax_core::{IncomeTypeCode, TreatyCatalog};
//!
//! let allocator = ExemptionAllocator::new(TreatyCatalog::builtin());
//! let elected = BTreeMap::from([(IncomeTypeCode::StudyingTraining, dec!(5000))]);
//!
//! let allocation = allocator.allocate("china", dec!(6000), dec!(0), &elected);
//!
//! assert_eq!(allocation.exempt_wages, dec!(5000));
//! assert_eq!(allocation.exempt_scholarships, dec!(0));
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::TreatyCatalog;
use crate::calculations::common::non_negative;
use crate::models::{ExemptionTarget, IncomeTypeCode};

/// Exempt portions of each income field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExemptionAllocation {
    pub exempt_wages: Decimal,
    pub exempt_scholarships: Decimal,
}

/// Applies elected exemption provisions from a [`TreatyCatalog`].
#[derive(Debug, Clone)]
pub struct ExemptionAllocator<'a> {
    catalog: &'a TreatyCatalog,
}

impl<'a> ExemptionAllocator<'a> {
    pub fn new(catalog: &'a TreatyCatalog) -> Self {
        Self { catalog }
    }

    /// Computes the exempt portions of `wages` and `scholarships`.
    ///
    /// Provisions are visited in catalog order; only those present in
    /// `elected` contribute. Elections for codes the country does not offer
    /// are ignored, and a country without a profile exempts nothing.
    pub fn allocate(
        &self,
        country: &str,
        wages: Decimal,
        scholarships: Decimal,
        elected: &BTreeMap<IncomeTypeCode, Decimal>,
    ) -> ExemptionAllocation {
        let provisions = self.catalog.provisions_for(country);
        if provisions.is_empty() {
            return ExemptionAllocation::default();
        }

        for code in elected.keys() {
            if !provisions.iter().any(|p| p.code == *code) {
                warn!(country, %code, "elected exemption not offered by treaty; ignored");
            }
        }

        let allocation = ExemptionAllocation {
            exempt_wages: self.exempt_wages(country, wages, elected),
            exempt_scholarships: self.exempt_scholarships(country, elected),
        };

        trace!(
            country,
            %wages,
            %scholarships,
            exempt_wages = %allocation.exempt_wages,
            exempt_scholarships = %allocation.exempt_scholarships,
            "treaty exemptions allocated"
        );

        allocation
    }

    /// Sums elected wages provisions, each limited by the wages not yet
    /// exempted, its claimed amount and its cap.
    fn exempt_wages(
        &self,
        country: &str,
        wages: Decimal,
        elected: &BTreeMap<IncomeTypeCode, Decimal>,
    ) -> Decimal {
        let mut exempt = Decimal::ZERO;
        let mut remaining = wages;
        let mut applied = 0usize;

        let wage_provisions = self
            .catalog
            .provisions_for(country)
            .iter()
            .filter(|p| p.applies_to == ExemptionTarget::Wages);

        for provision in wage_provisions {
            let Some(claimed) = elected.get(&provision.code) else {
                continue;
            };

            let amount = non_negative(provision.claimable(remaining.min(*claimed)));
            exempt += amount;
            remaining -= amount;
            applied += 1;

            trace!(code = %provision.code, %amount, %remaining, "wage exemption applied");
        }

        if applied > 1 {
            warn!(
                country,
                applied, "more than one wages exemption elected; amounts summed"
            );
        }

        exempt
    }

    /// Sums the claimed amounts of elected scholarship provisions.
    ///
    /// The provision cap is not applied here; the claimed amount is the only
    /// bound.
    fn exempt_scholarships(
        &self,
        country: &str,
        elected: &BTreeMap<IncomeTypeCode, Decimal>,
    ) -> Decimal {
        self.catalog
            .provisions_for(country)
            .iter()
            .filter(|p| p.applies_to == ExemptionTarget::Scholarships)
            .filter_map(|p| elected.get(&p.code))
            .copied()
            .map(non_negative)
            .sum()
    }
}
