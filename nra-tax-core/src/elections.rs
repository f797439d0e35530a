//! Keeping treaty elections consistent with the income they apply to.
//!
//! Every operation here takes a [`TaxpayerInput`] by value and returns the
//! replacement value; the engine itself never adjusts elections. After any
//! field change the result has passed through [`recompute_dependents`], so:
//!
//! - at most one wages provision is elected,
//! - every claimed amount is within `min(cap, income)`,
//! - wages claims track the current wages,
//! - capital gains is never negative.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use nra_tax_core::{IncomeTypeCode, TaxpayerInput, TreatyCatalog};
//!
//! let catalog = TreatyCatalog::builtin();
//!
//! let input = TaxpayerInput::new("china")
//!     .with_wages(dec!(3000), catalog)
//!     .elect_exemption(IncomeTypeCode::StudyingTraining, catalog);
//! assert_eq!(input.elected_exemptions[&IncomeTypeCode::StudyingTraining], dec!(3000));
//!
//! // Raising wages re-clamps the claim to the provision's cap.
//! let input = input.with_wages(dec!(8000), catalog);
//! assert_eq!(input.elected_exemptions[&IncomeTypeCode::StudyingTraining], dec!(5000));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::TreatyCatalog;
use crate::calculations::common::non_negative;
use crate::models::{ExemptionTarget, IncomeCategory, IncomeTypeCode, TaxpayerInput};

impl TaxpayerInput {
    pub fn with_country(
        self,
        country: impl Into<String>,
        catalog: &TreatyCatalog,
    ) -> Self {
        recompute_dependents(
            Self {
                foreign_country: country.into(),
                ..self
            },
            catalog,
        )
    }

    pub fn with_wages(
        self,
        wages: Decimal,
        catalog: &TreatyCatalog,
    ) -> Self {
        recompute_dependents(Self { wages, ..self }, catalog)
    }

    pub fn with_scholarships(
        self,
        scholarships: Decimal,
        catalog: &TreatyCatalog,
    ) -> Self {
        recompute_dependents(
            Self {
                scholarships,
                ..self
            },
            catalog,
        )
    }

    /// Sets capital gains, clamping negative amounts to zero.
    pub fn with_capital_gains(
        self,
        capital_gains: Decimal,
        catalog: &TreatyCatalog,
    ) -> Self {
        recompute_dependents(
            Self {
                capital_gains: non_negative(capital_gains),
                ..self
            },
            catalog,
        )
    }

    pub fn with_charitable_distributions(
        self,
        charitable_distributions: Decimal,
        catalog: &TreatyCatalog,
    ) -> Self {
        recompute_dependents(
            Self {
                charitable_distributions,
                ..self
            },
            catalog,
        )
    }

    pub fn with_state_local_taxes(
        self,
        state_local_taxes: Decimal,
        catalog: &TreatyCatalog,
    ) -> Self {
        recompute_dependents(
            Self {
                state_local_taxes,
                ..self
            },
            catalog,
        )
    }

    /// Elects the exemption provision `code` for the current country.
    ///
    /// Electing a wages provision drops any other wages provision and claims
    /// as much of the current wages as the cap allows. Electing a scholarship
    /// provision claims the current scholarships. A code the country does not
    /// offer leaves the input unchanged.
    pub fn elect_exemption(
        mut self,
        code: IncomeTypeCode,
        catalog: &TreatyCatalog,
    ) -> Self {
        let country = self.foreign_country.as_str();
        let Some(provision) = catalog.exemption(country, code) else {
            warn!(country, %code, "exemption not offered by treaty; election ignored");
            return self;
        };

        let claimed = match provision.applies_to {
            ExemptionTarget::Wages => {
                for other in catalog.provisions_for(country) {
                    if other.applies_to == ExemptionTarget::Wages && other.code != code {
                        self.elected_exemptions.remove(&other.code);
                    }
                }
                provision.claimable(self.wages)
            }
            ExemptionTarget::Scholarships => self.scholarships,
        };

        self.elected_exemptions.insert(code, claimed);
        self
    }

    pub fn revoke_exemption(
        mut self,
        code: IncomeTypeCode,
    ) -> Self {
        self.elected_exemptions.remove(&code);
        self
    }

    pub fn set_rate_election(
        mut self,
        category: IncomeCategory,
        elected: bool,
    ) -> Self {
        self.elected_rates.insert(category, elected);
        self
    }
}

/// Re-derives `elected_exemptions` from the current country and income.
///
/// - Elections for codes the country does not offer are dropped.
/// - If several wages provisions are elected, only the first in catalog order
///   is kept.
/// - Wages claims are reset to `min(cap, wages)`.
/// - Scholarship claims are reset to the current scholarships.
/// - Capital gains is clamped to zero from below.
pub fn recompute_dependents(
    mut input: TaxpayerInput,
    catalog: &TreatyCatalog,
) -> TaxpayerInput {
    let provisions = catalog.provisions_for(&input.foreign_country);

    let before = input.elected_exemptions.len();
    input
        .elected_exemptions
        .retain(|code, _| provisions.iter().any(|p| p.code == *code));

    let mut wages_elected = false;
    for provision in provisions {
        let Some(claimed) = input.elected_exemptions.get_mut(&provision.code) else {
            continue;
        };

        match provision.applies_to {
            ExemptionTarget::Wages if wages_elected => {
                input.elected_exemptions.remove(&provision.code);
            }
            ExemptionTarget::Wages => {
                *claimed = provision.claimable(input.wages);
                wages_elected = true;
            }
            ExemptionTarget::Scholarships => {
                *claimed = input.scholarships;
            }
        }
    }

    if input.elected_exemptions.len() != before {
        debug!(
            country = %input.foreign_country,
            dropped = before - input.elected_exemptions.len(),
            "stale exemption elections dropped"
        );
    }

    input.capital_gains = non_negative(input.capital_gains);
    input
}
