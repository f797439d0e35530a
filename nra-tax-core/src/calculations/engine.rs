//! Full Form 1040-NR tax computation.
//!
//! # Computation
//!
//! | Line | Description |
//! |------|-------------|
//! | 1k   | Treaty-exempt income (exempt wages + exempt scholarships) |
//! | 9    | Effectively connected income: wages - exempt wages |
//! | 10   | Adjustments to income: scholarships - exempt scholarships |
//! | 11   | Adjusted gross income: line 9 + line 10 |
//! | 12   | Itemized deductions (standard deduction floor for India) |
//! | 15   | Taxable income: line 11 - line 12, minimum 0 |
//! | 16   | Tax on line 15 from the rate schedule |
//! | 23a  | Tax on capital gains (Schedule NEC) |
//! | 24   | Total tax: line 16 + line 23a |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use nra_tax_core::calculations::common::round_half_up;
//! use nra_tax_core::calculations::TaxEngine;
//! use nra_tax_core::{IncomeTypeCode, TaxYearConfig, TaxpayerInput, TreatyCatalog};
//!
//! let catalog = TreatyCatalog::builtin();
//! let config = TaxYearConfig::default();
//! let engine = TaxEngine::new(catalog, &config);
//!
//! let input = TaxpayerInput::new("china")
//!     .with_wages(dec!(6000), catalog)
//!     .elect_exemption(IncomeTypeCode::StudyingTraining, catalog);
//!
//! let result = engine.compute(&input).unwrap();
//!
//! assert_eq!(result.exempt_wages, dec!(5000));
//! assert_eq!(result.taxable_income, dec!(1000));
//! assert_eq!(result.total_tax, dec!(100.00));
//! assert_eq!(round_half_up(result.effective_tax_rate_percent), dec!(1.67));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{non_negative, percent_of};
use crate::calculations::{
    BracketTaxCalculator, DeductionCalculator, ExemptionAllocator, NecTaxCalculator,
};
use crate::models::{TaxInputError, TaxResult, TaxpayerInput};
use crate::{TaxYearConfig, TreatyCatalog};

/// Composes the allocator and calculators into a [`TaxResult`].
///
/// Holds only shared references to read-only data, so one engine can serve
/// any number of callers.
#[derive(Debug, Clone)]
pub struct TaxEngine<'a> {
    catalog: &'a TreatyCatalog,
    config: &'a TaxYearConfig,
}

impl<'a> TaxEngine<'a> {
    pub fn new(
        catalog: &'a TreatyCatalog,
        config: &'a TaxYearConfig,
    ) -> Self {
        Self { catalog, config }
    }

    /// Computes every result line for `input`.
    ///
    /// # Errors
    ///
    /// Returns [`TaxInputError`] if any money field or claimed exemption is
    /// negative.
    pub fn compute(
        &self,
        input: &TaxpayerInput,
    ) -> Result<TaxResult, TaxInputError> {
        input.validate()?;

        let country = input.foreign_country.as_str();

        let allocation = ExemptionAllocator::new(self.catalog).allocate(
            country,
            input.wages,
            input.scholarships,
            &input.elected_exemptions,
        );

        let effectively_connected_income = input.wages - allocation.exempt_wages;
        let adjustments_to_income = input.scholarships - allocation.exempt_scholarships;
        let adjusted_gross_income = effectively_connected_income + adjustments_to_income;

        let itemized_deductions = DeductionCalculator::new(self.config).deduction(
            country,
            input.charitable_distributions,
            input.state_local_taxes,
        );
        let taxable_income = self.taxable_income(adjusted_gross_income, itemized_deductions);

        let tax_on_effectively_connected_income =
            BracketTaxCalculator::new(&self.config.brackets).tax(taxable_income);
        let tax_on_nec = NecTaxCalculator::new(self.catalog, self.config).nec_tax(
            country,
            input.capital_gains,
            &input.elected_rates,
        );
        let total_tax = tax_on_effectively_connected_income + tax_on_nec;

        let total_income = input.total_income();
        let effective_tax_rate_percent = percent_of(total_tax, total_income);

        debug!(
            country,
            %taxable_income,
            %total_tax,
            "tax computed"
        );

        Ok(TaxResult {
            exempt_wages: allocation.exempt_wages,
            exempt_scholarships: allocation.exempt_scholarships,
            effectively_connected_income,
            adjustments_to_income,
            adjusted_gross_income,
            itemized_deductions,
            taxable_income,
            tax_on_effectively_connected_income,
            tax_on_nec,
            total_tax,
            total_income,
            effective_tax_rate_percent,
        })
    }

    /// Taxable income, clamped to zero before it reaches the rate schedule.
    fn taxable_income(
        &self,
        agi: Decimal,
        deductions: Decimal,
    ) -> Decimal {
        non_negative(agi - deductions)
    }
}
