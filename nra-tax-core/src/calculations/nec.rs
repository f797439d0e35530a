//! Tax on income not effectively connected with a U.S. trade or business
//! (Schedule NEC).
//!
//! Capital gains are taxed at a flat statutory rate unless the taxpayer
//! elects a reduced treaty rate their country's profile offers.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::trace;

use crate::models::IncomeCategory;
use crate::{TaxYearConfig, TreatyCatalog};

#[derive(Debug, Clone)]
pub struct NecTaxCalculator<'a> {
    catalog: &'a TreatyCatalog,
    config: &'a TaxYearConfig,
}

impl<'a> NecTaxCalculator<'a> {
    pub fn new(
        catalog: &'a TreatyCatalog,
        config: &'a TaxYearConfig,
    ) -> Self {
        Self { catalog, config }
    }

    /// Schedule NEC tax on `capital_gains`.
    pub fn nec_tax(
        &self,
        country: &str,
        capital_gains: Decimal,
        elected_rates: &BTreeMap<IncomeCategory, bool>,
    ) -> Decimal {
        let rate = self.capital_gains_rate(country, elected_rates);
        trace!(country, %capital_gains, %rate, "capital gains rate selected");
        capital_gains * rate
    }

    /// The treaty rate when elected and offered, else the default rate.
    pub fn capital_gains_rate(
        &self,
        country: &str,
        elected_rates: &BTreeMap<IncomeCategory, bool>,
    ) -> Decimal {
        let category = IncomeCategory::CapitalGains;
        let elected = elected_rates.get(&category).copied().unwrap_or(false);

        match self.catalog.rate(country, category) {
            Some(provision) if elected => provision.rate,
            _ => self.config.default_nec_rate,
        }
    }
}
