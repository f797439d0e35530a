use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;

/// Result of a full tax computation.
///
/// Amounts are exact; round with [`TaxResult::rounded`] (or per field with
/// [`round_half_up`]) only when presenting them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub exempt_wages: Decimal,
    pub exempt_scholarships: Decimal,

    /// Wages net of treaty exemption (Form 1040-NR, line 9).
    pub effectively_connected_income: Decimal,

    /// Scholarships net of treaty exemption (line 10).
    pub adjustments_to_income: Decimal,

    /// Line 11.
    pub adjusted_gross_income: Decimal,

    /// Line 12: itemized deductions, or the standard deduction where a treaty
    /// allows it.
    pub itemized_deductions: Decimal,

    /// Line 15, never negative.
    pub taxable_income: Decimal,

    /// Line 16.
    pub tax_on_effectively_connected_income: Decimal,

    /// Line 23a (Schedule NEC, line 15).
    pub tax_on_nec: Decimal,

    /// Line 24.
    pub total_tax: Decimal,

    /// Wages + scholarships + capital gains, before exemptions.
    pub total_income: Decimal,

    /// `total_tax / total_income` as a percentage, zero when there is no income.
    pub effective_tax_rate_percent: Decimal,
}

impl TaxResult {
    /// Total income exempt by a treaty (Schedule OI, item L, line 1(e)).
    pub fn total_exempt_income(&self) -> Decimal {
        self.exempt_wages + self.exempt_scholarships
    }

    /// Copy with every field rounded to cents.
    pub fn rounded(&self) -> Self {
        Self {
            exempt_wages: round_half_up(self.exempt_wages),
            exempt_scholarships: round_half_up(self.exempt_scholarships),
            effectively_connected_income: round_half_up(self.effectively_connected_income),
            adjustments_to_income: round_half_up(self.adjustments_to_income),
            adjusted_gross_income: round_half_up(self.adjusted_gross_income),
            itemized_deductions: round_half_up(self.itemized_deductions),
            taxable_income: round_half_up(self.taxable_income),
            tax_on_effectively_connected_income: round_half_up(
                self.tax_on_effectively_connected_income,
            ),
            tax_on_nec: round_half_up(self.tax_on_nec),
            total_tax: round_half_up(self.total_tax),
            total_income: round_half_up(self.total_income),
            effective_tax_rate_percent: round_half_up(self.effective_tax_rate_percent),
        }
    }
}
