//! Presentation of computed results.
//!
//! Amounts are exact up to this point; every value is rounded half-up to
//! cents here and nowhere earlier.

use std::fmt;
use std::io;

use nra_tax_core::calculations::common::round_half_up;
use nra_tax_core::catalog::INDIA;
use nra_tax_core::{TaxResult, TreatyCatalog};
use rust_decimal::Decimal;
use serde::Serialize;

/// Printed after computed results.
pub const DISCLAIMER: &str =
    "This tax calculator is for informational purposes only and does not constitute tax advice.";

/// One row of the Form 1040-NR summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Form line number; empty for the effective-rate row.
    pub line: &'static str,
    pub label: String,
    /// Formatted value, e.g. `1160.00` or `1.67%`.
    pub value: String,
    pub emphasized: bool,
}

impl LineItem {
    fn amount(
        line: &'static str,
        label: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            line,
            label: label.into(),
            value: format_amount(amount),
            emphasized: false,
        }
    }

    fn emphasized(self) -> Self {
        Self {
            emphasized: true,
            ..self
        }
    }
}

/// `1234.5` → `1234.50`.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_half_up(amount))
}

/// `1.666…` → `1.67%`.
pub fn format_percent(percent: Decimal) -> String {
    format!("{:.2}%", round_half_up(percent))
}

/// Builds the line items for `result`.
///
/// Line 1k only appears when some income is treaty-exempt. Line 12 mentions
/// the standard deduction for residents of India.
pub fn line_items(
    result: &TaxResult,
    country: &str,
) -> Vec<LineItem> {
    let mut items = Vec::with_capacity(10);

    let exempt = result.total_exempt_income();
    if !exempt.is_zero() {
        items.push(LineItem::amount(
            "1k",
            "Total income exempt by a treaty (Schedule OI, item L, line 1(e))",
            exempt,
        ));
    }

    let deduction_label = if country == INDIA {
        "Itemized Deductions or, for certain residents of India, standard deduction"
    } else {
        "Itemized Deductions"
    };

    items.extend([
        LineItem::amount(
            "9",
            "Total Effectively Connected Income",
            result.effectively_connected_income,
        ),
        LineItem::amount(
            "10",
            "Total Adjustments to Income",
            result.adjustments_to_income,
        ),
        LineItem::amount("11", "Adjusted Gross Income", result.adjusted_gross_income),
        LineItem::amount("12", deduction_label, result.itemized_deductions),
        LineItem::amount("15", "Taxable Income", result.taxable_income),
        LineItem::amount(
            "16",
            "Tax (on Income Effectively Connected With U.S. Trade or Business)",
            result.tax_on_effectively_connected_income,
        ),
        LineItem::amount(
            "23a",
            "Tax on income not effectively connected with a U.S. trade or business (Schedule NEC, line 15)",
            result.tax_on_nec,
        ),
        LineItem::amount("24", "Total Tax", result.total_tax).emphasized(),
        LineItem {
            line: "",
            label: "Effective Tax Rate".to_string(),
            value: format_percent(result.effective_tax_rate_percent),
            emphasized: true,
        },
    ]);

    items
}

/// Fixed-width table of line items.
pub struct LineItemTable<'a>(pub &'a [LineItem]);

impl fmt::Display for LineItemTable<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let label_width = self.0.iter().map(|i| i.label.len()).max().unwrap_or(0);
        let value_width = self.0.iter().map(|i| i.value.len()).max().unwrap_or(0);

        let mut rule_drawn = false;
        for item in self.0 {
            if item.emphasized && !rule_drawn {
                writeln!(f, "{}", "-".repeat(label_width + value_width + 8))?;
                rule_drawn = true;
            }
            let line = if item.line.is_empty() {
                String::new()
            } else {
                format!("{}.", item.line)
            };
            writeln!(
                f,
                "{line:>4}  {label:<label_width$}  {value:>value_width$}",
                label = item.label,
                value = item.value,
            )?;
        }
        Ok(())
    }
}

/// Treaty provisions offered to residents of one country.
pub struct ProvisionList<'a> {
    pub catalog: &'a TreatyCatalog,
    pub country: &'a str,
}

impl fmt::Display for ProvisionList<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let Some(profile) = self.catalog.profile(self.country) else {
            return writeln!(f, "{}: no treaty relief", self.country);
        };

        writeln!(f, "{} ({})", profile.display_name, profile.id)?;

        if !profile.exemptions.is_empty() {
            writeln!(f, "  Exemptions:")?;
        }
        for provision in &profile.exemptions {
            let cap = provision
                .cap
                .map(|cap| format!("up to {}", format_amount(cap)))
                .unwrap_or_else(|| "no cap".to_string());
            writeln!(
                f,
                "    {:>2}  {} [{}, {}]",
                provision.code,
                provision.name,
                provision.applies_to.as_str(),
                cap
            )?;
        }

        if !profile.rates.is_empty() {
            writeln!(f, "  Reduced rates:")?;
        }
        for rate in &profile.rates {
            writeln!(
                f,
                "    {}  {} [{}]",
                rate.category.as_str(),
                rate.name,
                format_percent(rate.rate * Decimal::ONE_HUNDRED)
            )?;
        }
        Ok(())
    }
}

/// Every country with a treaty profile, one per line.
pub struct CountryList<'a>(pub &'a TreatyCatalog);

impl fmt::Display for CountryList<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for profile in self.0.countries() {
            writeln!(f, "{:<12} {}", profile.id, profile.display_name)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ResultRecord<'a> {
    row: usize,
    country: &'a str,
    exempt_wages: Decimal,
    exempt_scholarships: Decimal,
    effectively_connected_income: Decimal,
    adjustments_to_income: Decimal,
    adjusted_gross_income: Decimal,
    itemized_deductions: Decimal,
    taxable_income: Decimal,
    tax_on_effectively_connected_income: Decimal,
    tax_on_nec: Decimal,
    total_tax: Decimal,
    effective_tax_rate_percent: Decimal,
}

fn cents(mut value: Decimal) -> Decimal {
    value.rescale(2);
    value
}

impl<'a> ResultRecord<'a> {
    fn new(
        row: usize,
        country: &'a str,
        result: &TaxResult,
    ) -> Self {
        let r = result.rounded();
        Self {
            row,
            country,
            exempt_wages: cents(r.exempt_wages),
            exempt_scholarships: cents(r.exempt_scholarships),
            effectively_connected_income: cents(r.effectively_connected_income),
            adjustments_to_income: cents(r.adjustments_to_income),
            adjusted_gross_income: cents(r.adjusted_gross_income),
            itemized_deductions: cents(r.itemized_deductions),
            taxable_income: cents(r.taxable_income),
            tax_on_effectively_connected_income: cents(r.tax_on_effectively_connected_income),
            tax_on_nec: cents(r.tax_on_nec),
            total_tax: cents(r.total_tax),
            effective_tax_rate_percent: cents(r.effective_tax_rate_percent),
        }
    }
}

/// Writes one CSV record per `(row, country, result)`, with a header.
pub fn write_results_csv<'a, W: io::Write>(
    out: W,
    results: impl IntoIterator<Item = (usize, &'a str, &'a TaxResult)>,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    for (row, country, result) in results {
        writer.serialize(ResultRecord::new(row, country, result))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use nra_tax_core::calculations::TaxEngine;
    use nra_tax_core::catalog::{CHINA, SOUTH_KOREA};
    use nra_tax_core::{IncomeTypeCode, TaxYearConfig, TaxpayerInput};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn compute(input: &TaxpayerInput) -> TaxResult {
        let config = TaxYearConfig::default();
        TaxEngine::new(TreatyCatalog::builtin(), &config)
            .compute(input)
            .expect("valid input")
    }

    fn china_6000() -> TaxResult {
        let catalog = TreatyCatalog::builtin();
        compute(
            &TaxpayerInput::new(CHINA)
                .with_wages(dec!(6000), catalog)
                .elect_exemption(IncomeTypeCode::StudyingTraining, catalog),
        )
    }

    // =========================================================================
    // formatting
    // =========================================================================

    #[test]
    fn amounts_have_two_places() {
        assert_eq!(format_amount(dec!(1160)), "1160.00");
        assert_eq!(format_amount(dec!(0.125)), "0.13");
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(format_percent(dec!(1.6666666)), "1.67%");
        assert_eq!(format_percent(dec!(0)), "0.00%");
    }

    // =========================================================================
    // line_items
    // =========================================================================

    #[test]
    fn china_line_items_include_exempt_income() {
        let items = line_items(&china_6000(), CHINA);
        let lines: Vec<_> = items.iter().map(|i| i.line).collect();

        assert_eq!(
            lines,
            vec!["1k", "9", "10", "11", "12", "15", "16", "23a", "24", ""]
        );
        assert_eq!(items[0].value, "5000.00");
        assert_eq!(items[8].value, "100.00");
        assert_eq!(items[9].value, "1.67%");
    }

    #[test]
    fn exempt_line_omitted_without_treaty_relief() {
        let result = compute(&TaxpayerInput::new("other").with_wages(
            dec!(20000),
            TreatyCatalog::builtin(),
        ));

        let items = line_items(&result, "other");

        assert_eq!(items.len(), 9);
        assert_eq!(items[0].line, "9");
    }

    #[test]
    fn india_deduction_label_mentions_standard_deduction() {
        let result = compute(&TaxpayerInput::new(INDIA).with_wages(
            dec!(30000),
            TreatyCatalog::builtin(),
        ));

        let items = line_items(&result, INDIA);
        let line_12 = items.iter().find(|i| i.line == "12").expect("line 12");

        assert!(line_12.label.ends_with("standard deduction"));
        assert_eq!(line_12.value, "14600.00");
    }

    #[test]
    fn total_and_rate_rows_are_emphasized() {
        let items = line_items(&china_6000(), CHINA);
        let emphasized: Vec<_> = items
            .iter()
            .filter(|i| i.emphasized)
            .map(|i| i.label.as_str())
            .collect();

        assert_eq!(emphasized, vec!["Total Tax", "Effective Tax Rate"]);
    }

    #[test]
    fn disclaimer_states_results_are_not_advice() {
        assert!(DISCLAIMER.contains("informational purposes only"));
        assert!(DISCLAIMER.ends_with("does not constitute tax advice."));
    }

    // =========================================================================
    // tables
    // =========================================================================

    #[test]
    fn table_aligns_values_and_draws_rule_before_total() {
        let items = line_items(&china_6000(), CHINA);
        let table = LineItemTable(&items).to_string();
        let rows: Vec<_> = table.lines().collect();

        assert_eq!(rows.len(), items.len() + 1);
        assert!(rows[0].starts_with(" 1k.  Total income exempt"));
        assert!(rows[8].chars().all(|c| c == '-'));
        assert!(rows[9].trim_end().ends_with("100.00"));
        assert!(rows[10].trim_end().ends_with("1.67%"));
    }

    #[test]
    fn provision_list_for_south_korea() {
        let text = ProvisionList {
            catalog: TreatyCatalog::builtin(),
            country: SOUTH_KOREA,
        }
        .to_string();

        assert!(text.starts_with("Korea, South (southKorea)"));
        assert!(text.contains("up to 2000.00"));
        assert!(text.contains("capitalGains  Treaty Rate for Capital Gains [0.00%]"));
    }

    #[test]
    fn provision_list_for_unknown_country() {
        let text = ProvisionList {
            catalog: TreatyCatalog::builtin(),
            country: "other",
        }
        .to_string();

        assert_eq!(text, "other: no treaty relief\n");
    }

    #[test]
    fn country_list_has_one_line_per_profile() {
        let text = CountryList(TreatyCatalog::builtin()).to_string();

        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("India"));
    }

    // =========================================================================
    // write_results_csv
    // =========================================================================

    #[test]
    fn csv_output_has_header_and_fixed_point_amounts() {
        let result = china_6000();
        let mut out = Vec::new();

        write_results_csv(&mut out, [(1, CHINA, &result)]).expect("write");

        let text = String::from_utf8(out).expect("utf-8");
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "row,country,exempt_wages,exempt_scholarships,effectively_connected_income,\
adjustments_to_income,adjusted_gross_income,itemized_deductions,taxable_income,\
tax_on_effectively_connected_income,tax_on_nec,total_tax,effective_tax_rate_percent"
            )
        );
        assert_eq!(
            lines.next(),
            Some("1,china,5000.00,0.00,1000.00,0.00,1000.00,0.00,1000.00,100.00,0.00,100.00,1.67")
        );
    }
}
