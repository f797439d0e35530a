//! CSV loader for taxpayer scenarios.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Whitespace
//! around values is trimmed and every row must have the header's column count.
//!
//! | Column                      | Required | Type    | Notes                              |
//! |-----------------------------|----------|---------|------------------------------------|
//! | `country`                   | yes      | string  | `china`, `southKorea`, `india`, ...|
//! | `wages`                     | no       | decimal | Empty = 0                          |
//! | `scholarships`              | no       | decimal | Empty = 0                          |
//! | `capital_gains`             | no       | decimal | Empty = 0, losses clamp to 0       |
//! | `charitable_distributions`  | no       | decimal | Empty = 0                          |
//! | `state_local_taxes`         | no       | decimal | Empty = 0                          |
//! | `elect`                     | no       | string  | `;`-separated codes, e.g. `20;16`  |
//! | `treaty_rate_capital_gains` | no       | bool    | `true` / `false`, empty = false    |
//!
//! ### Example
//!
//! ```csv
//! country,wages,scholarships,capital_gains,elect,treaty_rate_capital_gains
//! china,6000,,,20,
//! southKorea,25000,10000,4000,20;16,true
//! ```
//!
//! Each row is assembled through the election operations in
//! [`nra_tax_core::elections`], so elections are clamped to the row's income
//! and a later wages code replaces an earlier one.

use std::path::Path;

use nra_tax_core::{IncomeCategory, IncomeTypeCode, TaxpayerInput, TreatyCatalog};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CsvRow {
    country: String,
    wages: Option<Decimal>,
    scholarships: Option<Decimal>,
    capital_gains: Option<Decimal>,
    charitable_distributions: Option<Decimal>,
    state_local_taxes: Option<Decimal>,
    elect: Option<String>,
    treaty_rate_capital_gains: Option<bool>,
}

/// Errors that can occur while loading scenario rows.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// Bad structure, missing required column, or a value of the wrong type.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// An `elect` cell named a code that is not 16, 19 or 20.
    #[error("unrecognised income code '{code}' on row {row}")]
    InvalidIncomeCode { code: String, row: usize },

    /// A money column held a negative amount.
    #[error("{field} must be non-negative on row {row}, got {value}")]
    NegativeAmount {
        field: &'static str,
        value: Decimal,
        row: usize,
    },

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A parsed scenario with the row it came from (1-based, header excluded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub row: usize,
    pub input: TaxpayerInput,
}

fn amount(
    value: Option<Decimal>,
    field: &'static str,
    row: usize,
) -> Result<Decimal, CsvLoadError> {
    let value = value.unwrap_or(Decimal::ZERO);
    if value < Decimal::ZERO {
        return Err(CsvLoadError::NegativeAmount { field, value, row });
    }
    Ok(value)
}

fn parse_codes(
    cell: Option<&str>,
    row: usize,
) -> Result<Vec<IncomeTypeCode>, CsvLoadError> {
    cell.unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| {
            IncomeTypeCode::parse(code).ok_or_else(|| CsvLoadError::InvalidIncomeCode {
                code: code.to_string(),
                row,
            })
        })
        .collect()
}

/// Convert a single CSV row into a scenario.
fn convert_row(
    row: CsvRow,
    row_number: usize,
    catalog: &TreatyCatalog,
) -> Result<Scenario, CsvLoadError> {
    let codes = parse_codes(row.elect.as_deref(), row_number)?;

    let mut input = TaxpayerInput::new(row.country)
        .with_wages(amount(row.wages, "wages", row_number)?, catalog)
        .with_scholarships(
            amount(row.scholarships, "scholarships", row_number)?,
            catalog,
        )
        .with_capital_gains(row.capital_gains.unwrap_or(Decimal::ZERO), catalog)
        .with_charitable_distributions(
            amount(
                row.charitable_distributions,
                "charitable_distributions",
                row_number,
            )?,
            catalog,
        )
        .with_state_local_taxes(
            amount(row.state_local_taxes, "state_local_taxes", row_number)?,
            catalog,
        );

    for code in codes {
        input = input.elect_exemption(code, catalog);
    }
    if let Some(elected) = row.treaty_rate_capital_gains {
        input = input.set_rate_election(IncomeCategory::CapitalGains, elected);
    }

    Ok(Scenario {
        row: row_number,
        input,
    })
}

/// Parse CSV text and return the scenarios in file order.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is structurally invalid or a value
///   cannot be deserialised.
/// * [`CsvLoadError::InvalidIncomeCode`] for an unknown code in `elect`.
/// * [`CsvLoadError::NegativeAmount`] for a negative money value other than
///   capital gains.
pub fn load_from_str(
    input: &str,
    catalog: &TreatyCatalog,
) -> Result<Vec<Scenario>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| convert_row(result?, idx + 1, catalog))
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(
    path: &Path,
    catalog: &TreatyCatalog,
) -> Result<Vec<Scenario>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents, catalog)
}
