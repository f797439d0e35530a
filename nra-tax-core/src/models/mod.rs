mod income_type;
mod provision;
mod tax_bracket;
mod tax_result;
mod tax_year_config;
mod taxpayer_input;

pub use income_type::{ExemptionTarget, IncomeCategory, IncomeTypeCode};
pub use provision::{TreatyExemptionProvision, TreatyRateProvision};
pub use tax_bracket::TaxBracket;
pub use tax_result::TaxResult;
pub use tax_year_config::{TaxYearConfig, TaxYearConfigError};
pub use taxpayer_input::{MAX_AMOUNT, TaxInputError, TaxpayerInput};
