use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when text cannot be used as a money amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("invalid amount '{input}': {reason}")]
    Invalid { input: String, reason: String },

    #[error("amount must be non-negative, got '{0}'")]
    Negative(String),
}

/// Normalizes user-entered text: trims whitespace, drops thousands
/// separators and a leading `$`, and strips leading zeros.
fn normalize_amount_input(s: &str) -> String {
    let cleaned = s.trim().replace(',', "");
    let (sign, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", cleaned.as_str()),
    };
    let digits = digits.strip_prefix('$').unwrap_or(digits);
    let digits = digits.trim_start_matches('0');

    match digits {
        "" if cleaned.is_empty() => String::new(),
        "" => "0".to_string(),
        d if d.starts_with('.') => format!("{sign}0{d}"),
        d => format!("{sign}{d}"),
    }
}

fn parse_signed(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e: rust_decimal::Error| {
        tracing::error!(input = %s, "invalid amount: {}", e);
        ParseAmountError::Invalid {
            input: s.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Parses a non-negative money amount.
///
/// Handles `1,234.56`, `$1234.56` and `007`. Empty or whitespace-only input
/// is treated as 0.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let value = parse_signed(s)?;
    if value < Decimal::ZERO {
        return Err(ParseAmountError::Negative(s.trim().to_string()));
    }
    Ok(value)
}

/// Parses a capital gains amount, clamping losses to 0.
pub fn parse_capital_gains(s: &str) -> Result<Decimal, ParseAmountError> {
    let value = parse_signed(s)?;
    if value < Decimal::ZERO {
        tracing::debug!(input = %s, "capital loss clamped to zero");
        return Ok(Decimal::ZERO);
    }
    Ok(value)
}
