use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One band of a progressive rate schedule.
///
/// Bands are stored in ascending order; each covers the income between the
/// previous band's `upper_bound` (or zero) and its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Top of the band. `None` for the final, unbounded band.
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn bounded(
        upper_bound: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }
}
