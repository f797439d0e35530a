//! Tax calculations for non-resident alien students.
//!
//! Each calculator borrows the read-only data it needs (the treaty catalog,
//! the tax-year parameters) and is a pure function of its arguments.
//! [`TaxEngine`] composes them into a full [`crate::TaxResult`].

mod brackets;
pub mod common;
mod deduction;
mod engine;
mod exemption;
mod nec;

pub use brackets::BracketTaxCalculator;
pub use deduction::DeductionCalculator;
pub use engine::TaxEngine;
pub use exemption::{ExemptionAllocation, ExemptionAllocator};
pub use nec::NecTaxCalculator;
