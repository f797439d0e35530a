//! U.S. federal tax computation for non-resident alien students.
//!
//! The entry point is [`calculations::TaxEngine::compute`], which turns a
//! [`TaxpayerInput`] into a [`TaxResult`] using the treaty relief recorded in
//! a [`TreatyCatalog`] and the rate schedule in a [`TaxYearConfig`].

pub mod calculations;
pub mod catalog;
pub mod elections;
pub mod models;

pub use catalog::{CountryProfile, TreatyCatalog};
pub use elections::recompute_dependents;
pub use models::*;
