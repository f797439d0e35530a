//! Command-line front end for the non-resident alien tax engine.
//!
//! Turns text and CSV input into [`nra_tax_core::TaxpayerInput`] values and
//! renders the engine's results as Form 1040-NR line items.

pub mod config;
pub mod csv_loader;
pub mod logging;
pub mod render;
pub mod utils;
