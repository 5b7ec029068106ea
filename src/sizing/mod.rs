//! Position sizing: lot size and monetary risk for two accounts.

mod calculator;
mod config;
mod error;
mod format;
mod parse;

pub use calculator::{Calculation, RiskCalculator, RiskInputs};
pub use config::SizingConfig;
pub use error::CalcError;
