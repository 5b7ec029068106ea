//! Errors raised by the sizing calculation.

use thiserror::Error;

/// Reasons a calculation request produces no results.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalcError {
    /// Stop-loss parsed as zero; lot size would divide by zero.
    #[error("Stop loss cannot be 0")]
    InvalidStopLoss,

    /// A field holds a number outside the decimal range.
    #[error("{field} is out of range")]
    OutOfRange {
        /// Input field that failed to parse.
        field: &'static str,
    },

    /// Inputs are too large for decimal arithmetic.
    #[error("Inputs out of range while computing {step}")]
    Overflow {
        /// Calculation step that overflowed.
        step: &'static str,
    },
}
