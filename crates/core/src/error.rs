//! Error types for the measurement core

use crate::units::QuantityKind;
use thiserror::Error;

/// Measurement errors
///
/// None of these are fatal: callers log them and keep the previous state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// Unit symbol not present in the registry for this quantity kind
    #[error("unknown {kind} unit: {symbol:?}")]
    UnknownUnit { kind: QuantityKind, symbol: String },

    /// Quantity kind name not recognised
    #[error("unknown quantity kind: {0:?}")]
    UnknownQuantity(String),

    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for measurement operations
pub type Result<T> = std::result::Result<T, MeasureError>;
