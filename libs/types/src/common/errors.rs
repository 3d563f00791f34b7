//! Error types for decimal conversion, fixed-point values and identifier parsing
//!
//! All of these are edge-of-system errors: they fire when text or external
//! snapshot data is converted into the numeric types the engine works with.

use thiserror::Error;

/// Errors raised by the decimal codec
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Input is not a plain non-negative decimal number
    #[error("Invalid decimal amount: '{input}' - expected digits with an optional single decimal point")]
    InvalidFormat { input: String },

    /// Input is well formed but does not fit a raw amount
    #[error("Amount '{input}' overflows a raw amount at precision {precision}")]
    Overflow { input: String, precision: u8 },

    /// Precision beyond what a raw amount can scale to
    #[error("Precision {precision} exceeds the supported maximum of {max}")]
    PrecisionTooLarge { precision: u8, max: u8 },
}

/// Errors that can occur while building fixed-point values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FixedPointError {
    /// Invalid decimal string format
    #[error("Invalid decimal string: '{input}' - expected numeric format")]
    InvalidDecimal { input: String },

    /// Fixed-point values in this crate are non-negative
    #[error("Negative value {value} cannot be represented")]
    Negative { value: String },

    /// Value exceeds the maximum representable value at the requested scale
    #[error("Overflow: {value} exceeds the representable range at scale {scale}")]
    Overflow { value: String, scale: u8 },

    /// Scale beyond the supported maximum
    #[error("Scale {scale} exceeds the supported maximum of {max}")]
    ScaleTooLarge { scale: u8, max: u8 },
}

/// Errors that can occur while parsing identifiers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identifier text is not valid hex
    #[error("Invalid hex identifier: '{input}'")]
    InvalidHex { input: String },

    /// Identifier has the wrong number of bytes
    #[error("Identifier must be {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

impl From<CodecError> for FixedPointError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::InvalidFormat { input } => FixedPointError::InvalidDecimal { input },
            CodecError::Overflow { input, precision } => FixedPointError::Overflow {
                value: input,
                scale: precision,
            },
            CodecError::PrecisionTooLarge { precision, max } => {
                FixedPointError::ScaleTooLarge { scale: precision, max }
            }
        }
    }
}
