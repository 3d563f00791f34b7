//! Decimal Codec - Human Decimal Strings ⇄ Raw Integer Amounts
//!
//! Every asset amount inside the engine is a [`RawAmount`]: an unsigned integer
//! scaled by the owning asset's decimal precision. Text only exists at the
//! edges, where users type amounts and where derived amounts are rendered.
//!
//! ## Precision Examples
//!
//! - **6 decimals**: `"1.5"` ⇄ `1_500_000`
//! - **9 decimals**: `"0.000000001"` ⇄ `1`
//! - **0 decimals**: `"42"` ⇄ `42`
//!
//! ## Critical Rules
//!
//! 1. **NO FLOATING POINT**: conversion is pure digit manipulation
//! 2. **Truncate, never round up**: extra fractional digits are dropped
//! 3. **Fixed rendering**: output always carries exactly `precision` fractional digits
//!
//! Round-trip law: `to_raw(&to_decimal_string(r, p), p) == Ok(r)` for every raw
//! amount `r` and precision `p <= MAX_PRECISION`.
//!
//! ```rust
//! use swap_types::precision::{to_decimal_string, to_raw, RawAmount};
//!
//! let raw = to_raw("10.1234567", 6).unwrap();
//! assert_eq!(raw, RawAmount::new(10_123_456));
//! assert_eq!(to_decimal_string(raw, 6), "10.123456");
//! ```

use crate::common::errors::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest precision whose scale factor (`10^precision`) fits a `u128`
pub const MAX_PRECISION: u8 = 38;

/// Integer amount in an asset's smallest unit
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RawAmount(pub u128);

impl RawAmount {
    pub const ZERO: Self = Self(0);

    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u128 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Subtraction floored at zero
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for RawAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for RawAmount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u64> for RawAmount {
    fn from(value: u64) -> Self {
        Self(value as u128)
    }
}

/// `10^precision` as a `u128`
pub fn pow10(precision: u8) -> Result<u128, CodecError> {
    if precision > MAX_PRECISION {
        return Err(CodecError::PrecisionTooLarge {
            precision,
            max: MAX_PRECISION,
        });
    }
    Ok(10u128.pow(precision as u32))
}

/// Edit-boundary check mirroring `^\d*\.?\d*$`
///
/// Accepts partially typed input such as `""`, `"."` and `"10."`; use
/// [`has_digits`] to tell whether such input carries a number yet.
pub fn is_decimal_input(input: &str) -> bool {
    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (input, ""),
    };
    whole.bytes().all(|b| b.is_ascii_digit()) && fraction.bytes().all(|b| b.is_ascii_digit())
}

/// True when the input contains at least one digit
pub fn has_digits(input: &str) -> bool {
    input.bytes().any(|b| b.is_ascii_digit())
}

/// Parse a decimal string into a raw amount at `precision`
///
/// Fractional digits beyond `precision` are truncated.
pub fn to_raw(input: &str, precision: u8) -> Result<RawAmount, CodecError> {
    if !is_decimal_input(input) || !has_digits(input) {
        return Err(CodecError::InvalidFormat {
            input: input.to_string(),
        });
    }
    let scale = pow10(precision)?;
    let overflow = || CodecError::Overflow {
        input: input.to_string(),
        precision,
    };

    let (whole, fraction) = input.split_once('.').unwrap_or((input, ""));

    let mut whole_value: u128 = 0;
    for digit in whole.bytes() {
        whole_value = whole_value
            .checked_mul(10)
            .and_then(|v| v.checked_add((digit - b'0') as u128))
            .ok_or_else(overflow)?;
    }

    // Pad or truncate the fraction to exactly `precision` digits
    let mut fraction_value: u128 = 0;
    let mut digits = fraction.bytes();
    for _ in 0..precision {
        let digit = digits.next().map(|b| (b - b'0') as u128).unwrap_or(0);
        fraction_value = fraction_value * 10 + digit;
    }

    whole_value
        .checked_mul(scale)
        .and_then(|v| v.checked_add(fraction_value))
        .map(RawAmount)
        .ok_or_else(overflow)
}

/// Render a raw amount with exactly `precision` fractional digits
pub fn to_decimal_string(raw: RawAmount, precision: u8) -> String {
    let digits = raw.0.to_string();
    let precision = precision as usize;
    if precision == 0 {
        return digits;
    }

    let padded = if digits.len() <= precision {
        format!("{}{}", "0".repeat(precision + 1 - digits.len()), digits)
    } else {
        digits
    };
    let split = padded.len() - precision;
    format!("{}.{}", &padded[..split], &padded[split..])
}

/// Zero rendered at `precision`, e.g. `"0.000000"` for six decimals
pub fn zero_string(precision: u8) -> String {
    to_decimal_string(RawAmount::ZERO, precision)
}
