//! Fixed-point values with an explicit decimal scale
//!
//! Pool prices, pool fees and slippage tolerances all arrive as an integer
//! mantissa paired with the number of decimal digits it is scaled by. Keeping
//! the scale next to the value lets every consumer divide by the right
//! denominator without guessing.
//!
//! ## Design Principles
//!
//! - **No Precision Loss**: values are stored as scaled integers
//! - **Explicit Scale**: `value / 10^scale` is the represented number
//! - **Clear Boundaries**: `rust_decimal::Decimal` is only used for config and display

use crate::common::errors::FixedPointError;
use crate::precision::{pow10, to_decimal_string, to_raw, RawAmount, MAX_PRECISION};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-negative fixed-point number `value / 10^scale`
///
/// Examples at scale 12:
/// - 0.3% fee = `FixedPoint { value: 3_000_000_000, scale: 12 }`
/// - 1% slippage = `FixedPoint { value: 10_000_000_000, scale: 12 }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedPoint {
    /// Scaled integer mantissa
    pub value: u128,
    /// Number of decimal digits the mantissa is scaled by
    pub scale: u8,
}

impl FixedPoint {
    pub const fn new(value: u128, scale: u8) -> Self {
        Self { value, scale }
    }

    pub const fn zero(scale: u8) -> Self {
        Self { value: 0, scale }
    }

    /// Exactly one at the given scale
    pub fn one(scale: u8) -> Result<Self, FixedPointError> {
        Ok(Self {
            value: Self::checked_denominator(scale)?,
            scale,
        })
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    fn checked_denominator(scale: u8) -> Result<u128, FixedPointError> {
        pow10(scale).map_err(|_| FixedPointError::ScaleTooLarge {
            scale,
            max: MAX_PRECISION,
        })
    }

    /// Parse from a plain decimal string, truncating digits beyond `scale`
    ///
    /// This is the primary constructor for values read from snapshots and
    /// configuration files.
    pub fn from_decimal_str(input: &str, scale: u8) -> Result<Self, FixedPointError> {
        let raw = to_raw(input, scale)?;
        Ok(Self::new(raw.get(), scale))
    }

    /// Convert from a `Decimal`, truncating digits beyond `scale`
    pub fn from_decimal(decimal: Decimal, scale: u8) -> Result<Self, FixedPointError> {
        if decimal.is_sign_negative() && !decimal.is_zero() {
            return Err(FixedPointError::Negative {
                value: decimal.to_string(),
            });
        }
        let denominator = Self::checked_denominator(scale)?;
        let overflow = || FixedPointError::Overflow {
            value: decimal.to_string(),
            scale,
        };

        // Split so the multiplication never leaves Decimal's 96-bit mantissa
        let whole = decimal.trunc().to_u128().ok_or_else(overflow)?;
        let fraction = decimal.fract();
        let fraction_scaled = Decimal::from_u128(denominator)
            .and_then(|d| fraction.checked_mul(d))
            .map(|f| f.trunc())
            .and_then(|f| f.to_u128())
            .ok_or_else(overflow)?;

        whole
            .checked_mul(denominator)
            .and_then(|v| v.checked_add(fraction_scaled))
            .map(|value| Self::new(value, scale))
            .ok_or_else(overflow)
    }

    /// Convert a percentage (e.g. `1` for 1%) into a fraction at `scale`
    pub fn from_percent(percent: Decimal, scale: u8) -> Result<Self, FixedPointError> {
        let fraction = percent
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or_else(|| FixedPointError::InvalidDecimal {
                input: percent.to_string(),
            })?;
        Self::from_decimal(fraction, scale)
    }

    /// Lossy conversion to `Decimal` for display; `None` when out of range
    pub fn to_decimal(&self) -> Option<Decimal> {
        if self.scale > 28 {
            let shift = Self::checked_denominator(self.scale - 28).ok()?;
            let value = i128::try_from(self.value / shift).ok()?;
            return Decimal::try_from_i128_with_scale(value, 28).ok();
        }
        let value = i128::try_from(self.value).ok()?;
        Decimal::try_from_i128_with_scale(value, self.scale as u32).ok()
    }

    /// Re-express at another scale, truncating when the scale shrinks
    pub fn rescale(&self, scale: u8) -> Result<Self, FixedPointError> {
        if scale >= self.scale {
            let factor = Self::checked_denominator(scale - self.scale)?;
            let value = self
                .value
                .checked_mul(factor)
                .ok_or_else(|| FixedPointError::Overflow {
                    value: self.to_string(),
                    scale,
                })?;
            Ok(Self::new(value, scale))
        } else {
            let factor = Self::checked_denominator(self.scale - scale)?;
            Ok(Self::new(self.value / factor, scale))
        }
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", to_decimal_string(RawAmount::new(self.value), self.scale))
    }
}
