//! Sqrt-price quote math with exact integer arithmetic
//!
//! Produces the linear, liquidity-unaware estimate shown while the
//! authoritative simulation is in flight. The pool price is Y per X in whole
//! units: `price_ratio = sqrt_price^2 / 10^scale`, kept at the sqrt price's
//! scale. Every intermediate is a `BigUint` so a wide sqrt price times a large
//! amount can never wrap; only the final result is narrowed back to a raw
//! amount.

use crate::pool_traits::SqrtPricePool;
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use swap_types::precision::pow10;
use swap_types::{AssetId, FixedPoint, RawAmount};
use thiserror::Error;

/// Which way a trade crosses a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Sell token X for token Y
    XtoY,
    /// Sell token Y for token X
    YtoX,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::XtoY => Direction::YtoX,
            Direction::YtoX => Direction::XtoY,
        }
    }
}

/// How the pool fee is folded into a quoted output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeMode {
    None,
    /// Output net of the fee; used when the input amount is known
    Deducted,
    /// Output grossed up by the fee; approximates the input needed for a known output
    AddedBack,
}

/// One side-to-side pass through a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapLeg {
    pub direction: Direction,
    pub asset_in: AssetId,
    pub asset_out: AssetId,
    pub precision_in: u8,
    pub precision_out: u8,
}

impl SwapLeg {
    /// Same pool crossed the other way
    pub fn reversed(&self) -> Self {
        Self {
            direction: self.direction.reversed(),
            asset_in: self.asset_out,
            asset_out: self.asset_in,
            precision_in: self.precision_out,
            precision_out: self.precision_in,
        }
    }
}

/// Result of a local quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub asset_in: AssetId,
    pub asset_out: AssetId,
    pub amount_in: RawAmount,
    pub amount_out: RawAmount,
    /// Output for one whole input unit, fee excluded, at the output precision
    pub unit_rate: RawAmount,
    pub fee_mode: FeeMode,
    pub success: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("Pool price is zero; cannot quote")]
    ZeroPrice,

    #[error("Quote overflowed a raw amount during {stage}")]
    Overflow { stage: &'static str },

    #[error("Unsupported scale {scale}")]
    Scale { scale: u8 },
}

/// Quote calculator over any sqrt-price pool
pub struct QuoteMath;

impl QuoteMath {
    /// `sqrt_price^2 / 10^scale`, truncating, at the sqrt price's own scale
    pub fn price_ratio<P: SqrtPricePool + ?Sized>(pool: &P) -> Result<BigUint, QuoteError> {
        let sqrt = pool.sqrt_price();
        let scale = big_pow10(sqrt.scale)?;
        let sqrt_value = BigUint::from(sqrt.value);
        Ok(&sqrt_value * &sqrt_value / scale)
    }

    /// Quote `amount_in` across `pool` along `leg`
    pub fn quote<P: SqrtPricePool + ?Sized>(
        pool: &P,
        leg: &SwapLeg,
        amount_in: RawAmount,
        fee_mode: FeeMode,
    ) -> Result<Quote, QuoteError> {
        let amount_out = Self::amount_out(pool, leg, amount_in, fee_mode)?;
        let unit_rate = Self::unit_rate(pool, leg)?;
        Ok(Quote {
            asset_in: leg.asset_in,
            asset_out: leg.asset_out,
            amount_in,
            amount_out,
            unit_rate,
            fee_mode,
            success: true,
        })
    }

    /// Output amount only
    pub fn amount_out<P: SqrtPricePool + ?Sized>(
        pool: &P,
        leg: &SwapLeg,
        amount_in: RawAmount,
        fee_mode: FeeMode,
    ) -> Result<RawAmount, QuoteError> {
        let sqrt_scale = pool.sqrt_price().scale;
        let ratio = Self::price_ratio(pool)?;
        if ratio.is_zero() {
            return Err(QuoteError::ZeroPrice);
        }
        let one = big_pow10(sqrt_scale)?;
        let input = BigUint::from(amount_in.get());

        let priced = match leg.direction {
            Direction::XtoY => input * &ratio / &one,
            Direction::YtoX => input * &one / &ratio,
        };

        let fee = pool.fee();
        let fee_part = &priced * BigUint::from(fee.value) / big_pow10(fee.scale)?;
        let with_fee = match fee_mode {
            FeeMode::None => priced,
            // fee <= 100% keeps this non-negative; anything above floors at zero
            FeeMode::Deducted => {
                if fee_part > priced {
                    BigUint::zero()
                } else {
                    priced - fee_part
                }
            }
            FeeMode::AddedBack => priced + fee_part,
        };

        let corrected = if leg.precision_out >= leg.precision_in {
            with_fee * big_pow10(leg.precision_out - leg.precision_in)?
        } else {
            with_fee / big_pow10(leg.precision_in - leg.precision_out)?
        };

        narrow(&corrected, "amount out")
    }

    /// Output for exactly one whole unit of the input asset, no fee
    pub fn unit_rate<P: SqrtPricePool + ?Sized>(
        pool: &P,
        leg: &SwapLeg,
    ) -> Result<RawAmount, QuoteError> {
        let one_unit = pow10(leg.precision_in).map_err(|_| QuoteError::Scale {
            scale: leg.precision_in,
        })?;
        Self::amount_out(pool, leg, RawAmount::new(one_unit), FeeMode::None)
    }

    /// Display price, Y per X in whole units
    pub fn spot_price<P: SqrtPricePool + ?Sized>(pool: &P) -> Result<Decimal, QuoteError> {
        let scale = pool.sqrt_price().scale;
        let ratio = narrow(&Self::price_ratio(pool)?, "spot price")?;
        FixedPoint::new(ratio.get(), scale)
            .to_decimal()
            .ok_or(QuoteError::Overflow {
                stage: "spot price",
            })
    }

    /// Fee portion of an output amount, truncated
    pub fn fee_amount(amount_out: RawAmount, fee: FixedPoint) -> Result<RawAmount, QuoteError> {
        fraction_of(amount_out, fee)
    }
}

/// `amount * fraction`, truncated
pub fn fraction_of(amount: RawAmount, fraction: FixedPoint) -> Result<RawAmount, QuoteError> {
    let part =
        BigUint::from(amount.get()) * BigUint::from(fraction.value) / big_pow10(fraction.scale)?;
    narrow(&part, "fraction")
}

fn big_pow10(scale: u8) -> Result<BigUint, QuoteError> {
    if scale > 76 {
        return Err(QuoteError::Scale { scale });
    }
    Ok(BigUint::from(10u32).pow(scale as u32))
}

fn narrow(value: &BigUint, stage: &'static str) -> Result<RawAmount, QuoteError> {
    match value.to_u128() {
        Some(v) => Ok(RawAmount::new(v)),
        None => {
            tracing::error!(stage, bits = value.bits(), "quote result does not fit a raw amount");
            Err(QuoteError::Overflow { stage })
        }
    }
}
