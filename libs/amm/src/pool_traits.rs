//! Pool trait definitions for a unified quoting interface

use swap_types::{AssetId, FixedPoint, Pool};

/// Minimal price state the quote calculator needs from a pool
pub trait SqrtPricePool {
    fn token_x(&self) -> AssetId;

    fn token_y(&self) -> AssetId;

    /// Square root of the Y-per-X price
    fn sqrt_price(&self) -> FixedPoint;

    /// Trading fee as a fraction
    fn fee(&self) -> FixedPoint;
}

impl SqrtPricePool for Pool {
    fn token_x(&self) -> AssetId {
        self.token_x
    }

    fn token_y(&self) -> AssetId {
        self.token_y
    }

    fn sqrt_price(&self) -> FixedPoint {
        self.sqrt_price
    }

    fn fee(&self) -> FixedPoint {
        self.fee
    }
}
