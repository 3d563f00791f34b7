//! Market snapshot types: assets, pools and their tick sets
//!
//! Snapshots are produced outside the engine (balance provider, pool/tick
//! provider) and handed in whole. Nothing in the engine mutates them; a price
//! move or balance change arrives as a fresh [`MarketSnapshot`].

use crate::common::errors::CodecError;
use crate::common::fixed_point::FixedPoint;
use crate::common::identifiers::AssetId;
use crate::precision::{to_decimal_string, to_raw, RawAmount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tradeable asset with the caller's current balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    /// Decimal precision of raw amounts
    pub decimals: u8,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    /// Wallet balance in raw units
    #[serde(default)]
    pub balance: RawAmount,
}

impl Asset {
    pub fn new(id: AssetId, decimals: u8, symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self {
            id,
            decimals,
            name: symbol.clone(),
            symbol,
            balance: RawAmount::ZERO,
        }
    }

    pub fn with_balance(mut self, balance: RawAmount) -> Self {
        self.balance = balance;
        self
    }

    /// Render a raw amount of this asset
    pub fn format(&self, amount: RawAmount) -> String {
        to_decimal_string(amount, self.decimals)
    }

    /// Parse a decimal string into a raw amount of this asset
    pub fn parse(&self, input: &str) -> Result<RawAmount, CodecError> {
        to_raw(input, self.decimals)
    }
}

/// Concentrated-liquidity pool price state
///
/// `token_x`/`token_y` order is fixed at pool creation and the price is
/// quoted as Y per X: `(sqrt_price)^2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub token_x: AssetId,
    pub token_y: AssetId,
    pub sqrt_price: FixedPoint,
    /// Trading fee as a fraction
    pub fee: FixedPoint,
    pub tick_spacing: u16,
}

impl Pool {
    /// Unordered pair match
    pub fn matches_pair(&self, a: &AssetId, b: &AssetId) -> bool {
        (self.token_x == *a && self.token_y == *b) || (self.token_x == *b && self.token_y == *a)
    }

    /// The other side of the pool, if `asset` is one of its tokens
    pub fn counterparty(&self, asset: &AssetId) -> Option<AssetId> {
        if self.token_x == *asset {
            Some(self.token_y)
        } else if self.token_y == *asset {
            Some(self.token_x)
        } else {
            None
        }
    }
}

/// Initialized tick with the token reserves available inside its range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub index: i32,
    #[serde(default)]
    pub reserve_x: RawAmount,
    #[serde(default)]
    pub reserve_y: RawAmount,
}

/// Point-in-time view of everything the engine quotes against
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub assets: Vec<Asset>,
    pub pools: Vec<Pool>,
    /// Tick sets keyed by pool index
    #[serde(default)]
    pub ticks: BTreeMap<usize, Vec<Tick>>,
}

impl MarketSnapshot {
    pub fn new(assets: Vec<Asset>, pools: Vec<Pool>) -> Self {
        Self {
            assets,
            pools,
            ticks: BTreeMap::new(),
        }
    }

    pub fn with_ticks(mut self, pool_index: usize, ticks: Vec<Tick>) -> Self {
        self.ticks.insert(pool_index, ticks);
        self
    }

    pub fn asset(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.id == *id)
    }

    pub fn asset_by_symbol(&self, symbol: &str) -> Option<&Asset> {
        self.assets
            .iter()
            .find(|asset| asset.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn pool(&self, index: usize) -> Option<&Pool> {
        self.pools.get(index)
    }

    /// Tick set for a pool; empty when the provider sent none
    pub fn ticks_for(&self, pool_index: usize) -> &[Tick] {
        self.ticks
            .get(&pool_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
