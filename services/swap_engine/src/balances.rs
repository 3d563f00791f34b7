//! Swap-usable balances
//!
//! The wrapped native asset must keep a minimum deposit in the account, so
//! only `balance - min_deposit` of it can be sold. Every other asset is fully
//! usable.

use swap_config::SwapConfig;
use swap_types::{Asset, AssetId, RawAmount};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalancePolicy {
    pub native_wrapped: Option<AssetId>,
    pub min_deposit: RawAmount,
}

impl BalancePolicy {
    pub fn new(native_wrapped: Option<AssetId>, min_deposit: RawAmount) -> Self {
        Self {
            native_wrapped,
            min_deposit,
        }
    }

    pub fn from_config(config: &SwapConfig) -> Self {
        Self::new(
            config.native_wrapped_asset,
            RawAmount::from(config.native_min_deposit),
        )
    }

    /// Amount of `asset` a swap may spend, floored at zero
    pub fn usable(&self, asset: &Asset) -> RawAmount {
        if self.native_wrapped == Some(asset.id) {
            asset.balance.saturating_sub(self.min_deposit)
        } else {
            asset.balance
        }
    }
}
