//! Pair resolution: which pool serves two assets, and which way to cross it
//!
//! Pools are undirected for lookup (either token order matches) but
//! asymmetric for quoting, so every successful lookup also yields a
//! [`Direction`] relative to the input asset.

use crate::log_route;
use serde::{Deserialize, Serialize};
use swap_amm::{Direction, SwapLeg};
use swap_types::{Asset, AssetId, Pool};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("No pool trades {from} against {to}")]
    NotFound { from: AssetId, to: AssetId },

    #[error("Asset {asset} is not in pool {pool_index}")]
    AssetNotInPool { asset: AssetId, pool_index: usize },
}

/// Resolved pool plus trade direction for a from/to pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub pool_index: usize,
    pub direction: Direction,
}

impl Route {
    /// Quote leg from `from` into `to` across this route
    pub fn leg(&self, from: &Asset, to: &Asset) -> SwapLeg {
        SwapLeg {
            direction: self.direction,
            asset_in: from.id,
            asset_out: to.id,
            precision_in: from.decimals,
            precision_out: to.decimals,
        }
    }
}

/// Index of the first pool trading `a` against `b`, in either order
pub fn find_pool(a: &AssetId, b: &AssetId, pools: &[Pool]) -> Result<usize, RouteError> {
    let mut matches = pools
        .iter()
        .enumerate()
        .filter(|(_, pool)| pool.matches_pair(a, b))
        .map(|(index, _)| index);

    let first = matches.next().ok_or(RouteError::NotFound { from: *a, to: *b })?;
    let duplicates: Vec<usize> = matches.collect();
    if !duplicates.is_empty() {
        warn!(
            pool_index = first,
            ?duplicates,
            "multiple pools for {} / {}; using the first",
            a.short(),
            b.short()
        );
    }
    Ok(first)
}

/// Trade direction when `input_asset` is sold into `pool`
pub fn direction(
    pool: &Pool,
    pool_index: usize,
    input_asset: &AssetId,
) -> Result<Direction, RouteError> {
    if pool.token_x == *input_asset {
        Ok(Direction::XtoY)
    } else if pool.token_y == *input_asset {
        Ok(Direction::YtoX)
    } else {
        Err(RouteError::AssetNotInPool {
            asset: *input_asset,
            pool_index,
        })
    }
}

/// Assets sharing at least one pool with `anchor`, in snapshot order
pub fn counterparty_assets<'a>(
    anchor: &AssetId,
    assets: &'a [Asset],
    pools: &[Pool],
) -> Vec<&'a Asset> {
    assets
        .iter()
        .filter(|asset| asset.id != *anchor)
        .filter(|asset| pools.iter().any(|pool| pool.matches_pair(anchor, &asset.id)))
        .collect()
}

/// Pool and direction for selling `from` into `to`
pub fn resolve_route(from: &AssetId, to: &AssetId, pools: &[Pool]) -> Result<Route, RouteError> {
    let pool_index = find_pool(from, to, pools)?;
    let pool = pools
        .get(pool_index)
        .ok_or(RouteError::NotFound { from: *from, to: *to })?;
    let direction = direction(pool, pool_index, from)?;
    log_route!(
        "route {} -> {} via pool {} ({:?})",
        from.short(),
        to.short(),
        pool_index,
        direction
    );
    Ok(Route {
        pool_index,
        direction,
    })
}
