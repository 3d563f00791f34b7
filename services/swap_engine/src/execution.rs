//! Execution request assembly
//!
//! [`build`] checks the submit preconditions in a fixed order and stops at the
//! first failure; the same order drives the status message shown for the
//! trade, so the message always names the first thing blocking submission.
//!
//! 1. wallet connected
//! 2. both tokens selected
//! 3. a pool serves the pair
//! 4. authoritative amount is nonzero
//! 5. latest simulation finished and succeeded
//! 6. source amount within the swap-usable balance

use crate::balances::BalancePolicy;
use crate::input_sync::{Authority, TradeIntent};
use crate::pair_resolver::{Route, RouteError};
use crate::simulation::SimulationState;
use serde::{Deserialize, Serialize};
use swap_amm::quote_math::fraction_of;
use swap_types::{AssetId, FixedPoint, MarketSnapshot, RawAmount};
use thiserror::Error;

/// Slippage-bounded request handed to the settlement backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub pool_index: usize,
    pub asset_in: AssetId,
    pub asset_out: AssetId,
    /// Raw source amount
    pub amount_in: RawAmount,
    /// Simulated output (exact-in) or the requested output (exact-out)
    pub expected_output: RawAmount,
    pub by_amount_in: bool,
    pub slippage: FixedPoint,
    /// Minimum output for exact-in, maximum input for exact-out
    pub amount_limit: RawAmount,
    /// Pool sqrt price the quote was made against
    pub reference_sqrt_price: FixedPoint,
    pub simulation_success: bool,
}

/// User-facing trade status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapStatus {
    WalletNotConnected,
    TokensNotSelected,
    NoRoute,
    InsufficientVolume,
    Simulating,
    SimulationFailed,
    InsufficientBalance,
    Ready,
}

impl SwapStatus {
    pub fn message(&self) -> &'static str {
        match self {
            SwapStatus::WalletNotConnected => "Please connect wallet",
            SwapStatus::TokensNotSelected => "Swap tokens",
            SwapStatus::NoRoute => "No route found",
            SwapStatus::InsufficientVolume => "Insufficient trade volume",
            SwapStatus::Simulating => "Simulating swap",
            SwapStatus::SimulationFailed => "Too many tokens to exchange",
            SwapStatus::InsufficientBalance => "Insufficient balance",
            SwapStatus::Ready => "Swap",
        }
    }
}

/// Why a submit was refused
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Both tokens must be selected")]
    TokensNotSelected,

    #[error("No route: {0}")]
    NoRoute(RouteError),

    #[error("Trade amount is zero")]
    InsufficientVolume,

    #[error("Simulation still in flight")]
    SimulationPending,

    #[error("Simulation failed: not enough liquidity for this amount")]
    SimulationFailed,

    #[error("Insufficient balance: need {required}, have {available}")]
    InsufficientBalance {
        required: RawAmount,
        available: RawAmount,
    },

    #[error("Slippage bound does not fit a raw amount")]
    LimitOverflow,
}

impl Rejection {
    pub fn status(&self) -> SwapStatus {
        match self {
            Rejection::WalletNotConnected => SwapStatus::WalletNotConnected,
            Rejection::TokensNotSelected => SwapStatus::TokensNotSelected,
            Rejection::NoRoute(_) => SwapStatus::NoRoute,
            Rejection::InsufficientVolume => SwapStatus::InsufficientVolume,
            Rejection::SimulationPending => SwapStatus::Simulating,
            Rejection::SimulationFailed | Rejection::LimitOverflow => SwapStatus::SimulationFailed,
            Rejection::InsufficientBalance { .. } => SwapStatus::InsufficientBalance,
        }
    }
}

/// Borrowed view of everything `build` checks
pub struct TradeContext<'a> {
    pub wallet_connected: bool,
    pub intent: &'a TradeIntent,
    pub snapshot: &'a MarketSnapshot,
    /// `None` until both tokens are selected
    pub route: Option<&'a Result<Route, RouteError>>,
    pub simulation: &'a SimulationState,
    pub balances: &'a BalancePolicy,
}

pub fn build(ctx: &TradeContext<'_>) -> Result<ExecutionRequest, Rejection> {
    if !ctx.wallet_connected {
        return Err(Rejection::WalletNotConnected);
    }

    let (from, to) = match (ctx.intent.from_asset, ctx.intent.to_asset) {
        (Some(from), Some(to)) => (from, to),
        _ => return Err(Rejection::TokensNotSelected),
    };
    let from_asset = ctx
        .snapshot
        .asset(&from)
        .ok_or(Rejection::TokensNotSelected)?;

    let route = match ctx.route {
        Some(Ok(route)) => *route,
        Some(Err(e)) => return Err(Rejection::NoRoute(e.clone())),
        None => return Err(Rejection::NoRoute(RouteError::NotFound { from, to })),
    };
    let pool = ctx
        .snapshot
        .pool(route.pool_index)
        .ok_or(Rejection::NoRoute(RouteError::NotFound { from, to }))?;

    if ctx.intent.authoritative().raw.is_zero() {
        return Err(Rejection::InsufficientVolume);
    }

    let simulated = match ctx.simulation {
        SimulationState::Idle | SimulationState::Pending { .. } => {
            return Err(Rejection::SimulationPending)
        }
        SimulationState::Completed { result, .. } if !result.success => {
            return Err(Rejection::SimulationFailed)
        }
        SimulationState::Completed { result, .. } => result,
    };

    // The simulated output is only meaningful for the pool it ran against
    let pool_index = match simulated.resolved_pool_index {
        Some(resolved) if resolved != route.pool_index => {
            return Err(Rejection::SimulationFailed)
        }
        Some(resolved) => resolved,
        None => route.pool_index,
    };

    let by_amount_in = ctx.intent.authority == Authority::EditingFrom;
    let (amount_in, expected_output) = if by_amount_in {
        (ctx.intent.from.raw, simulated.output_amount)
    } else {
        (simulated.output_amount, ctx.intent.to.raw)
    };

    let available = ctx.balances.usable(from_asset);
    if amount_in > available {
        return Err(Rejection::InsufficientBalance {
            required: amount_in,
            available,
        });
    }

    let slippage = ctx.intent.slippage;
    let amount_limit = if by_amount_in {
        let margin = fraction_of(expected_output, slippage).map_err(|_| Rejection::LimitOverflow)?;
        expected_output.saturating_sub(margin)
    } else {
        let margin = fraction_of(amount_in, slippage).map_err(|_| Rejection::LimitOverflow)?;
        amount_in.checked_add(margin).ok_or(Rejection::LimitOverflow)?
    };

    Ok(ExecutionRequest {
        pool_index,
        asset_in: from,
        asset_out: to,
        amount_in,
        expected_output,
        by_amount_in,
        slippage,
        amount_limit,
        reference_sqrt_price: pool.sqrt_price,
        simulation_success: simulated.success,
    })
}
