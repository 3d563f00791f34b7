//! # Simulation Gateway - Authoritative Liquidity Checks
//!
//! ## Purpose
//!
//! The local quote is linear and knows nothing about liquidity. Before a trade
//! can be submitted, an external tick-walking simulator must confirm it: given
//! the pool snapshot, the pair, an amount and a slippage tolerance, it returns
//! the achievable output and whether the pool can fill it at all.
//!
//! ## Sequencing
//!
//! Simulations are the engine's only suspension point. Every request carries a
//! monotonically increasing sequence number from [`SimulationSequencer`], and a
//! result is applied only if its sequence is still the latest one issued.
//! Anything older was superseded by a later edit, token change or snapshot and
//! is dropped.
//!
//! ## Failure Semantics
//!
//! - `success = false` blocks submission; the linear estimate is never used instead
//! - A transport error from the service is recorded as a failed simulation
//! - Exact-out requests (`by_amount_in = false`) return the required input amount

use crate::log_simulation;
use crate::pair_resolver::{self, RouteError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use swap_amm::{Direction, FeeMode, QuoteError, QuoteMath, SwapLeg};
use swap_types::{AssetId, FixedPoint, MarketSnapshot, Pool, RawAmount, Tick};
use thiserror::Error;
use tracing::warn;

/// One call to the simulation service
#[derive(Debug, Clone)]
pub struct SimulationRequest {
    pub sequence: u64,
    pub pool_index: usize,
    pub asset_in: AssetId,
    pub asset_out: AssetId,
    /// Input amount when `by_amount_in`, desired output otherwise
    pub amount: RawAmount,
    pub by_amount_in: bool,
    pub slippage: FixedPoint,
    /// Pools and tick sets the simulation walks
    pub snapshot: Arc<MarketSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Output for exact-in requests, required input for exact-out requests
    pub output_amount: RawAmount,
    pub success: bool,
    pub resolved_pool_index: Option<usize>,
}

impl SimulationResult {
    pub fn failed(resolved_pool_index: Option<usize>) -> Self {
        Self {
            output_amount: RawAmount::ZERO,
            success: false,
            resolved_pool_index,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Simulation service unavailable: {0}")]
    Transport(String),

    #[error("Pool {pool_index} is not in the snapshot")]
    UnknownPool { pool_index: usize },

    #[error("Asset {asset} is not in the snapshot")]
    UnknownAsset { asset: AssetId },

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error("Stale simulation result: expected sequence {expected}, got {actual}")]
    Stale { expected: u64, actual: u64 },
}

/// External, liquidity-aware swap simulator
#[async_trait]
pub trait SimulationService: Send + Sync {
    async fn simulate(&self, request: &SimulationRequest)
        -> Result<SimulationResult, SimulationError>;
}

/// Issues simulation sequence numbers and rejects out-of-date results
#[derive(Debug, Default)]
pub struct SimulationSequencer {
    latest_issued: u64,
    last_applied: u64,
}

impl SimulationSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next sequence number; supersedes every earlier one
    pub fn issue(&mut self) -> u64 {
        self.latest_issued += 1;
        self.latest_issued
    }

    pub fn latest_issued(&self) -> u64 {
        self.latest_issued
    }

    pub fn last_applied(&self) -> u64 {
        self.last_applied
    }

    pub fn is_latest(&self, sequence: u64) -> bool {
        sequence == self.latest_issued
    }

    /// Accept a result for `sequence` only if nothing newer was issued
    pub fn accept(&mut self, sequence: u64) -> Result<(), SimulationError> {
        if self.is_latest(sequence) && sequence > self.last_applied {
            self.last_applied = sequence;
            Ok(())
        } else {
            Err(SimulationError::Stale {
                expected: self.latest_issued,
                actual: sequence,
            })
        }
    }
}

/// Where the current trade stands with respect to simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SimulationState {
    /// Nothing to simulate (no route, zero amount or unselected token)
    Idle,
    Pending { sequence: u64 },
    Completed { sequence: u64, result: SimulationResult },
}

impl SimulationState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SimulationState::Pending { .. })
    }
}

/// Run one request, folding service errors into a failed result
pub async fn simulate(service: &dyn SimulationService, request: &SimulationRequest) -> SimulationResult {
    match service.simulate(request).await {
        Ok(result) => {
            log_simulation!(
                "simulation #{} → {} (success: {})",
                request.sequence,
                result.output_amount,
                result.success
            );
            result
        }
        Err(e) => {
            warn!(sequence = request.sequence, "simulation failed: {}", e);
            SimulationResult::failed(Some(request.pool_index))
        }
    }
}

/// In-process simulator: sqrt-price quote bounded by tick-set reserves
///
/// Not tick-accurate. Output is the fee-deducted linear quote; a trade fails
/// when its output exceeds the reserves recorded across the pool's ticks, or
/// when the output truncates to zero. A pool without a tick set has no known
/// liquidity and fails every trade.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceSimulator;

impl ReferenceSimulator {
    pub fn new() -> Self {
        Self
    }

    fn available_output(ticks: &[Tick], direction: Direction) -> RawAmount {
        ticks.iter().fold(RawAmount::ZERO, |total, tick| {
            let reserve = match direction {
                Direction::XtoY => tick.reserve_y,
                Direction::YtoX => tick.reserve_x,
            };
            total.checked_add(reserve).unwrap_or(RawAmount::new(u128::MAX))
        })
    }

    /// Smallest input whose fee-deducted output reaches `desired`
    fn required_input(pool: &Pool, leg: &SwapLeg, desired: RawAmount) -> Option<RawAmount> {
        if desired.is_zero() {
            return Some(RawAmount::ZERO);
        }
        let reaches = |input: u128| -> Option<bool> {
            QuoteMath::amount_out(pool, leg, RawAmount::new(input), FeeMode::Deducted)
                .ok()
                .map(|out| out >= desired)
        };

        // Start from the grossed-up estimate and widen until it is enough
        let estimate = QuoteMath::amount_out(pool, &leg.reversed(), desired, FeeMode::AddedBack)
            .ok()?
            .get()
            .max(1);
        let mut high = estimate;
        while !reaches(high)? {
            high = high.checked_mul(2)?;
        }

        let mut low = 0u128;
        while high - low > 1 {
            let mid = low + (high - low) / 2;
            if reaches(mid)? {
                high = mid;
            } else {
                low = mid;
            }
        }
        Some(RawAmount::new(high))
    }
}

#[async_trait]
impl SimulationService for ReferenceSimulator {
    async fn simulate(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResult, SimulationError> {
        let snapshot = &request.snapshot;
        let pool = snapshot
            .pool(request.pool_index)
            .ok_or(SimulationError::UnknownPool {
                pool_index: request.pool_index,
            })?;
        let asset_in = snapshot
            .asset(&request.asset_in)
            .ok_or(SimulationError::UnknownAsset {
                asset: request.asset_in,
            })?;
        let asset_out = snapshot
            .asset(&request.asset_out)
            .ok_or(SimulationError::UnknownAsset {
                asset: request.asset_out,
            })?;

        let direction = pair_resolver::direction(pool, request.pool_index, &asset_in.id)?;
        let leg = SwapLeg {
            direction,
            asset_in: asset_in.id,
            asset_out: asset_out.id,
            precision_in: asset_in.decimals,
            precision_out: asset_out.decimals,
        };
        let available = Self::available_output(snapshot.ticks_for(request.pool_index), direction);
        let resolved = Some(request.pool_index);

        if request.by_amount_in {
            let out = QuoteMath::amount_out(pool, &leg, request.amount, FeeMode::Deducted)?;
            if out.is_zero() || out > available {
                return Ok(SimulationResult::failed(resolved));
            }
            Ok(SimulationResult {
                output_amount: out,
                success: true,
                resolved_pool_index: resolved,
            })
        } else {
            if request.amount > available {
                return Ok(SimulationResult::failed(resolved));
            }
            match Self::required_input(pool, &leg, request.amount) {
                Some(input) => Ok(SimulationResult {
                    output_amount: input,
                    success: true,
                    resolved_pool_index: resolved,
                }),
                None => Ok(SimulationResult::failed(resolved)),
            }
        }
    }
}
