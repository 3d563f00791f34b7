//! Shared fixtures for swap engine integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use swap_engine::{
    BalancePolicy, EngineSettings, SimulationError, SimulationRequest, SimulationResult,
    SimulationService, SwapEngine,
};
use swap_types::{Asset, AssetId, FixedPoint, MarketSnapshot, Pool, RawAmount, Tick};

/// sqrt(2) at scale 18; squares to exactly 2.0 after truncation
pub const SQRT_TWO_E18: u128 = 1_414_213_562_373_095_049;
pub const SQRT_FOUR_E18: u128 = 2_000_000_000_000_000_000;

pub const FEE_ZERO: FixedPoint = FixedPoint::new(0, 12);
pub const FEE_30_BPS: FixedPoint = FixedPoint::new(3_000_000_000, 12);

pub fn asset_a() -> AssetId {
    AssetId::from_bytes([1; 32])
}

pub fn asset_b() -> AssetId {
    AssetId::from_bytes([2; 32])
}

/// Nine-decimal asset with no pool against A
pub fn asset_c() -> AssetId {
    AssetId::from_bytes([3; 32])
}

pub fn snapshot(sqrt_price: u128, fee: FixedPoint, reserve: u128) -> MarketSnapshot {
    MarketSnapshot::new(
        vec![
            Asset::new(asset_a(), 6, "A").with_balance(RawAmount::new(1_000_000_000)),
            Asset::new(asset_b(), 6, "B").with_balance(RawAmount::new(50_000_000)),
            Asset::new(asset_c(), 9, "C"),
        ],
        vec![
            Pool {
                token_x: asset_a(),
                token_y: asset_b(),
                sqrt_price: FixedPoint::new(sqrt_price, 18),
                fee,
                tick_spacing: 10,
            },
            Pool {
                token_x: asset_b(),
                token_y: asset_c(),
                sqrt_price: FixedPoint::new(SQRT_TWO_E18, 18),
                fee,
                tick_spacing: 10,
            },
        ],
    )
    .with_ticks(
        0,
        vec![
            Tick {
                index: -10,
                reserve_x: RawAmount::new(reserve / 2),
                reserve_y: RawAmount::new(reserve / 2),
            },
            Tick {
                index: 10,
                reserve_x: RawAmount::new(reserve / 2),
                reserve_y: RawAmount::new(reserve / 2),
            },
        ],
    )
}

pub fn deep_snapshot(fee: FixedPoint) -> Arc<MarketSnapshot> {
    Arc::new(snapshot(SQRT_TWO_E18, fee, 1_000_000_000_000))
}

/// Connected engine trading A into B
pub fn engine_a_to_b(fee: FixedPoint) -> SwapEngine {
    engine_with(deep_snapshot(fee), EngineSettings::default())
}

pub fn engine_with(snapshot: Arc<MarketSnapshot>, settings: EngineSettings) -> SwapEngine {
    let mut engine = SwapEngine::new(snapshot, settings);
    engine.set_wallet_status(true);
    engine.select_from(asset_a()).unwrap();
    engine.select_to(asset_b()).unwrap();
    engine
}

pub fn native_a_settings() -> EngineSettings {
    EngineSettings {
        balances: BalancePolicy::new(Some(asset_a()), RawAmount::new(10_000_000)),
        ..EngineSettings::default()
    }
}

/// Simulator that replays queued responses and records what it was asked
#[derive(Default)]
pub struct ScriptedSimulator {
    responses: Mutex<VecDeque<Result<SimulationResult, SimulationError>>>,
    pub seen: Mutex<Vec<(u64, RawAmount, bool)>>,
}

impl ScriptedSimulator {
    pub fn new(responses: Vec<Result<SimulationResult, SimulationError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SimulationService for ScriptedSimulator {
    async fn simulate(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResult, SimulationError> {
        self.seen
            .lock()
            .unwrap()
            .push((request.sequence, request.amount, request.by_amount_in));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SimulationError::Transport("no scripted response".into())))
    }
}

pub fn ok_result(output: u128) -> SimulationResult {
    SimulationResult {
        output_amount: RawAmount::new(output),
        success: true,
        resolved_pool_index: Some(0),
    }
}
