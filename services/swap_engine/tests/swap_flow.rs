//! End-to-end swap flows through the engine
//!
//! Pool A/B trades at exactly 2 B per A; both assets carry six decimals.

mod common;

use common::*;
use std::sync::Arc;
use swap_engine::{
    Authority, DryRunSettlement, EngineError, EngineSettings, FieldOrigin, Rejection,
    ReferenceSimulator, SimulationError, SimulationResult, SimulationState, SubmitError,
    SwapEngine, SwapStatus,
};
use swap_types::{CodecError, FixedPoint, MarketSnapshot, RawAmount};

#[tokio::test]
async fn test_forward_quote_without_fee() {
    let mut engine = engine_a_to_b(FEE_ZERO);
    engine.edit_from("10").unwrap();

    assert_eq!(engine.intent().to.text, "20.000000");
    assert_eq!(engine.intent().to.origin, FieldOrigin::Derived);
    assert_eq!(engine.status(), SwapStatus::Simulating);

    let pending = engine.pending_simulation().unwrap();
    assert!(pending.by_amount_in);
    assert_eq!(pending.amount, RawAmount::new(10_000_000));

    assert!(engine.run_simulation(&ReferenceSimulator::new()).await);
    let view = engine.view();
    assert_eq!(view.status, SwapStatus::Ready);
    assert_eq!(view.message, "Swap");
    assert_eq!(view.to_amount, "20.000000");
    assert_eq!(view.unit_rate.as_deref(), Some("2.000000"));
    assert_eq!(view.fee.as_deref(), Some("0%"));
}

#[tokio::test]
async fn test_forward_quote_with_deducted_fee() {
    let mut engine = engine_a_to_b(FEE_30_BPS);
    engine.edit_from("10").unwrap();

    assert_eq!(engine.intent().to.text, "19.940000");
    assert_eq!(engine.view().fee.as_deref(), Some("0.3%"));

    engine.run_simulation(&ReferenceSimulator::new()).await;
    let request = engine.build_request().unwrap();
    assert_eq!(request.amount_in, RawAmount::new(10_000_000));
    assert_eq!(request.expected_output, RawAmount::new(19_940_000));
    assert_eq!(request.pool_index, 0);
    assert_eq!(request.reference_sqrt_price, FixedPoint::new(SQRT_TWO_E18, 18));
}

#[test]
fn test_reverse_carries_to_value_into_from() {
    let mut engine = engine_a_to_b(FEE_30_BPS);
    engine.edit_from("10").unwrap();
    engine.reverse();

    let intent = engine.intent();
    assert_eq!(intent.from_asset, Some(asset_b()));
    assert_eq!(intent.to_asset, Some(asset_a()));
    assert_eq!(intent.authority, Authority::EditingFrom);
    assert_eq!(intent.from.text, "19.940000");
    assert_eq!(intent.from.raw, RawAmount::new(19_940_000));
    // 9.970000 at the pool price, less 0.3%
    assert_eq!(intent.to.text, "9.940090");

    let pending = engine.pending_simulation().unwrap();
    assert_eq!(pending.asset_in, asset_b());
    assert_eq!(pending.amount, RawAmount::new(19_940_000));
}

#[test]
fn test_reverse_reparses_across_precisions() {
    let mut engine = engine_with(deep_snapshot(FEE_ZERO), EngineSettings::default());
    engine.select_from(asset_b()).unwrap();
    engine.select_to(asset_c()).unwrap();
    engine.edit_from("1").unwrap();
    assert_eq!(engine.intent().to.text, "2.000000000");

    engine.reverse();

    let intent = engine.intent();
    assert_eq!(intent.from_asset, Some(asset_c()));
    assert_eq!(intent.authority, Authority::EditingFrom);
    // Carried text is re-parsed at C's nine decimals, not reused as B's raw
    assert_eq!(intent.from.text, "2.000000000");
    assert_eq!(intent.from.raw, RawAmount::new(2_000_000_000));
    assert_eq!(intent.to.text, "1.000000");
    assert_eq!(intent.to.raw, RawAmount::new(1_000_000));
    assert_eq!(
        engine.pending_simulation().unwrap().amount,
        RawAmount::new(2_000_000_000)
    );
}

#[test]
fn test_simulation_on_unrouted_pool_is_failed() {
    let mut engine = engine_a_to_b(FEE_30_BPS);
    engine.edit_from("10").unwrap();
    let request = engine.take_pending_simulation().unwrap();

    let foreign = SimulationResult {
        output_amount: RawAmount::new(5),
        success: true,
        resolved_pool_index: Some(1),
    };
    assert!(engine.apply_simulation(request.sequence, foreign));

    // Local estimate stays, the foreign output never lands in the request
    assert_eq!(engine.intent().to.text, "19.940000");
    assert_eq!(engine.status(), SwapStatus::SimulationFailed);
    assert_eq!(engine.build_request(), Err(Rejection::SimulationFailed));
}

#[test]
fn test_resolved_pool_names_the_request() {
    let mut engine = engine_a_to_b(FEE_30_BPS);
    engine.edit_from("10").unwrap();
    let request = engine.take_pending_simulation().unwrap();

    assert!(engine.apply_simulation(request.sequence, ok_result(19_940_000)));
    let built = engine.build_request().unwrap();
    assert_eq!(built.pool_index, 0);
    assert_eq!(built.expected_output, RawAmount::new(19_940_000));
}

#[tokio::test]
async fn test_editing_to_uses_exact_out_simulation() {
    let mut engine = engine_a_to_b(FEE_30_BPS);
    engine.edit_to("20").unwrap();

    // Grossed-up linear estimate first
    assert_eq!(engine.intent().authority, Authority::EditingTo);
    assert_eq!(engine.intent().from.text, "10.030000");
    let pending = engine.pending_simulation().unwrap();
    assert!(!pending.by_amount_in);
    assert_eq!(pending.amount, RawAmount::new(20_000_000));

    // Then the exact required input replaces it
    assert!(engine.run_simulation(&ReferenceSimulator::new()).await);
    assert_eq!(engine.intent().from.text, "10.030090");
    assert_eq!(engine.intent().to.text, "20");
    assert_eq!(engine.intent().authority, Authority::EditingTo);

    let request = engine.build_request().unwrap();
    assert!(!request.by_amount_in);
    assert_eq!(request.amount_in, RawAmount::new(10_030_090));
    assert_eq!(request.expected_output, RawAmount::new(20_000_000));
    assert_eq!(request.amount_limit, RawAmount::new(10_130_390));
}

#[test]
fn test_no_route_forces_zero_derived_field() {
    let mut engine = engine_a_to_b(FEE_ZERO);
    engine.edit_from("10").unwrap();
    assert_eq!(engine.intent().to.text, "20.000000");

    engine.select_to(asset_c()).unwrap();

    // Zero rendered at the source asset's precision, never the stale quote
    assert_eq!(engine.intent().to.text, "0.000000");
    assert_eq!(engine.intent().to.raw, RawAmount::ZERO);
    assert_eq!(engine.status(), SwapStatus::NoRoute);
    assert_eq!(engine.view().message, "No route found");
    assert!(engine.pending_simulation().is_none());
    assert!(matches!(
        engine.build_request(),
        Err(Rejection::NoRoute(_))
    ));
}

#[test]
fn test_unset_to_token_still_accepts_input() {
    let mut engine = SwapEngine::new(deep_snapshot(FEE_ZERO), EngineSettings::default());
    engine.set_wallet_status(true);
    engine.select_from(asset_a()).unwrap();
    engine.edit_from("5").unwrap();

    assert_eq!(engine.intent().from.raw, RawAmount::new(5_000_000));
    assert!(engine.intent().to.text.is_empty());
    assert!(engine.pending_simulation().is_none());
    assert_eq!(engine.view().message, "Swap tokens");

    let candidates: Vec<&str> = engine
        .to_candidates()
        .into_iter()
        .map(|asset| asset.symbol.as_str())
        .collect();
    assert_eq!(candidates, vec!["B"]);
}

#[test]
fn test_malformed_input_leaves_state_untouched() {
    let mut engine = engine_a_to_b(FEE_ZERO);
    engine.edit_from("10").unwrap();
    let before = engine.intent().clone();

    for bad in ["1.2.3", "-1", "1e3", "abc"] {
        assert!(matches!(
            engine.edit_from(bad),
            Err(EngineError::InvalidAmount(CodecError::InvalidFormat { .. }))
        ));
    }
    assert_eq!(engine.intent(), &before);
}

#[test]
fn test_digitless_input_is_zero_volume() {
    let mut engine = engine_a_to_b(FEE_ZERO);
    engine.edit_from("10").unwrap();
    engine.edit_from(".").unwrap();

    assert_eq!(engine.intent().from.text, ".");
    assert_eq!(engine.intent().from.raw, RawAmount::ZERO);
    assert_eq!(engine.intent().to.text, "0.000000");
    assert_eq!(engine.status(), SwapStatus::InsufficientVolume);
    assert_eq!(engine.view().message, "Insufficient trade volume");
    assert_eq!(engine.simulation(), &SimulationState::Idle);
}

#[test]
fn test_stale_simulation_is_discarded() {
    let mut engine = engine_a_to_b(FEE_ZERO);
    engine.edit_from("10").unwrap();
    let first = engine.take_pending_simulation().unwrap();
    engine.edit_from("11").unwrap();
    let second = engine.take_pending_simulation().unwrap();
    assert!(second.sequence > first.sequence);

    // The older result arrives first and is dropped
    assert!(!engine.apply_simulation(first.sequence, ok_result(20_000_000)));
    assert_eq!(engine.status(), SwapStatus::Simulating);
    assert_eq!(engine.intent().to.text, "22.000000");

    assert!(engine.apply_simulation(second.sequence, ok_result(21_500_000)));
    assert_eq!(engine.intent().to.text, "21.500000");
    assert_eq!(engine.status(), SwapStatus::Ready);

    // Late duplicates change nothing
    assert!(!engine.apply_simulation(first.sequence, ok_result(1)));
    assert!(!engine.apply_simulation(second.sequence, ok_result(1)));
    assert_eq!(engine.intent().to.text, "21.500000");
}

#[test]
fn test_snapshot_refresh_requotes_and_supersedes() {
    let mut engine = engine_a_to_b(FEE_ZERO);
    engine.edit_from("10").unwrap();
    let before_refresh = engine.take_pending_simulation().unwrap();

    engine.update_snapshot(Arc::new(snapshot(SQRT_FOUR_E18, FEE_ZERO, 1_000_000_000_000)));

    assert_eq!(engine.intent().from.text, "10");
    assert_eq!(engine.intent().to.text, "40.000000");
    let after_refresh = engine.pending_simulation().unwrap().sequence;
    assert!(after_refresh > before_refresh.sequence);
    assert!(!engine.apply_simulation(before_refresh.sequence, ok_result(20_000_000)));
    assert_eq!(engine.intent().to.text, "40.000000");
}

#[test]
fn test_token_change_supersedes_pending() {
    let mut engine = engine_a_to_b(FEE_ZERO);
    engine.edit_from("10").unwrap();
    let pending = engine.take_pending_simulation().unwrap();

    engine.select_to(asset_c()).unwrap();
    assert_eq!(engine.simulation(), &SimulationState::Idle);
    assert!(!engine.apply_simulation(pending.sequence, ok_result(20_000_000)));
    assert_eq!(engine.status(), SwapStatus::NoRoute);
}

#[tokio::test]
async fn test_failed_simulation_blocks_submit() {
    // 10 A would take 20 B out of a pool holding 15 B
    let shallow = Arc::new(snapshot(SQRT_TWO_E18, FEE_ZERO, 15_000_000));
    let mut engine = engine_with(shallow, EngineSettings::default());
    engine.edit_from("10").unwrap();

    assert!(engine.run_simulation(&ReferenceSimulator::new()).await);
    assert_eq!(engine.status(), SwapStatus::SimulationFailed);
    assert_eq!(engine.view().message, "Too many tokens to exchange");
    // The linear estimate stays visible but cannot be submitted
    assert_eq!(engine.intent().to.text, "20.000000");
    assert_eq!(engine.build_request(), Err(Rejection::SimulationFailed));
}

#[tokio::test]
async fn test_transport_error_counts_as_failed_simulation() {
    let mut engine = engine_a_to_b(FEE_ZERO);
    engine.edit_from("10").unwrap();

    let simulator =
        ScriptedSimulator::new(vec![Err(SimulationError::Transport("timeout".into()))]);
    assert!(engine.run_simulation(&simulator).await);
    assert_eq!(engine.status(), SwapStatus::SimulationFailed);
    assert_eq!(simulator.seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_scripted_results_replace_estimate() {
    let mut engine = engine_a_to_b(FEE_ZERO);
    engine.edit_from("10").unwrap();

    let simulator = ScriptedSimulator::new(vec![Ok(SimulationResult {
        output_amount: RawAmount::new(19_000_000),
        success: true,
        resolved_pool_index: Some(0),
    })]);
    engine.run_simulation(&simulator).await;

    assert_eq!(engine.intent().to.text, "19.000000");
    assert_eq!(
        engine.build_request().unwrap().expected_output,
        RawAmount::new(19_000_000)
    );
    // Nothing left to run
    assert!(!engine.run_simulation(&simulator).await);
}

#[tokio::test]
async fn test_insufficient_balance_after_simulation() {
    let mut engine = engine_a_to_b(FEE_ZERO);
    engine.edit_from("2000").unwrap();
    engine.run_simulation(&ReferenceSimulator::new()).await;

    assert_eq!(engine.view().message, "Insufficient balance");
    assert_eq!(
        engine.build_request(),
        Err(Rejection::InsufficientBalance {
            required: RawAmount::new(2_000_000_000),
            available: RawAmount::new(1_000_000_000),
        })
    );
}

#[tokio::test]
async fn test_wallet_message_takes_priority() {
    let mut engine = engine_a_to_b(FEE_ZERO);
    engine.edit_from("10").unwrap();
    engine.run_simulation(&ReferenceSimulator::new()).await;
    assert_eq!(engine.status(), SwapStatus::Ready);

    engine.set_wallet_status(false);
    assert_eq!(engine.view().message, "Please connect wallet");
    assert_eq!(engine.build_request(), Err(Rejection::WalletNotConnected));
}

#[tokio::test]
async fn test_max_keeps_native_min_deposit() {
    let mut engine = engine_with(deep_snapshot(FEE_ZERO), native_a_settings());
    engine.set_max_from().unwrap();

    assert_eq!(engine.intent().from.text, "990.000000");
    assert_eq!(engine.intent().to.text, "1980.000000");
    assert_eq!(engine.usable_balance(&asset_a()), Some(RawAmount::new(990_000_000)));

    engine.run_simulation(&ReferenceSimulator::new()).await;
    assert_eq!(engine.status(), SwapStatus::Ready);
}

#[test]
fn test_max_requires_source_asset() {
    let mut engine = SwapEngine::new(deep_snapshot(FEE_ZERO), EngineSettings::default());
    assert_eq!(engine.set_max_from(), Err(EngineError::NoSourceAsset));
}

#[tokio::test]
async fn test_slippage_change_moves_limit() {
    let mut engine = engine_a_to_b(FEE_ZERO);
    engine.edit_from("10").unwrap();
    engine.run_simulation(&ReferenceSimulator::new()).await;
    // Default 1%
    assert_eq!(
        engine.build_request().unwrap().amount_limit,
        RawAmount::new(19_800_000)
    );

    engine.set_slippage(FixedPoint::new(5_000_000_000, 12));
    assert_eq!(engine.status(), SwapStatus::Simulating);
    engine.run_simulation(&ReferenceSimulator::new()).await;
    assert_eq!(
        engine.build_request().unwrap().amount_limit,
        RawAmount::new(19_900_000)
    );
}

#[tokio::test]
async fn test_submit_through_dry_run_backend() {
    let mut engine = engine_a_to_b(FEE_30_BPS);
    engine.edit_from("10").unwrap();
    let backend = DryRunSettlement::new();

    let refused = engine.submit(&backend).await;
    assert!(matches!(
        refused,
        Err(SubmitError::Rejected(Rejection::SimulationPending))
    ));

    engine.run_simulation(&ReferenceSimulator::new()).await;
    let receipt = engine.submit(&backend).await.unwrap();
    assert_eq!(receipt.id, "dry-run-1");
    assert_eq!(receipt.request.expected_output, RawAmount::new(19_940_000));
    assert_eq!(backend.submitted(), 1);
}

#[test]
fn test_unknown_asset_selection_rejected() {
    let mut engine = SwapEngine::new(Arc::new(MarketSnapshot::default()), EngineSettings::default());
    assert_eq!(
        engine.select_from(asset_a()),
        Err(EngineError::UnknownAsset { asset: asset_a() })
    );
}

#[test]
fn test_snapshot_fixture_parses() {
    let text = include_str!("fixtures/two_asset_snapshot.json");
    let snapshot: MarketSnapshot = serde_json::from_str(text).unwrap();
    assert_eq!(snapshot.assets.len(), 2);
    assert_eq!(snapshot.pools[0].sqrt_price, FixedPoint::new(SQRT_TWO_E18, 18));

    let mut engine = SwapEngine::new(Arc::new(snapshot), EngineSettings::default());
    let usdc = engine.snapshot().asset_by_symbol("USDC").unwrap().id;
    let usdt = engine.snapshot().asset_by_symbol("USDT").unwrap().id;
    engine.select_from(usdc).unwrap();
    engine.select_to(usdt).unwrap();
    engine.edit_from("1").unwrap();
    assert_eq!(engine.intent().to.text, "1.994000");
}
