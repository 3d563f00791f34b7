//! # Swap Engine - Bidirectional Input Synchronization
//!
//! ## Purpose
//!
//! Owns one [`TradeIntent`] and keeps its two amount fields consistent while
//! the user edits either side, changes tokens, reverses direction or the
//! market snapshot refreshes. Every mutation is a named [`Transition`] that
//! ends in the same recompute step:
//!
//! ```text
//! transition → re-parse authoritative text → resolve route → local quote
//!            → write derived field → issue simulation (or supersede)
//! ```
//!
//! ## Concurrency Model
//!
//! Single-threaded and cooperative: all mutation is `&mut self`. The only
//! suspension point is the simulation call, which runs outside the engine on
//! a request taken from [`SwapEngine::take_pending_simulation`]. Results come
//! back through [`SwapEngine::apply_simulation`] and are applied only if no
//! newer request was issued in the meantime (last-issued-wins).
//!
//! ## Quote Direction
//!
//! Editing "from" quotes forward with the fee deducted. Editing "to" quotes
//! the pool the other way with the fee added back, an approximation of the
//! required input that the exact-out simulation replaces before any
//! execution request can be built.

use crate::balances::BalancePolicy;
use crate::execution::{self, ExecutionRequest, Rejection, SwapStatus, TradeContext};
use crate::input_sync::{Authority, Transition, TradeIntent};
use crate::pair_resolver::{self, Route, RouteError};
use crate::settlement::{SettlementBackend, SettlementError, SubmissionReceipt};
use crate::simulation::{
    self, SimulationRequest, SimulationResult, SimulationSequencer, SimulationService,
    SimulationState,
};
use crate::{
    log_execution, log_pool, log_quote, log_rejected, log_reverse, log_route, log_simulation,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use swap_amm::{FeeMode, Quote, QuoteMath};
use swap_config::SwapConfig;
use swap_types::precision::{has_digits, is_decimal_input, zero_string};
use swap_types::{Asset, AssetId, CodecError, FixedPoint, MarketSnapshot, RawAmount};
use thiserror::Error;
use tracing::{debug, warn};

/// Engine settings derived from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub slippage: FixedPoint,
    pub balances: BalancePolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let config = SwapConfig::default();
        Self {
            slippage: config
                .slippage_fraction()
                .unwrap_or(FixedPoint::zero(config.fraction_scale)),
            balances: BalancePolicy::from_config(&config),
        }
    }
}

impl EngineSettings {
    pub fn from_config(config: &SwapConfig) -> anyhow::Result<Self> {
        Ok(Self {
            slippage: config.slippage_fraction()?,
            balances: BalancePolicy::from_config(config),
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    InvalidAmount(#[from] CodecError),

    #[error("Asset {asset} is not in the current snapshot")]
    UnknownAsset { asset: AssetId },

    #[error("No source asset selected")]
    NoSourceAsset,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Settlement(#[from] SettlementError),
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteView {
    pub from_amount: String,
    pub to_amount: String,
    /// Output for one whole "from" unit, rendered at the "to" precision
    pub unit_rate: Option<String>,
    /// Pool fee as a percentage
    pub fee: Option<String>,
    pub authority: Authority,
    pub status: SwapStatus,
    pub message: String,
}

pub struct SwapEngine {
    snapshot: Arc<MarketSnapshot>,
    intent: TradeIntent,
    balances: BalancePolicy,
    wallet_connected: bool,
    /// `None` until both tokens are selected
    route: Option<Result<Route, RouteError>>,
    estimate: Option<Quote>,
    unit_rate: Option<RawAmount>,
    sequencer: SimulationSequencer,
    simulation: SimulationState,
    pending: Option<SimulationRequest>,
}

impl SwapEngine {
    pub fn new(snapshot: Arc<MarketSnapshot>, settings: EngineSettings) -> Self {
        Self {
            snapshot,
            intent: TradeIntent::new(settings.slippage),
            balances: settings.balances,
            wallet_connected: false,
            route: None,
            estimate: None,
            unit_rate: None,
            sequencer: SimulationSequencer::new(),
            simulation: SimulationState::Idle,
            pending: None,
        }
    }

    pub fn intent(&self) -> &TradeIntent {
        &self.intent
    }

    pub fn snapshot(&self) -> &Arc<MarketSnapshot> {
        &self.snapshot
    }

    pub fn route(&self) -> Option<&Result<Route, RouteError>> {
        self.route.as_ref()
    }

    /// Latest local quote, if the last recompute produced one
    pub fn estimate(&self) -> Option<&Quote> {
        self.estimate.as_ref()
    }

    pub fn simulation(&self) -> &SimulationState {
        &self.simulation
    }

    pub fn wallet_connected(&self) -> bool {
        self.wallet_connected
    }

    /// Assets that can be selected as "to" for the current "from"
    pub fn to_candidates(&self) -> Vec<&Asset> {
        match self.intent.from_asset {
            Some(from) => {
                pair_resolver::counterparty_assets(&from, &self.snapshot.assets, &self.snapshot.pools)
            }
            None => Vec::new(),
        }
    }

    /// Swap-usable balance of an asset in the current snapshot
    pub fn usable_balance(&self, asset: &AssetId) -> Option<RawAmount> {
        self.snapshot
            .asset(asset)
            .map(|asset| self.balances.usable(asset))
    }

    pub fn edit_from(&mut self, text: &str) -> Result<(), EngineError> {
        self.edit(Authority::EditingFrom, text, Transition::EditFrom)
    }

    pub fn edit_to(&mut self, text: &str) -> Result<(), EngineError> {
        self.edit(Authority::EditingTo, text, Transition::EditTo)
    }

    fn edit(
        &mut self,
        authority: Authority,
        text: &str,
        transition: Transition,
    ) -> Result<(), EngineError> {
        let asset = match authority {
            Authority::EditingFrom => self.intent.from_asset,
            Authority::EditingTo => self.intent.to_asset,
        };
        let raw = self.parse_amount(text, asset)?;
        self.intent
            .write_authoritative(authority, text.to_string(), raw);
        self.recompute(transition);
        Ok(())
    }

    pub fn select_from(&mut self, asset: AssetId) -> Result<(), EngineError> {
        self.require_asset(&asset)?;
        self.intent.from_asset = Some(asset);
        self.recompute(Transition::SelectFrom);
        Ok(())
    }

    pub fn select_to(&mut self, asset: AssetId) -> Result<(), EngineError> {
        self.require_asset(&asset)?;
        self.intent.to_asset = Some(asset);
        self.recompute(Transition::SelectTo);
        Ok(())
    }

    /// Swap sides; the old "to" value becomes the authoritative "from" value
    pub fn reverse(&mut self) {
        let carried = self.intent.reverse();
        log_reverse!("reversed direction, carrying '{}' into from", carried);
        let raw = match self.parse_amount(&carried, self.intent.from_asset) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("reversed amount '{}' rejected: {}", carried, e);
                self.intent.from.text.clear();
                RawAmount::ZERO
            }
        };
        self.intent.refresh_authoritative_raw(raw);
        self.recompute(Transition::Reverse);
    }

    /// Fill "from" with the swap-usable balance of the source asset
    pub fn set_max_from(&mut self) -> Result<(), EngineError> {
        let from = self.intent.from_asset.ok_or(EngineError::NoSourceAsset)?;
        let asset = self.require_asset(&from)?;
        let usable = self.balances.usable(asset);
        let text = asset.format(usable);
        self.intent
            .write_authoritative(Authority::EditingFrom, text, usable);
        self.recompute(Transition::SetMax);
        Ok(())
    }

    pub fn set_slippage(&mut self, slippage: FixedPoint) {
        self.intent.slippage = slippage;
        self.recompute(Transition::SlippageChange);
    }

    pub fn set_wallet_status(&mut self, connected: bool) {
        self.wallet_connected = connected;
    }

    /// Replace the market snapshot and refresh the quote from the authoritative amount
    pub fn update_snapshot(&mut self, snapshot: Arc<MarketSnapshot>) {
        log_pool!(
            "snapshot refresh: {} assets, {} pools",
            snapshot.assets.len(),
            snapshot.pools.len()
        );
        self.snapshot = snapshot;
        self.recompute(Transition::SnapshotRefresh);
    }

    pub fn pending_simulation(&self) -> Option<&SimulationRequest> {
        self.pending.as_ref()
    }

    /// Hand the latest request to a caller that will run it
    pub fn take_pending_simulation(&mut self) -> Option<SimulationRequest> {
        self.pending.take()
    }

    /// Apply a simulation result; returns false when it was superseded
    pub fn apply_simulation(&mut self, sequence: u64, result: SimulationResult) -> bool {
        let awaited = matches!(self.simulation, SimulationState::Pending { sequence: s } if s == sequence);
        if !awaited {
            log_simulation!(
                "dropping stale simulation #{} (latest #{})",
                sequence,
                self.sequencer.latest_issued()
            );
            return false;
        }
        if let Err(e) = self.sequencer.accept(sequence) {
            log_simulation!("dropping simulation: {}", e);
            return false;
        }

        let result = match result.resolved_pool_index {
            Some(resolved) if result.success && self.intent.pool_index != Some(resolved) => {
                warn!(
                    resolved,
                    routed = ?self.intent.pool_index,
                    "simulation resolved a different pool; treating as failed"
                );
                SimulationResult::failed(Some(resolved))
            }
            _ => result,
        };

        if result.success {
            let derived_asset = match self.intent.authority {
                Authority::EditingFrom => self.intent.to_asset,
                Authority::EditingTo => self.intent.from_asset,
            };
            if let Some(asset) = derived_asset.and_then(|id| self.snapshot.asset(&id)) {
                let text = asset.format(result.output_amount);
                self.intent.write_derived(text, result.output_amount);
            }
        }
        self.simulation = SimulationState::Completed { sequence, result };
        true
    }

    /// Run the pending request (if any) against `service` and apply it
    pub async fn run_simulation(&mut self, service: &dyn SimulationService) -> bool {
        let Some(request) = self.pending.take() else {
            return false;
        };
        let result = simulation::simulate(service, &request).await;
        self.apply_simulation(request.sequence, result)
    }

    pub fn build_request(&self) -> Result<ExecutionRequest, Rejection> {
        execution::build(&TradeContext {
            wallet_connected: self.wallet_connected,
            intent: &self.intent,
            snapshot: &self.snapshot,
            route: self.route.as_ref(),
            simulation: &self.simulation,
            balances: &self.balances,
        })
    }

    pub fn status(&self) -> SwapStatus {
        match self.build_request() {
            Ok(_) => SwapStatus::Ready,
            Err(rejection) => rejection.status(),
        }
    }

    pub fn view(&self) -> QuoteView {
        let status = self.status();
        let to_asset = self
            .intent
            .to_asset
            .and_then(|id| self.snapshot.asset(&id));
        let pool = self
            .intent
            .pool_index
            .and_then(|index| self.snapshot.pool(index));

        QuoteView {
            from_amount: self.intent.from.text.clone(),
            to_amount: self.intent.to.text.clone(),
            unit_rate: self
                .unit_rate
                .zip(to_asset)
                .map(|(rate, asset)| asset.format(rate)),
            fee: pool.and_then(|pool| format_percent(pool.fee)),
            authority: self.intent.authority,
            status,
            message: status.message().to_string(),
        }
    }

    /// Build and hand the request to the settlement backend
    pub async fn submit(
        &self,
        backend: &dyn SettlementBackend,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let request = self.build_request().map_err(|rejection| {
            log_rejected!("submit refused: {}", rejection);
            rejection
        })?;
        log_execution!(
            "submitting {} → {} via pool {}",
            request.amount_in,
            request.expected_output,
            request.pool_index
        );
        Ok(backend.submit(&request).await?)
    }

    fn require_asset(&self, asset: &AssetId) -> Result<&Asset, EngineError> {
        self.snapshot
            .asset(asset)
            .ok_or(EngineError::UnknownAsset { asset: *asset })
    }

    /// Edit-boundary parse; digit-less input such as "" or "." means zero
    fn parse_amount(&self, text: &str, asset: Option<AssetId>) -> Result<RawAmount, CodecError> {
        if !is_decimal_input(text) {
            return Err(CodecError::InvalidFormat {
                input: text.to_string(),
            });
        }
        if !has_digits(text) {
            return Ok(RawAmount::ZERO);
        }
        match asset.and_then(|id| self.snapshot.asset(&id)) {
            Some(asset) => asset.parse(text),
            // Precision unknown until a token is chosen; re-parsed on selection
            None => Ok(RawAmount::ZERO),
        }
    }

    fn recompute(&mut self, transition: Transition) {
        debug!(?transition, authority = ?self.intent.authority, "input sync transition");

        let text = self.intent.authoritative().text.clone();
        let raw = self
            .parse_amount(&text, self.intent.authoritative_asset())
            .unwrap_or_else(|e| {
                warn!("authoritative amount '{}' no longer parses: {}", text, e);
                RawAmount::ZERO
            });
        self.intent.refresh_authoritative_raw(raw);

        self.estimate = None;
        self.unit_rate = None;
        self.route = match (self.intent.from_asset, self.intent.to_asset) {
            (Some(from), Some(to)) => Some(pair_resolver::resolve_route(
                &from,
                &to,
                &self.snapshot.pools,
            )),
            _ => None,
        };
        self.intent.pool_index = match &self.route {
            Some(Ok(route)) => Some(route.pool_index),
            _ => None,
        };

        let snapshot = Arc::clone(&self.snapshot);
        let (from_asset, to_asset) = match (
            self.intent.from_asset.and_then(|id| snapshot.asset(&id)),
            self.intent.to_asset.and_then(|id| snapshot.asset(&id)),
        ) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                self.supersede_simulation();
                return;
            }
        };

        let route = match &self.route {
            Some(Ok(route)) => *route,
            Some(Err(e)) => {
                log_route!("no route: {}", e);
                self.intent
                    .write_derived(zero_string(from_asset.decimals), RawAmount::ZERO);
                self.supersede_simulation();
                return;
            }
            None => {
                self.supersede_simulation();
                return;
            }
        };
        let Some(pool) = snapshot.pool(route.pool_index) else {
            self.supersede_simulation();
            return;
        };

        let forward = route.leg(from_asset, to_asset);
        self.unit_rate = QuoteMath::unit_rate(pool, &forward).ok();

        let (leg, fee_mode, derived_asset) = match self.intent.authority {
            Authority::EditingFrom => (forward, FeeMode::Deducted, to_asset),
            Authority::EditingTo => (forward.reversed(), FeeMode::AddedBack, from_asset),
        };
        let amount = self.intent.authoritative().raw;
        match QuoteMath::quote(pool, &leg, amount, fee_mode) {
            Ok(quote) => {
                log_quote!(
                    "{:?} {} → {} ({:?})",
                    leg.direction,
                    amount,
                    quote.amount_out,
                    fee_mode
                );
                self.intent
                    .write_derived(derived_asset.format(quote.amount_out), quote.amount_out);
                self.estimate = Some(quote);
            }
            Err(e) => {
                warn!(pool_index = route.pool_index, "local quote failed: {}", e);
                self.intent
                    .write_derived(zero_string(derived_asset.decimals), RawAmount::ZERO);
            }
        }

        self.issue_simulation(route, from_asset.id, to_asset.id, amount);
    }

    fn issue_simulation(&mut self, route: Route, from: AssetId, to: AssetId, amount: RawAmount) {
        if amount.is_zero() {
            self.supersede_simulation();
            return;
        }
        let sequence = self.sequencer.issue();
        let request = SimulationRequest {
            sequence,
            pool_index: route.pool_index,
            asset_in: from,
            asset_out: to,
            amount,
            by_amount_in: self.intent.authority == Authority::EditingFrom,
            slippage: self.intent.slippage,
            snapshot: Arc::clone(&self.snapshot),
        };
        log_simulation!(
            "issued simulation #{} ({} {})",
            sequence,
            amount,
            if request.by_amount_in { "in" } else { "out" }
        );
        self.simulation = SimulationState::Pending { sequence };
        self.pending = Some(request);
    }

    /// Nothing to simulate; outstanding results become stale
    fn supersede_simulation(&mut self) {
        if self.simulation.is_pending() || self.pending.is_some() {
            self.sequencer.issue();
        }
        self.simulation = SimulationState::Idle;
        self.pending = None;
    }
}

fn format_percent(fraction: FixedPoint) -> Option<String> {
    let percent = fraction.to_decimal()?.checked_mul(Decimal::ONE_HUNDRED)?;
    Some(format!("{}%", percent.normalize()))
}
