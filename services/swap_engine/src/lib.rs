//! # Swap Engine - Quote, Simulate, Execute
//!
//! ## Purpose
//!
//! Quoting and execution-request layer in front of a concentrated-liquidity
//! pool. Keeps a source and a destination amount field consistent as either
//! is edited, refines the local estimate with an authoritative simulation,
//! and assembles a slippage-bounded execution request on submit.
//!
//! ## Architecture Role
//!
//! ```text
//! user edit → [input_sync] → [pair_resolver] → swap_amm::QuoteMath
//!                                 ↓
//!                          [simulation] gateway → external simulator
//!                                 ↓
//!                          [execution] builder → [settlement] backend
//! ```
//!
//! ## Integration Points
//!
//! - **Input Sources**: `MarketSnapshot` from the balance and pool/tick providers
//! - **Collaborators**: [`simulation::SimulationService`], [`settlement::SettlementBackend`]
//! - **Output**: [`engine::QuoteView`] for rendering, [`execution::ExecutionRequest`] for settlement

pub mod balances;
pub mod engine;
pub mod execution;
pub mod input_sync;
pub mod logging;
pub mod pair_resolver;
pub mod settlement;
pub mod simulation;

pub use balances::BalancePolicy;
pub use engine::{EngineError, EngineSettings, QuoteView, SubmitError, SwapEngine};
pub use execution::{ExecutionRequest, Rejection, SwapStatus};
pub use input_sync::{AmountField, Authority, FieldOrigin, TradeIntent, Transition};
pub use pair_resolver::{Route, RouteError};
pub use settlement::{DryRunSettlement, SettlementBackend, SettlementError, SubmissionReceipt};
pub use simulation::{
    ReferenceSimulator, SimulationError, SimulationRequest, SimulationResult, SimulationService,
    SimulationState,
};
