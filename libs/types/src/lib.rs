//! # Swap Types Library
//!
//! Shared value types for the swap quote engine.
//!
//! ## Design Philosophy
//!
//! - **No Precision Loss**: every amount is a scaled integer ([`RawAmount`])
//! - **Explicit Scale**: prices, fees and tolerances carry their own decimal scale ([`FixedPoint`])
//! - **Clear Boundaries**: text is converted exactly once, by the decimal codec in [`precision`]
//! - **Immutable Snapshots**: assets and pools arrive together as a [`MarketSnapshot`]
//!
//! ## Quick Start
//!
//! ```rust
//! use swap_types::{Asset, AssetId, RawAmount};
//!
//! let usdc = Asset::new(AssetId::from_bytes([1u8; 32]), 6, "USDC")
//!     .with_balance(RawAmount::new(1_000_000_000));
//!
//! let raw = usdc.parse("12.5").unwrap();
//! assert_eq!(raw, RawAmount::new(12_500_000));
//! assert_eq!(usdc.format(raw), "12.500000");
//! ```
//!
//! ## Integration Points
//!
//! - **swap-amm**: reads [`Pool`] price state to produce quotes
//! - **swap-engine**: keeps amounts as [`RawAmount`] and renders them through [`precision`]
//! - **Snapshot providers**: serialize [`MarketSnapshot`] as JSON

pub mod common;
pub mod market;
pub mod precision;

pub use common::errors::{CodecError, FixedPointError, ValidationError};
pub use common::fixed_point::FixedPoint;
pub use common::identifiers::AssetId;
pub use market::{Asset, MarketSnapshot, Pool, Tick};
pub use precision::{to_decimal_string, to_raw, RawAmount};
