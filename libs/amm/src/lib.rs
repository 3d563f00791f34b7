//! # Swap AMM Library - Exact Sqrt-Price Quoting
//!
//! ## Purpose
//!
//! Integer-exact quote math for concentrated-liquidity pools. Given a pool's
//! square-root price, a trade direction and an input amount, produces the
//! first-pass output estimate with the pool fee applied in one of three modes.
//!
//! ## Integration Points
//!
//! - **Input Sources**: [`swap_types::Pool`] from the market snapshot, raw amounts from the decimal codec
//! - **Output Destinations**: the swap engine's input sync and the reference simulator
//! - **Precision**: outputs are corrected between the input and output asset precisions
//!
//! ## Architecture Role
//!
//! The estimate here is linear and liquidity-unaware. It fills the derived
//! field immediately on every edit and is then refined by the authoritative
//! simulation service, which alone decides whether liquidity supports a trade.
//!
//! ## Precision Guarantees
//!
//! - **No floating point**: every intermediate is a `BigUint`
//! - **Truncation**: all division rounds toward zero
//! - **Overflow**: reported as [`QuoteError::Overflow`], never wrapped

pub mod pool_traits;
pub mod quote_math;

pub use pool_traits::SqrtPricePool;
pub use quote_math::{Direction, FeeMode, Quote, QuoteError, QuoteMath, SwapLeg};
