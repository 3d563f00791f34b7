//! # Swap Engine Configuration
//!
//! Settings and defaults for the swap quote engine.
//!
//! ## Features
//!
//! - **Defaults**: slippage, native-asset reserve and fraction scale in [`service`]
//! - **Loading**: optional TOML file plus `SWAPQ__*` environment overrides
//! - **Validation**: out-of-range values are rejected at load time
//!
//! ## Usage
//!
//! ```rust
//! use swap_config::SwapConfig;
//!
//! let config = SwapConfig::default();
//! let slippage = config.slippage_fraction().unwrap();
//! assert_eq!(slippage.to_string(), "0.010000000000");
//! ```

pub mod service;
pub mod service_config;

pub use service_config::{load_config, SwapConfig};
