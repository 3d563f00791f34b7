//! Service configuration defaults
//!
//! Default values used when no config file or environment override sets a
//! field, kept in one place so the engine and the CLI agree.

/// Swap engine defaults
pub mod swap {
    use rust_decimal::Decimal;

    /// Slippage tolerance applied to new trade intents (percent)
    pub const DEFAULT_SLIPPAGE_PCT: Decimal = Decimal::ONE;

    /// Upper bound accepted for any slippage tolerance (percent)
    pub const MAX_SLIPPAGE_PCT: Decimal = Decimal::ONE_HUNDRED;

    /// Raw amount of the native wrapped asset kept back for account rent
    pub const DEFAULT_NATIVE_MIN_DEPOSIT: u64 = 10_000_000;

    /// Decimal scale used for slippage and other fractions
    pub const DEFAULT_FRACTION_SCALE: u8 = 12;
}

/// Loader defaults
pub mod loader {
    /// Environment variable prefix, e.g. `SWAPQ__DEFAULT_SLIPPAGE_PCT`
    pub const ENV_PREFIX: &str = "SWAPQ";

    /// Separator between prefix and nested keys
    pub const ENV_SEPARATOR: &str = "__";

    pub const DEFAULT_LOG_LEVEL: &str = "info";
}
