//! Swap Engine Configuration Module
//!
//! Loads [`SwapConfig`] from an optional TOML file, then applies environment
//! overrides (`SWAPQ__` prefix, `__` between nested keys). Every field has a
//! default, so an empty environment yields a working configuration.

use crate::service::{loader, swap};
use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use swap_types::{AssetId, FixedPoint};
use tracing::{debug, info};

/// Engine-wide settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SwapConfig {
    /// Slippage tolerance for new trade intents, in percent
    pub default_slippage_pct: Decimal,

    /// Asset whose balance must keep a minimum deposit (wrapped native token)
    pub native_wrapped_asset: Option<AssetId>,

    /// Raw amount of the native wrapped asset that cannot be swapped
    pub native_min_deposit: u64,

    /// Decimal scale for slippage and other fractions
    pub fraction_scale: u8,

    pub log_level: String,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            default_slippage_pct: swap::DEFAULT_SLIPPAGE_PCT,
            native_wrapped_asset: None,
            native_min_deposit: swap::DEFAULT_NATIVE_MIN_DEPOSIT,
            fraction_scale: swap::DEFAULT_FRACTION_SCALE,
            log_level: loader::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl SwapConfig {
    /// Load configuration from an optional file with environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Load with an explicit environment map instead of the process environment
    pub fn load_with_env(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading swap config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(loader::ENV_PREFIX)
                .separator(loader::ENV_SEPARATOR)
                .source(env),
        );

        let config: SwapConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        debug!(
            slippage_pct = %config.default_slippage_pct,
            native_min_deposit = config.native_min_deposit,
            "swap config loaded"
        );
        Ok(config)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.default_slippage_pct.is_sign_negative()
            || self.default_slippage_pct > swap::MAX_SLIPPAGE_PCT
        {
            bail!(
                "default_slippage_pct must be within [0, {}], got {}",
                swap::MAX_SLIPPAGE_PCT,
                self.default_slippage_pct
            );
        }
        // 10^scale must fit a raw amount
        if self.fraction_scale > swap_types::precision::MAX_PRECISION {
            bail!(
                "fraction_scale must be at most {}, got {}",
                swap_types::precision::MAX_PRECISION,
                self.fraction_scale
            );
        }
        Ok(())
    }

    /// Default slippage as a fraction at `fraction_scale`
    pub fn slippage_fraction(&self) -> Result<FixedPoint> {
        FixedPoint::from_percent(self.default_slippage_pct, self.fraction_scale)
            .context("Invalid default slippage")
    }
}

/// Convenience function to load configuration from an optional file
pub fn load_config(path: Option<&Path>) -> Result<SwapConfig> {
    SwapConfig::load(path)
}
