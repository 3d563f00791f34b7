//! Typed identifiers for assets
//!
//! Assets are keyed by an opaque 32-byte address (a mint or token account key
//! on the settlement chain). The wrapper keeps raw byte arrays from being
//! confused with other 32-byte values and renders as `0x`-prefixed hex.
//!
//! ```rust
//! use swap_types::AssetId;
//!
//! let usdc = AssetId::from_bytes([1u8; 32]);
//! let parsed: AssetId = usdc.to_string().parse().unwrap();
//! assert_eq!(parsed, usdc);
//! ```

use crate::common::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Opaque 32-byte asset address
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct AssetId(pub [u8; 32]);

impl AssetId {
    pub const LEN: usize = 32;

    #[inline(always)]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Shortened `0xabcd…1234` form for log lines
    pub fn short(&self) -> String {
        let full = hex::encode(self.0);
        format!("0x{}…{}", &full[..4], &full[full.len() - 4..])
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for AssetId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_clean = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(hex_clean).map_err(|_| ValidationError::InvalidHex {
            input: s.to_string(),
        })?;
        let array: [u8; 32] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| ValidationError::InvalidLength {
                    expected: Self::LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }
}

impl From<[u8; 32]> for AssetId {
    #[inline(always)]
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for AssetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
