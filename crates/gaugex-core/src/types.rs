use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GaugeError;

/// Quantity of the staked asset in base units. u128 leaves ample headroom
/// above any realistic fungible-asset supply.
pub type Amount = u128;

/// Boost-weighted stake weight. Same magnitude range as `Amount` scaled by
/// a percentage multiplier, so it shares the u128 representation.
pub type Shares = u128;

/// Unix timestamp (seconds, UTC).
pub type Timestamp = i64;

/// Position identifier. Assigned densely from 1; never reused.
pub type PositionId = u64;

// ── AccountId ────────────────────────────────────────────────────────────────

/// 32-byte opaque account identifier. The gauge does not derive or verify
/// identities — callers supply them fully formed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// The null account. Rejected wherever an address is required.
    pub const ZERO: AccountId = AccountId([0u8; 32]);

    pub fn from_bytes(b: [u8; 32]) -> Self {
        Self(b)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, GaugeError> {
        let bytes = hex::decode(s).map_err(|_| GaugeError::InvalidAddress)?;
        if bytes.len() != 32 {
            return Err(GaugeError::InvalidAddress);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Derives an id by zero-padding a short UTF-8 label. A convenience for
    /// tooling and tests; labels longer than 32 bytes are truncated.
    pub fn from_label(label: &str) -> Self {
        let mut arr = [0u8; 32];
        let src = label.as_bytes();
        let n = src.len().min(32);
        arr[..n].copy_from_slice(&src[..n]);
        Self(arr)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({}…)", &self.to_hex()[..8])
    }
}
