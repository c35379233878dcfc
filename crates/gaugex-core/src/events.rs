use serde::{Deserialize, Serialize};

use crate::error::GaugeError;
use crate::types::{AccountId, Amount, PositionId, Timestamp};

// ── Notifications ────────────────────────────────────────────────────────────

/// One-way, fire-and-forget notifications emitted after each state-changing
/// operation completes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum GaugeEvent {
    DepositCreated {
        id: PositionId,
        depositor: AccountId,
        receiver: AccountId,
        amount: Amount,
        timestamp: Timestamp,
    },
    WithdrawalCompleted {
        id: PositionId,
        owner: AccountId,
        receiver: AccountId,
        amount: Amount,
        lock_duration: i64,
        timestamp: Timestamp,
    },
    RewardPaid {
        id: PositionId,
        owner: AccountId,
        amount: Amount,
        timestamp: Timestamp,
    },
    RewardRateChanged {
        old_rate: u128,
        new_rate: u128,
        timestamp: Timestamp,
    },
    FundingAccountChanged {
        old_account: AccountId,
        new_account: AccountId,
        timestamp: Timestamp,
    },
}

// ── Hook data ────────────────────────────────────────────────────────────────

/// Encode an account id for transport through an external event payload.
/// Pure identity pass-through; the payload has no other semantic content.
pub fn encode_hook_data(owner: &AccountId) -> String {
    owner.to_hex()
}

/// Decode a hook payload produced by [`encode_hook_data`].
pub fn parse_hook_data(data: &str) -> Result<AccountId, GaugeError> {
    AccountId::from_hex(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_data_round_trips() {
        let owner = AccountId::from_label("integration");
        let data = encode_hook_data(&owner);
        assert_eq!(parse_hook_data(&data).unwrap(), owner);
    }

    #[test]
    fn malformed_hook_data_is_rejected() {
        assert!(matches!(
            parse_hook_data("not-hex"),
            Err(GaugeError::InvalidAddress)
        ));
        // Valid hex, wrong length.
        assert!(matches!(
            parse_hook_data("deadbeef"),
            Err(GaugeError::InvalidAddress)
        ));
    }
}
