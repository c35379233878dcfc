use serde::{Deserialize, Serialize};

use crate::error::GaugeError;
use crate::types::{AccountId, Amount, PositionId, Shares, Timestamp};

// ── Position ─────────────────────────────────────────────────────────────────

/// One lock record: staked principal, its derived boost weight, and timing.
///
/// `amount` is fixed at creation and immutable until withdrawal. `shares`
/// and `boost_factor` are derived and recomputed on every settlement that
/// touches the position. `unlock_time` stays 0 until the position is marked
/// for withdrawal; only then does the lock have a realized duration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub id: PositionId,
    pub owner: AccountId,
    pub amount: Amount,
    pub shares: Shares,
    /// Multiplier applied the last time shares were derived (100 = 1.0×).
    pub boost_factor: u64,
    pub lock_time: Timestamp,
    pub unlock_time: Timestamp,
}

impl Position {
    pub fn new(id: PositionId, owner: AccountId, amount: Amount, now: Timestamp) -> Self {
        Self {
            id,
            owner,
            amount,
            shares: 0,
            boost_factor: 0,
            lock_time: now,
            unlock_time: 0,
        }
    }

    /// Realized lock duration in seconds.
    ///
    /// Zero while `unlock_time` is unset; once set, `unlock_time − lock_time`.
    /// A negative difference means the clock ran backwards relative to the
    /// stored lock and is a hard failure, never wrapped.
    pub fn lock_duration(&self) -> Result<i64, GaugeError> {
        if self.unlock_time == 0 {
            return Ok(0);
        }
        let duration = self
            .unlock_time
            .checked_sub(self.lock_time)
            .ok_or(GaugeError::MathOverflow)?;
        if duration < 0 {
            return Err(GaugeError::MathOverflow);
        }
        Ok(duration)
    }
}

// ── RewardState ──────────────────────────────────────────────────────────────

/// The single global reward-accrual record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RewardState {
    /// Reward units accrued per second. Administratively set, never zero.
    pub reward_rate: u128,
    /// Accrual window. The accrual clock never advances past `reward_end`.
    pub reward_start: Timestamp,
    pub reward_end: Timestamp,
    /// Cumulative reward per unit share × REWARD_SCALE. Non-decreasing.
    pub reward_per_share_stored: u128,
    /// Timestamp of the last settlement, clamped to `reward_end`.
    pub last_update_time: Timestamp,
    /// Sum of all live positions' shares.
    pub total_shares: Shares,
    /// Sum of all live positions' principal. Decoupled from `total_shares`.
    pub total_locked: Amount,
}

impl RewardState {
    pub fn new(reward_rate: u128, reward_start: Timestamp, reward_end: Timestamp) -> Self {
        Self {
            reward_rate,
            reward_start,
            reward_end,
            reward_per_share_stored: 0,
            last_update_time: reward_start,
            total_shares: 0,
            total_locked: 0,
        }
    }
}

// ── RewardLedger ─────────────────────────────────────────────────────────────

/// Per-position accrual cache: the accumulator baseline at last settlement
/// and reward computed but not yet paid out.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RewardLedger {
    pub reward_debt: u128,
    pub pending_reward: Amount,
}

// ── GaugeConfig ──────────────────────────────────────────────────────────────

/// Persisted gauge configuration, written once at initialisation.
/// `funding_account` is the only field mutable afterwards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GaugeConfig {
    /// Symbol of the staked asset; reopening with a different asset fails.
    pub asset: String,
    /// Administrative identity for rate/funding/hook setters.
    pub admin: AccountId,
    /// Account reward payouts are drawn from.
    pub funding_account: AccountId,
}
