use std::sync::Arc;

use tracing::debug;

use gaugex_core::boost::resolve_boost;
use gaugex_core::constants::{BOOST_BASE, REWARD_SCALE};
use gaugex_core::error::GaugeError;
use gaugex_core::position::{Position, RewardLedger, RewardState};
use gaugex_core::types::{Amount, PositionId, Timestamp};

use crate::db::StateDb;

// ── Accrual math ──────────────────────────────────────────────────────────────
//
// Pure functions over in-memory records. All arithmetic is checked; overflow
// and a clock running backwards surface as MathOverflow rather than wrapping,
// so no settlement can fabricate shares or reward.

/// The accrual clock: `now`, clamped to the end of the reward window.
pub fn accrual_clock(state: &RewardState, now: Timestamp) -> Timestamp {
    now.min(state.reward_end)
}

/// Live value of the reward-per-share accumulator.
///
/// While `total_shares` is zero the stored value is returned unchanged: the
/// accumulator freezes rather than drifting with time. Division truncates
/// toward zero and the truncation loss is permanent.
pub fn current_reward_per_share(
    state: &RewardState,
    now: Timestamp,
) -> Result<u128, GaugeError> {
    if state.total_shares == 0 {
        return Ok(state.reward_per_share_stored);
    }
    let elapsed = accrual_clock(state, now)
        .checked_sub(state.last_update_time)
        .ok_or(GaugeError::MathOverflow)?;
    let elapsed = u128::try_from(elapsed).map_err(|_| GaugeError::MathOverflow)?;
    let accrued = elapsed
        .checked_mul(state.reward_rate)
        .and_then(|v| v.checked_mul(REWARD_SCALE))
        .ok_or(GaugeError::MathOverflow)?
        / state.total_shares;
    state
        .reward_per_share_stored
        .checked_add(accrued)
        .ok_or(GaugeError::MathOverflow)
}

/// Reward owed to a position as of `now`: accrual since its debt baseline
/// plus anything already marked pending.
pub fn earned_amount(
    state: &RewardState,
    position: &Position,
    ledger: &RewardLedger,
    now: Timestamp,
) -> Result<Amount, GaugeError> {
    let delta = current_reward_per_share(state, now)?
        .checked_sub(ledger.reward_debt)
        .ok_or(GaugeError::MathOverflow)?;
    let accrued = position
        .shares
        .checked_mul(delta)
        .ok_or(GaugeError::MathOverflow)?
        / REWARD_SCALE;
    ledger
        .pending_reward
        .checked_add(accrued)
        .ok_or(GaugeError::MathOverflow)
}

/// The global half of a settlement: roll the accumulator forward and stamp
/// the clamped clock.
pub fn settle_global(state: &mut RewardState, now: Timestamp) -> Result<(), GaugeError> {
    state.reward_per_share_stored = current_reward_per_share(state, now)?;
    state.last_update_time = accrual_clock(state, now);
    Ok(())
}

/// Full settlement of one position.
///
/// Order is contractual: shares are re-derived from the realized lock
/// duration and the delta applied to `total_shares` first, then the
/// accumulator rolls forward (observing the new denominator), then accrued
/// reward folds into the ledger and the debt baseline resets.
pub fn settle_position(
    state: &mut RewardState,
    position: &mut Position,
    ledger: &mut RewardLedger,
    now: Timestamp,
) -> Result<(), GaugeError> {
    let duration = position.lock_duration()?;
    let (_tier, boost) = resolve_boost(duration)?;
    let new_shares = position
        .amount
        .checked_mul(boost as u128)
        .ok_or(GaugeError::MathOverflow)?
        / BOOST_BASE as u128;

    state.total_shares = state
        .total_shares
        .checked_sub(position.shares)
        .and_then(|v| v.checked_add(new_shares))
        .ok_or(GaugeError::MathOverflow)?;
    position.shares = new_shares;
    position.boost_factor = boost;

    settle_global(state, now)?;

    let delta = state
        .reward_per_share_stored
        .checked_sub(ledger.reward_debt)
        .ok_or(GaugeError::MathOverflow)?;
    let accrued = position
        .shares
        .checked_mul(delta)
        .ok_or(GaugeError::MathOverflow)?
        / REWARD_SCALE;
    ledger.pending_reward = ledger
        .pending_reward
        .checked_add(accrued)
        .ok_or(GaugeError::MathOverflow)?;
    ledger.reward_debt = state.reward_per_share_stored;
    Ok(())
}

/// Reward units still to be distributed before the window closes.
pub fn remaining_budget(state: &RewardState, now: Timestamp) -> Result<u128, GaugeError> {
    if accrual_clock(state, now) >= state.reward_end {
        return Ok(0);
    }
    let remaining = u128::try_from(state.reward_end - now).map_err(|_| GaugeError::MathOverflow)?;
    remaining
        .checked_mul(state.reward_rate)
        .ok_or(GaugeError::MathOverflow)
}

// ── RewardAccrualEngine ──────────────────────────────────────────────────────

/// A settlement staged in memory, written back atomically via [`commit`].
///
/// [`commit`]: RewardAccrualEngine::commit
pub struct Settlement {
    pub state: RewardState,
    pub position: Option<(Position, RewardLedger)>,
}

/// Owns the global reward schedule and accumulator; computes time-weighted
/// accrual and per-position earned amounts against the stored state.
pub struct RewardAccrualEngine {
    db: Arc<StateDb>,
}

impl RewardAccrualEngine {
    pub fn new(db: Arc<StateDb>) -> Self {
        Self { db }
    }

    pub fn load_state(&self) -> Result<RewardState, GaugeError> {
        self.db
            .get_reward_state()?
            .ok_or_else(|| GaugeError::Storage("reward state not initialised".into()))
    }

    /// Stage a settlement as of `now`.
    ///
    /// `None` performs only the global half (rate changes). `Some(id)` also
    /// settles the position — but only if a live record exists; settling an
    /// id with no record degrades to the global half, which is exactly the
    /// deposit flow settling its not-yet-created next id.
    pub fn settle(
        &self,
        id: Option<PositionId>,
        now: Timestamp,
    ) -> Result<Settlement, GaugeError> {
        let mut state = self.load_state()?;
        let position = match id {
            Some(id) => match self.db.get_position(id)? {
                Some(mut pos) if pos.amount > 0 => {
                    let mut ledger = self.db.get_ledger(id)?;
                    settle_position(&mut state, &mut pos, &mut ledger, now)?;
                    Some((pos, ledger))
                }
                _ => {
                    settle_global(&mut state, now)?;
                    None
                }
            },
            None => {
                settle_global(&mut state, now)?;
                None
            }
        };
        Ok(Settlement { state, position })
    }

    /// Write a staged settlement back as a unit.
    pub fn commit(&self, settlement: &Settlement) -> Result<(), GaugeError> {
        if let Some((pos, ledger)) = &settlement.position {
            self.db.put_position(pos)?;
            self.db.put_ledger(pos.id, ledger)?;
        }
        self.db.put_reward_state(&settlement.state)?;
        debug!(
            reward_per_share = settlement.state.reward_per_share_stored,
            total_shares = settlement.state.total_shares,
            "settlement committed"
        );
        Ok(())
    }

    /// Reward owed to `id` as of `now`, without settling.
    pub fn earned(&self, id: PositionId, now: Timestamp) -> Result<Amount, GaugeError> {
        let state = self.load_state()?;
        let position = match self.db.get_position(id)? {
            Some(pos) if pos.amount > 0 => pos,
            _ => return Err(GaugeError::InvalidPosition(id)),
        };
        let ledger = self.db.get_ledger(id)?;
        earned_amount(&state, &position, &ledger, now)
    }
}
