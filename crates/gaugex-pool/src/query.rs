use gaugex_core::error::GaugeError;
use gaugex_core::position::{GaugeConfig, Position, RewardLedger, RewardState};
use gaugex_core::types::{AccountId, Amount, PositionId, Timestamp};
use gaugex_state::engine::{earned_amount, remaining_budget};
use gaugex_state::StateDb;

/// Read-only accessors over the stored gauge state.
pub struct GaugeQuery<'a> {
    db: &'a StateDb,
}

impl<'a> GaugeQuery<'a> {
    pub fn new(db: &'a StateDb) -> Self {
        Self { db }
    }

    pub fn reward_state(&self) -> Result<RewardState, GaugeError> {
        self.db
            .get_reward_state()?
            .ok_or_else(|| GaugeError::Storage("reward state not initialised".into()))
    }

    pub fn config(&self) -> Result<GaugeConfig, GaugeError> {
        self.db
            .get_config()?
            .ok_or_else(|| GaugeError::Storage("gauge not initialised".into()))
    }

    /// Fetch a live position record.
    pub fn position(&self, id: PositionId) -> Result<Position, GaugeError> {
        match self.db.get_position(id)? {
            Some(pos) if pos.amount > 0 => Ok(pos),
            _ => Err(GaugeError::InvalidPosition(id)),
        }
    }

    pub fn ledger(&self, id: PositionId) -> Result<RewardLedger, GaugeError> {
        self.position(id)?;
        self.db.get_ledger(id)
    }

    /// Reward owed to `id` as of `now`, without settling.
    pub fn earned(&self, id: PositionId, now: Timestamp) -> Result<Amount, GaugeError> {
        let state = self.reward_state()?;
        let position = self.position(id)?;
        let ledger = self.db.get_ledger(id)?;
        earned_amount(&state, &position, &ledger, now)
    }

    /// Reward units still to be distributed before the window closes.
    pub fn remaining_budget(&self, now: Timestamp) -> Result<u128, GaugeError> {
        remaining_budget(&self.reward_state()?, now)
    }

    pub fn positions_of(&self, owner: &AccountId) -> Result<Vec<PositionId>, GaugeError> {
        self.db.positions_of(owner)
    }

    pub fn count_of(&self, owner: &AccountId) -> Result<u64, GaugeError> {
        Ok(self.db.positions_of(owner)?.len() as u64)
    }

    pub fn total_positions(&self) -> u64 {
        self.db.live_positions()
    }

    /// Human-readable summary of one position's state.
    pub fn describe(&self, id: PositionId, now: Timestamp) -> Result<String, GaugeError> {
        let pos = self.position(id)?;
        let earned = self.earned(id, now)?;
        let held = now.saturating_sub(pos.lock_time);
        Ok(format!(
            "Position {} | owner {} | {} locked | {} shares ({}%) | held {}d | earned {}",
            pos.id,
            pos.owner,
            pos.amount,
            pos.shares,
            pos.boost_factor,
            held / 86_400,
            earned,
        ))
    }
}
