use std::sync::Arc;

use tracing::{debug, info};

use gaugex_core::error::GaugeError;
use gaugex_core::events::GaugeEvent;
use gaugex_core::position::{GaugeConfig, RewardState};
use gaugex_core::types::{AccountId, Amount, PositionId, Timestamp};
use gaugex_state::engine::{settle_position, RewardAccrualEngine};
use gaugex_state::{PositionRegistry, StateDb};

use crate::hook::RewardsHook;
use crate::query::GaugeQuery;
use crate::transfer::AssetTransfer;

/// Parameters for bootstrapping a fresh gauge.
pub struct GaugeInit {
    pub asset: String,
    pub admin: AccountId,
    pub funding_account: AccountId,
    pub reward_rate: u128,
    pub reward_start: Timestamp,
    pub reward_end: Timestamp,
}

/// The public operation surface.
///
/// Every state-changing operation settles the accumulator first, then
/// mutates registry/reward state, then performs any external transfer, then
/// notifies observers. Mutating operations take `&mut self`; the exclusive
/// borrow is the non-reentrancy guard — no collaborator invoked
/// mid-operation can reach back into the controller. Mutations are staged
/// in memory and written only after every check and the external transfer
/// have succeeded, so a failed operation leaves no state change behind.
pub struct GaugeController {
    db: Arc<StateDb>,
    registry: PositionRegistry,
    engine: RewardAccrualEngine,
    config: GaugeConfig,
    transfer: Arc<dyn AssetTransfer>,
    hook: Option<Arc<dyn RewardsHook>>,
}

impl GaugeController {
    /// Bootstrap a fresh gauge: validate and persist the configuration and
    /// the initial reward schedule.
    pub fn init(
        db: Arc<StateDb>,
        transfer: Arc<dyn AssetTransfer>,
        params: GaugeInit,
    ) -> Result<Self, GaugeError> {
        if db.get_config()?.is_some() {
            return Err(GaugeError::Storage("gauge already initialised".into()));
        }
        if params.admin.is_zero() || params.funding_account.is_zero() {
            return Err(GaugeError::InvalidAddress);
        }
        if params.reward_rate == 0 {
            return Err(GaugeError::InvalidRewardRate);
        }
        if params.reward_end <= params.reward_start {
            return Err(GaugeError::InvalidDuration);
        }

        let config = GaugeConfig {
            asset: params.asset,
            admin: params.admin,
            funding_account: params.funding_account,
        };
        db.put_config(&config)?;
        db.put_reward_state(&RewardState::new(
            params.reward_rate,
            params.reward_start,
            params.reward_end,
        ))?;
        info!(
            asset = %config.asset,
            rate = params.reward_rate,
            start = params.reward_start,
            end = params.reward_end,
            "gauge initialised"
        );
        Ok(Self::assemble(db, transfer, config))
    }

    /// Reopen an initialised gauge. The staked asset must match the stored
    /// configuration.
    pub fn open(
        db: Arc<StateDb>,
        transfer: Arc<dyn AssetTransfer>,
        asset: &str,
    ) -> Result<Self, GaugeError> {
        let config = db
            .get_config()?
            .ok_or_else(|| GaugeError::Storage("gauge not initialised".into()))?;
        if config.asset != asset {
            return Err(GaugeError::InvalidToken {
                expected: asset.to_string(),
                got: config.asset,
            });
        }
        Ok(Self::assemble(db, transfer, config))
    }

    fn assemble(db: Arc<StateDb>, transfer: Arc<dyn AssetTransfer>, config: GaugeConfig) -> Self {
        let registry = PositionRegistry::new(Arc::clone(&db));
        let engine = RewardAccrualEngine::new(Arc::clone(&db));
        Self { db, registry, engine, config, transfer, hook: None }
    }

    fn require_admin(&self, caller: &AccountId) -> Result<(), GaugeError> {
        if *caller != self.config.admin {
            return Err(GaugeError::NotOwner);
        }
        Ok(())
    }

    fn notify(&self, event: GaugeEvent) {
        if let Some(hook) = &self.hook {
            hook.on_event(&event);
        }
    }

    // ── Operations ───────────────────────────────────────────────────────────

    /// Create a position crediting `receiver` with `amount` of locked
    /// principal.
    ///
    /// The staked asset itself is not moved here — custody timing belongs to
    /// the calling integration, which escrows principal around this call.
    pub fn deposit(
        &mut self,
        depositor: &AccountId,
        receiver: &AccountId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<PositionId, GaugeError> {
        if amount == 0 {
            return Err(GaugeError::ZeroAmount);
        }
        if receiver.is_zero() {
            return Err(GaugeError::InvalidAddress);
        }

        // Settle the id about to be created. No record exists for it yet, so
        // only the global half takes effect and the new position starts with
        // zero shares.
        let next = self.db.next_position_id()?;
        let mut settlement = self.engine.settle(Some(next), now)?;
        settlement.state.total_locked = settlement
            .state
            .total_locked
            .checked_add(amount)
            .ok_or(GaugeError::MathOverflow)?;

        let id = self.registry.create(receiver, amount, now)?;
        self.engine.commit(&settlement)?;

        info!(id, %receiver, amount, "position created");
        self.notify(GaugeEvent::DepositCreated {
            id,
            depositor: *depositor,
            receiver: *receiver,
            amount,
            timestamp: now,
        });
        Ok(id)
    }

    /// Close a position: realize its lock duration, settle, release the
    /// principal to `receiver`, and erase the record. The id is never
    /// reissued.
    pub fn withdraw(
        &mut self,
        caller: &AccountId,
        id: PositionId,
        receiver: &AccountId,
        now: Timestamp,
    ) -> Result<(), GaugeError> {
        if !self.registry.allocated(id)? {
            return Err(GaugeError::InvalidPosition(id));
        }
        let mut position = match self.db.get_position(id)? {
            Some(pos) if pos.amount > 0 => pos,
            _ => return Err(GaugeError::ZeroAmount),
        };
        if position.owner != *caller {
            return Err(GaugeError::NotOwner);
        }
        if receiver.is_zero() {
            return Err(GaugeError::InvalidAddress);
        }

        position.unlock_time = now;
        let lock_duration = position.lock_duration()?;

        let mut state = self.engine.load_state()?;
        let mut ledger = self.db.get_ledger(id)?;
        settle_position(&mut state, &mut position, &mut ledger, now)?;

        state.total_shares = state
            .total_shares
            .checked_sub(position.shares)
            .ok_or(GaugeError::MathOverflow)?;
        state.total_locked = state
            .total_locked
            .checked_sub(position.amount)
            .ok_or(GaugeError::MathOverflow)?;

        self.transfer.transfer_out(receiver, position.amount)?;
        self.registry.destroy(id)?;
        self.db.put_reward_state(&state)?;

        info!(id, %receiver, amount = position.amount, lock_duration, "position withdrawn");
        self.notify(GaugeEvent::WithdrawalCompleted {
            id,
            owner: position.owner,
            receiver: *receiver,
            amount: position.amount,
            lock_duration,
            timestamp: now,
        });
        Ok(())
    }

    /// Pay out a position's pending reward to its owner from the funding
    /// account. A zero pending reward settles and returns 0 without a
    /// transfer.
    pub fn claim_rewards(&mut self, id: PositionId, now: Timestamp) -> Result<Amount, GaugeError> {
        let mut settlement = self.engine.settle(Some(id), now)?;
        let (position, ledger) = settlement
            .position
            .as_mut()
            .ok_or(GaugeError::InvalidPosition(id))?;
        let owner = position.owner;

        let paid = ledger.pending_reward;
        if paid > 0 {
            ledger.pending_reward = 0;
            self.transfer
                .transfer_in(&self.config.funding_account, &owner, paid)?;
        }
        self.engine.commit(&settlement)?;

        if paid > 0 {
            info!(id, %owner, amount = paid, "reward paid");
            self.notify(GaugeEvent::RewardPaid { id, owner, amount: paid, timestamp: now });
        } else {
            debug!(id, "claim with no pending reward");
        }
        Ok(paid)
    }

    /// Claim every position held by `owner`, in enumeration order. The id
    /// set is snapshotted at entry; the iteration bound never re-reads.
    pub fn claim_all_rewards(
        &mut self,
        owner: &AccountId,
        now: Timestamp,
    ) -> Result<Amount, GaugeError> {
        let ids = self.registry.positions_of(owner)?;
        let mut total = 0u128;
        for id in ids {
            total = total
                .checked_add(self.claim_rewards(id, now)?)
                .ok_or(GaugeError::MathOverflow)?;
        }
        Ok(total)
    }

    // ── Administration ───────────────────────────────────────────────────────

    /// Replace the reward rate after a global settlement, so accrual up to
    /// `now` is locked in at the old rate.
    pub fn set_reward_rate(
        &mut self,
        caller: &AccountId,
        new_rate: u128,
        now: Timestamp,
    ) -> Result<(), GaugeError> {
        self.require_admin(caller)?;
        if new_rate == 0 {
            return Err(GaugeError::InvalidRewardRate);
        }
        let mut settlement = self.engine.settle(None, now)?;
        let old_rate = settlement.state.reward_rate;
        settlement.state.reward_rate = new_rate;
        self.engine.commit(&settlement)?;

        info!(old_rate, new_rate, "reward rate changed");
        self.notify(GaugeEvent::RewardRateChanged { old_rate, new_rate, timestamp: now });
        Ok(())
    }

    pub fn set_funding_account(
        &mut self,
        caller: &AccountId,
        new_account: &AccountId,
        now: Timestamp,
    ) -> Result<(), GaugeError> {
        self.require_admin(caller)?;
        if new_account.is_zero() {
            return Err(GaugeError::InvalidAddress);
        }
        let old_account = self.config.funding_account;
        self.config.funding_account = *new_account;
        self.db.put_config(&self.config)?;

        info!(%old_account, %new_account, "funding account changed");
        self.notify(GaugeEvent::FundingAccountChanged {
            old_account,
            new_account: *new_account,
            timestamp: now,
        });
        Ok(())
    }

    pub fn set_rewards_hook(
        &mut self,
        caller: &AccountId,
        hook: Arc<dyn RewardsHook>,
    ) -> Result<(), GaugeError> {
        self.require_admin(caller)?;
        self.hook = Some(hook);
        Ok(())
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    pub fn query(&self) -> GaugeQuery<'_> {
        GaugeQuery::new(&self.db)
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }
}
