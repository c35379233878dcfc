use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use gaugex_core::error::GaugeError;
use gaugex_core::types::{AccountId, Amount};

/// Movement of the underlying asset between accounts. Injected at
/// construction; the gauge never touches balances directly.
///
/// Implementations must fail loudly — a short transfer aborts the enclosing
/// operation rather than silently moving less.
pub trait AssetTransfer: Send + Sync {
    fn transfer_in(&self, from: &AccountId, to: &AccountId, amount: Amount)
        -> Result<(), GaugeError>;
    fn transfer_out(&self, to: &AccountId, amount: Amount) -> Result<(), GaugeError>;
    fn balance_of(&self, account: &AccountId) -> Amount;
}

// ── MemoryVault ──────────────────────────────────────────────────────────────

/// In-memory reference ledger with a designated custody account.
/// `transfer_out` draws from custody; `transfer_in` moves between arbitrary
/// accounts. Intended for tests and local runs.
pub struct MemoryVault {
    custody: AccountId,
    balances: Mutex<HashMap<AccountId, Amount>>,
}

impl MemoryVault {
    pub fn new(custody: AccountId) -> Self {
        Self { custody, balances: Mutex::new(HashMap::new()) }
    }

    fn balances(&self) -> MutexGuard<'_, HashMap<AccountId, Amount>> {
        self.balances.lock().expect("vault lock poisoned")
    }

    /// Credit an account out of thin air. Test/tooling convenience.
    pub fn credit(&self, account: &AccountId, amount: Amount) {
        *self.balances().entry(*account).or_insert(0) += amount;
    }

    fn debit(
        balances: &mut HashMap<AccountId, Amount>,
        from: &AccountId,
        amount: Amount,
    ) -> Result<(), GaugeError> {
        let have = balances.get(from).copied().unwrap_or(0);
        if have < amount {
            return Err(GaugeError::InvalidBalance { need: amount, have });
        }
        balances.insert(*from, have - amount);
        Ok(())
    }
}

impl AssetTransfer for MemoryVault {
    fn transfer_in(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), GaugeError> {
        let mut balances = self.balances();
        Self::debit(&mut balances, from, amount)?;
        *balances.entry(*to).or_insert(0) += amount;
        Ok(())
    }

    fn transfer_out(&self, to: &AccountId, amount: Amount) -> Result<(), GaugeError> {
        let mut balances = self.balances();
        Self::debit(&mut balances, &self.custody, amount)?;
        *balances.entry(*to).or_insert(0) += amount;
        Ok(())
    }

    fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances().get(account).copied().unwrap_or(0)
    }
}
