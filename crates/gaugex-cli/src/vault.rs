use std::path::Path;

use gaugex_core::error::GaugeError;
use gaugex_core::types::{AccountId, Amount};
use gaugex_pool::AssetTransfer;

fn storage_err(e: sled::Error) -> GaugeError {
    GaugeError::Storage(e.to_string())
}

/// Sled-backed demo ledger so CLI flows run end to end locally. Balances are
/// 16-byte big-endian u128 values; `transfer_out` draws from the custody
/// account.
pub struct SledVault {
    _db: sled::Db,
    balances: sled::Tree,
    custody: AccountId,
}

impl SledVault {
    pub fn open<P: AsRef<Path>>(path: P, custody: AccountId) -> Result<Self, GaugeError> {
        let db = sled::open(path).map_err(storage_err)?;
        let balances = db.open_tree("balances").map_err(storage_err)?;
        Ok(Self { _db: db, balances, custody })
    }

    pub fn custody(&self) -> &AccountId {
        &self.custody
    }

    fn balance(&self, account: &AccountId) -> Result<Amount, GaugeError> {
        match self.balances.get(account.as_bytes()).map_err(storage_err)? {
            Some(bytes) => {
                let mut arr = [0u8; 16];
                arr.copy_from_slice(&bytes);
                Ok(Amount::from_be_bytes(arr))
            }
            None => Ok(0),
        }
    }

    fn set_balance(&self, account: &AccountId, amount: Amount) -> Result<(), GaugeError> {
        self.balances
            .insert(account.as_bytes(), amount.to_be_bytes().to_vec())
            .map_err(storage_err)?;
        Ok(())
    }

    /// Credit an account out of thin air. Returns the new balance.
    pub fn credit(&self, account: &AccountId, amount: Amount) -> Result<Amount, GaugeError> {
        let new = self
            .balance(account)?
            .checked_add(amount)
            .ok_or(GaugeError::MathOverflow)?;
        self.set_balance(account, new)?;
        Ok(new)
    }

    fn debit(&self, account: &AccountId, amount: Amount) -> Result<(), GaugeError> {
        let have = self.balance(account)?;
        if have < amount {
            return Err(GaugeError::InvalidBalance { need: amount, have });
        }
        self.set_balance(account, have - amount)
    }
}

impl AssetTransfer for SledVault {
    fn transfer_in(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), GaugeError> {
        self.debit(from, amount)?;
        let new = self
            .balance(to)?
            .checked_add(amount)
            .ok_or(GaugeError::MathOverflow)?;
        self.set_balance(to, new)
    }

    fn transfer_out(&self, to: &AccountId, amount: Amount) -> Result<(), GaugeError> {
        let custody = self.custody;
        self.transfer_in(&custody, to, amount)
    }

    fn balance_of(&self, account: &AccountId) -> Amount {
        self.balance(account).unwrap_or(0)
    }
}
