use std::sync::Arc;

use gaugex_core::error::GaugeError;
use gaugex_core::position::Position;
use gaugex_core::types::{AccountId, Amount, PositionId, Timestamp};

use crate::db::StateDb;

/// Owns the set of positions: dense id allocation from 1 (ids are never
/// reused — the allocator counter only moves forward), per-id record
/// storage, the ownership index, and enumeration by owner.
pub struct PositionRegistry {
    db: Arc<StateDb>,
}

impl PositionRegistry {
    pub fn new(db: Arc<StateDb>) -> Self {
        Self { db }
    }

    /// Allocate the next id and store a fresh position for `owner`.
    ///
    /// Shares and boost factor start zeroed; they are derived by the first
    /// settlement that touches the record. A zero amount is the caller's
    /// responsibility to reject — the registry does not re-check it.
    pub fn create(
        &self,
        owner: &AccountId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<PositionId, GaugeError> {
        let id = self.db.next_position_id()?;
        let position = Position::new(id, *owner, amount, now);
        self.db.put_position(&position)?;
        self.db.index_owner(owner, id)?;
        self.db.put_next_position_id(id + 1)?;
        Ok(id)
    }

    /// Erase a position record, its ownership entry, and its reward ledger.
    /// The id remains allocated and is never reassigned.
    pub fn destroy(&self, id: PositionId) -> Result<(), GaugeError> {
        let position = self.get(id)?;
        self.db.remove_position(id)?;
        self.db.deindex_owner(&position.owner, id)?;
        self.db.remove_ledger(id)?;
        Ok(())
    }

    /// True if `id` has ever been assigned.
    pub fn allocated(&self, id: PositionId) -> Result<bool, GaugeError> {
        Ok(id >= 1 && id < self.db.next_position_id()?)
    }

    /// Fetch a live record. A destroyed or zero-amount position is absent.
    pub fn get(&self, id: PositionId) -> Result<Position, GaugeError> {
        match self.db.get_position(id)? {
            Some(pos) if pos.amount > 0 => Ok(pos),
            _ => Err(GaugeError::InvalidPosition(id)),
        }
    }

    /// Direct update of a live record. The owner field must not change
    /// through this path; ownership transfer is a separate capability.
    pub fn set(&self, position: &Position) -> Result<(), GaugeError> {
        self.get(position.id)?;
        self.db.put_position(position)
    }

    pub fn owner_of(&self, id: PositionId) -> Result<AccountId, GaugeError> {
        Ok(self.get(id)?.owner)
    }

    /// Ids held by `owner` in registry-internal (insertion) order.
    /// Restartable per call — the returned set is a snapshot, not a cursor.
    pub fn positions_of(&self, owner: &AccountId) -> Result<Vec<PositionId>, GaugeError> {
        self.db.positions_of(owner)
    }

    pub fn count_of(&self, owner: &AccountId) -> Result<u64, GaugeError> {
        Ok(self.db.positions_of(owner)?.len() as u64)
    }

    /// Number of live positions across all owners.
    pub fn total_positions(&self) -> u64 {
        self.db.live_positions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct TempDb {
        path: PathBuf,
    }

    impl Drop for TempDb {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    // The guard comes first in the tuple so it drops last, after the
    // registry has released the database.
    fn open_temp(tag: &str) -> (TempDb, PositionRegistry) {
        let path = std::env::temp_dir().join(format!(
            "gaugex_registry_{}_{}",
            tag,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&path);
        let db = Arc::new(StateDb::open(&path).expect("open temp db"));
        (TempDb { path }, PositionRegistry::new(db))
    }

    fn acct(tag: u8) -> AccountId {
        AccountId::from_bytes([tag; 32])
    }

    #[test]
    fn ids_are_dense_from_one() {
        let (_guard, registry) = open_temp("dense_ids");
        let alice = acct(1);
        assert_eq!(registry.create(&alice, 100, 10).unwrap(), 1);
        assert_eq!(registry.create(&alice, 200, 11).unwrap(), 2);
        assert_eq!(registry.create(&alice, 300, 12).unwrap(), 3);
        assert_eq!(registry.total_positions(), 3);
    }

    #[test]
    fn destroyed_ids_are_never_reassigned() {
        let (_guard, registry) = open_temp("no_reuse");
        let alice = acct(1);
        let first = registry.create(&alice, 100, 10).unwrap();
        registry.destroy(first).unwrap();
        let second = registry.create(&alice, 100, 20).unwrap();
        assert_eq!(second, first + 1, "a destroyed id must not be reissued");
        assert!(matches!(
            registry.get(first),
            Err(GaugeError::InvalidPosition(_))
        ));
    }

    #[test]
    fn enumeration_is_per_owner_in_insertion_order() {
        let (_guard, registry) = open_temp("enumeration");
        let alice = acct(1);
        let bob = acct(2);
        let a1 = registry.create(&alice, 100, 10).unwrap();
        let b1 = registry.create(&bob, 100, 10).unwrap();
        let a2 = registry.create(&alice, 100, 11).unwrap();

        assert_eq!(registry.positions_of(&alice).unwrap(), vec![a1, a2]);
        assert_eq!(registry.positions_of(&bob).unwrap(), vec![b1]);
        assert_eq!(registry.count_of(&alice).unwrap(), 2);
        assert_eq!(registry.count_of(&bob).unwrap(), 1);
    }

    #[test]
    fn destroy_erases_record_and_ownership() {
        let (_guard, registry) = open_temp("destroy");
        let alice = acct(1);
        let id = registry.create(&alice, 100, 10).unwrap();
        registry.destroy(id).unwrap();

        assert!(registry.positions_of(&alice).unwrap().is_empty());
        assert_eq!(registry.total_positions(), 0);
        assert!(matches!(
            registry.owner_of(id),
            Err(GaugeError::InvalidPosition(_))
        ));
        // Allocated range still covers the erased id.
        assert!(registry.allocated(id).unwrap());
    }

    #[test]
    fn set_updates_a_live_record() {
        let (_guard, registry) = open_temp("set");
        let alice = acct(1);
        let id = registry.create(&alice, 100, 10).unwrap();
        let mut pos = registry.get(id).unwrap();
        pos.unlock_time = 99;
        registry.set(&pos).unwrap();
        assert_eq!(registry.get(id).unwrap().unlock_time, 99);
    }

    #[test]
    fn lookups_outside_the_allocated_range_fail() {
        let (_guard, registry) = open_temp("range");
        assert!(!registry.allocated(0).unwrap());
        assert!(!registry.allocated(1).unwrap());
        assert!(matches!(
            registry.owner_of(7),
            Err(GaugeError::InvalidPosition(7))
        ));
    }
}
