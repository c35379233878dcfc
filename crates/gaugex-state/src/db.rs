use gaugex_core::error::GaugeError;
use gaugex_core::position::{GaugeConfig, Position, RewardLedger, RewardState};
use gaugex_core::types::{AccountId, PositionId};
use std::path::Path;

const META_REWARD_STATE: &str = "reward_state";
const META_CONFIG: &str = "config";
const META_NEXT_POSITION_ID: &str = "next_position_id";

/// Persistent gauge state backed by sled (pure-Rust, no C dependencies).
///
/// Named trees (analogous to column families):
///   positions    — PositionId BE bytes            → bincode(Position)
///   owner_index  — owner bytes ++ PositionId BE   → [] (membership set)
///   ledgers      — PositionId BE bytes            → bincode(RewardLedger)
///   meta         — utf8 key bytes                 → bincode records / raw bytes
///
/// Position keys are big-endian so owner-prefix scans return ids in
/// ascending (insertion) order.
pub struct StateDb {
    _db: sled::Db,
    positions: sled::Tree,
    owner_index: sled::Tree,
    ledgers: sled::Tree,
    meta: sled::Tree,
}

fn storage_err(e: sled::Error) -> GaugeError {
    GaugeError::Storage(e.to_string())
}

fn owner_key(owner: &AccountId, id: PositionId) -> [u8; 40] {
    let mut key = [0u8; 40];
    key[..32].copy_from_slice(owner.as_bytes());
    key[32..].copy_from_slice(&id.to_be_bytes());
    key
}

impl StateDb {
    /// Open or create the gauge database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GaugeError> {
        let db = sled::open(path).map_err(storage_err)?;
        let positions = db.open_tree("positions").map_err(storage_err)?;
        let owner_index = db.open_tree("owner_index").map_err(storage_err)?;
        let ledgers = db.open_tree("ledgers").map_err(storage_err)?;
        let meta = db.open_tree("meta").map_err(storage_err)?;
        Ok(Self { _db: db, positions, owner_index, ledgers, meta })
    }

    // ── Positions ────────────────────────────────────────────────────────────

    pub fn get_position(&self, id: PositionId) -> Result<Option<Position>, GaugeError> {
        match self.positions.get(id.to_be_bytes()).map_err(storage_err)? {
            Some(bytes) => {
                let pos = bincode::deserialize(&bytes)
                    .map_err(|e| GaugeError::Serialization(e.to_string()))?;
                Ok(Some(pos))
            }
            None => Ok(None),
        }
    }

    pub fn put_position(&self, position: &Position) -> Result<(), GaugeError> {
        let bytes = bincode::serialize(position)
            .map_err(|e| GaugeError::Serialization(e.to_string()))?;
        self.positions
            .insert(position.id.to_be_bytes(), bytes)
            .map_err(storage_err)?;
        Ok(())
    }

    pub fn remove_position(&self, id: PositionId) -> Result<(), GaugeError> {
        self.positions.remove(id.to_be_bytes()).map_err(storage_err)?;
        Ok(())
    }

    /// Number of live position records.
    pub fn live_positions(&self) -> u64 {
        self.positions.len() as u64
    }

    // ── Owner index ──────────────────────────────────────────────────────────

    pub fn index_owner(&self, owner: &AccountId, id: PositionId) -> Result<(), GaugeError> {
        self.owner_index
            .insert(owner_key(owner, id), b"".as_ref())
            .map_err(storage_err)?;
        Ok(())
    }

    pub fn deindex_owner(&self, owner: &AccountId, id: PositionId) -> Result<(), GaugeError> {
        self.owner_index
            .remove(owner_key(owner, id))
            .map_err(storage_err)?;
        Ok(())
    }

    /// All position ids held by `owner`, ascending.
    pub fn positions_of(&self, owner: &AccountId) -> Result<Vec<PositionId>, GaugeError> {
        let mut ids = Vec::new();
        for item in self.owner_index.scan_prefix(owner.as_bytes()) {
            let (key, _) = item.map_err(storage_err)?;
            let mut arr = [0u8; 8];
            arr.copy_from_slice(&key[32..40]);
            ids.push(PositionId::from_be_bytes(arr));
        }
        Ok(ids)
    }

    // ── Reward ledgers ───────────────────────────────────────────────────────

    /// Per-position accrual cache. Absent entries read as zeroed.
    pub fn get_ledger(&self, id: PositionId) -> Result<RewardLedger, GaugeError> {
        match self.ledgers.get(id.to_be_bytes()).map_err(storage_err)? {
            Some(bytes) => bincode::deserialize(&bytes)
                .map_err(|e| GaugeError::Serialization(e.to_string())),
            None => Ok(RewardLedger::default()),
        }
    }

    pub fn put_ledger(&self, id: PositionId, ledger: &RewardLedger) -> Result<(), GaugeError> {
        let bytes = bincode::serialize(ledger)
            .map_err(|e| GaugeError::Serialization(e.to_string()))?;
        self.ledgers.insert(id.to_be_bytes(), bytes).map_err(storage_err)?;
        Ok(())
    }

    pub fn remove_ledger(&self, id: PositionId) -> Result<(), GaugeError> {
        self.ledgers.remove(id.to_be_bytes()).map_err(storage_err)?;
        Ok(())
    }

    // ── Reward state ─────────────────────────────────────────────────────────

    pub fn get_reward_state(&self) -> Result<Option<RewardState>, GaugeError> {
        match self.meta.get(META_REWARD_STATE).map_err(storage_err)? {
            Some(bytes) => {
                let state = bincode::deserialize(&bytes)
                    .map_err(|e| GaugeError::Serialization(e.to_string()))?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    pub fn put_reward_state(&self, state: &RewardState) -> Result<(), GaugeError> {
        let bytes = bincode::serialize(state)
            .map_err(|e| GaugeError::Serialization(e.to_string()))?;
        self.meta.insert(META_REWARD_STATE, bytes).map_err(storage_err)?;
        Ok(())
    }

    // ── Config ───────────────────────────────────────────────────────────────

    pub fn get_config(&self) -> Result<Option<GaugeConfig>, GaugeError> {
        match self.meta.get(META_CONFIG).map_err(storage_err)? {
            Some(bytes) => {
                let config = bincode::deserialize(&bytes)
                    .map_err(|e| GaugeError::Serialization(e.to_string()))?;
                Ok(Some(config))
            }
            None => Ok(None),
        }
    }

    pub fn put_config(&self, config: &GaugeConfig) -> Result<(), GaugeError> {
        let bytes = bincode::serialize(config)
            .map_err(|e| GaugeError::Serialization(e.to_string()))?;
        self.meta.insert(META_CONFIG, bytes).map_err(storage_err)?;
        Ok(())
    }

    // ── Id allocation ────────────────────────────────────────────────────────

    /// Next id to assign. Starts at 1 on a fresh database.
    pub fn next_position_id(&self) -> Result<PositionId, GaugeError> {
        match self.meta.get(META_NEXT_POSITION_ID).map_err(storage_err)? {
            Some(bytes) => {
                let mut arr = [0u8; 8];
                arr.copy_from_slice(&bytes);
                Ok(PositionId::from_be_bytes(arr))
            }
            None => Ok(1),
        }
    }

    pub fn put_next_position_id(&self, id: PositionId) -> Result<(), GaugeError> {
        self.meta
            .insert(META_NEXT_POSITION_ID, id.to_be_bytes().to_vec())
            .map_err(storage_err)?;
        Ok(())
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), GaugeError> {
        self._db.flush().map_err(storage_err)?;
        Ok(())
    }
}
