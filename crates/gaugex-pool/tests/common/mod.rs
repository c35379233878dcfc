//! Shared harness for gauge integration tests: a throwaway sled database,
//! an in-memory vault, and a bootstrapped controller.
#![allow(dead_code)] // not every test binary touches every helper

use std::path::PathBuf;
use std::sync::Arc;

use gaugex_core::types::{AccountId, Timestamp};
use gaugex_pool::{AssetTransfer, GaugeController, GaugeInit, MemoryVault};
use gaugex_state::StateDb;

pub fn acct(tag: u8) -> AccountId {
    AccountId::from_bytes([tag; 32])
}

pub fn admin() -> AccountId {
    acct(0xA0)
}

pub fn funding() -> AccountId {
    acct(0xF0)
}

pub fn custody() -> AccountId {
    acct(0xC0)
}

pub struct TempDir {
    path: PathBuf,
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Field order matters: the database handles must close before `_guard`
/// removes the directory underneath them.
pub struct TestGauge {
    pub controller: GaugeController,
    pub vault: Arc<MemoryVault>,
    pub db: Arc<StateDb>,
    _guard: TempDir,
}

/// Open a fresh gauge under a unique temp directory.
pub fn setup(tag: &str, rate: u128, start: Timestamp, end: Timestamp) -> TestGauge {
    let path = std::env::temp_dir().join(format!("gaugex_pool_{}_{}", tag, std::process::id()));
    let _ = std::fs::remove_dir_all(&path);
    let db = Arc::new(StateDb::open(&path).expect("open temp db"));
    let vault = Arc::new(MemoryVault::new(custody()));
    let controller = GaugeController::init(
        Arc::clone(&db),
        Arc::clone(&vault) as Arc<dyn AssetTransfer>,
        GaugeInit {
            asset: "GGX".into(),
            admin: admin(),
            funding_account: funding(),
            reward_rate: rate,
            reward_start: start,
            reward_end: end,
        },
    )
    .expect("init gauge");
    TestGauge { controller, vault, db, _guard: TempDir { path } }
}
