//! gaugex-pool
//!
//! The public operation surface of the gauge: the controller orchestrating
//! settlement, registry mutation, asset transfer, and notification, plus the
//! boundary capabilities (asset transfer, rewards hook) and read accessors.

pub mod controller;
pub mod hook;
pub mod query;
pub mod transfer;

pub use controller::{GaugeController, GaugeInit};
pub use hook::RewardsHook;
pub use query::GaugeQuery;
pub use transfer::{AssetTransfer, MemoryVault};
