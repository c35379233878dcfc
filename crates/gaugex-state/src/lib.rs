pub mod db;
pub mod engine;
pub mod registry;

pub use db::StateDb;
pub use engine::{
    accrual_clock, current_reward_per_share, earned_amount, remaining_budget, settle_global,
    settle_position, RewardAccrualEngine, Settlement,
};
pub use registry::PositionRegistry;
