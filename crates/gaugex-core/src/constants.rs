/// ─── Gaugex Protocol Constants ──────────────────────────────────────────────
///
/// Reward accounting runs on scaled integers throughout: the accumulator
/// carries reward-per-share × REWARD_SCALE, and division truncates toward
/// zero. Truncation dust is forfeited — conservation is approximate.

// ── Fixed point ──────────────────────────────────────────────────────────────

/// Scale factor for the reward-per-share accumulator.
pub const REWARD_SCALE: u128 = 1_000_000_000_000;

// ── Boost tiers ──────────────────────────────────────────────────────────────

/// Tier months are 30 days flat; calendar months are not consulted.
pub const SECONDS_PER_MONTH: i64 = 30 * 24 * 3600;

pub const TIER_1_MONTH: i64 = SECONDS_PER_MONTH;
pub const TIER_3_MONTHS: i64 = 3 * SECONDS_PER_MONTH;
pub const TIER_6_MONTHS: i64 = 6 * SECONDS_PER_MONTH;
pub const TIER_12_MONTHS: i64 = 12 * SECONDS_PER_MONTH;
pub const TIER_24_MONTHS: i64 = 24 * SECONDS_PER_MONTH;
pub const TIER_48_MONTHS: i64 = 48 * SECONDS_PER_MONTH;

/// Boost multipliers are percentages: 100 = 1.0×.
pub const BOOST_BASE: u64 = 100;
pub const BOOST_1_MONTH: u64 = 110;
pub const BOOST_3_MONTHS: u64 = 120;
pub const BOOST_6_MONTHS: u64 = 130;
pub const BOOST_12_MONTHS: u64 = 140;
pub const BOOST_24_MONTHS: u64 = 150;
pub const BOOST_48_MONTHS: u64 = 160;
