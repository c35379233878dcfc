use thiserror::Error;

use crate::types::PositionId;

#[derive(Debug, Error)]
pub enum GaugeError {
    // ── Caller input / authorization ─────────────────────────────────────────
    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("insufficient balance: need {need}, have {have}")]
    InvalidBalance { need: u128, have: u128 },

    #[error("staked asset mismatch: expected {expected}, got {got}")]
    InvalidToken { expected: String, got: String },

    #[error("reward rate must be nonzero")]
    InvalidRewardRate,

    #[error("lock duration outside the boost tier range")]
    InvalidDuration,

    #[error("unknown position: {0}")]
    InvalidPosition(PositionId),

    #[error("caller is not the position owner")]
    NotOwner,

    #[error("position has not reached its unlock time")]
    NotUnlocked,

    #[error("account must not be the null address")]
    InvalidAddress,

    // ── Arithmetic ───────────────────────────────────────────────────────────
    #[error("arithmetic overflow in reward accounting")]
    MathOverflow,

    // ── Serialization / storage ──────────────────────────────────────────────
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(String),
}
