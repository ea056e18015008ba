//! Redemption-ledger errors and their wire codes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RedemptionError {
    #[error("nothing to convert: holder has no V1 balance")]
    NothingToConvert,

    #[error("redemption is not active")]
    NotActive,

    #[error("subject has not been authorized for execution")]
    NotAuthorized,

    #[error("nothing to redeem: holder has no remaining balance")]
    NothingToRedeem,

    #[error("requested {requested} exceeds per-tx cap {cap}")]
    ExceedsMaxPerTx { requested: u128, cap: u128 },

    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u128, available: u128 },

    #[error("treasury shortfall: payout {needed} exceeds remaining {available}")]
    TreasuryShortfall { needed: u128, available: u128 },

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("arithmetic overflow in redemption computation")]
    Overflow,

    #[error("{0}")]
    Other(String),
}

impl RedemptionError {
    /// Stable numeric failure code reported at the call boundary.
    pub fn code(&self) -> u32 {
        match self {
            Self::NothingToConvert => 2_003,
            Self::Other(_) => 13_000,
            Self::Overflow => 13_001,
            Self::NotActive => 13_005,
            Self::NotAuthorized => 13_006,
            Self::NothingToRedeem => 13_007,
            Self::ExceedsMaxPerTx { .. } => 13_008,
            Self::InsufficientBalance { .. } => 13_009,
            Self::TreasuryShortfall { .. } => 13_010,
            Self::ZeroAmount => 13_011,
        }
    }
}
