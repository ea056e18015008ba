//! Immutable redemption receipts.

use ember_types::{Principal, StxAmount, TokenAmount};
use serde::{Deserialize, Serialize};

/// Record of one successful redemption. Produced once, never mutated.
///
/// `v1_burned` and `v2_burned` report how much of the burn was drawn from
/// each generation, both in micro-units (the V1 draw is reported scaled),
/// and always sum to `total_burned`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionReceipt {
    pub holder: Principal,
    pub payout: StxAmount,
    pub total_burned: TokenAmount,
    pub v1_burned: TokenAmount,
    pub v2_burned: TokenAmount,
}
