//! Per-holder redeemable balances.

use serde::{Deserialize, Serialize};

/// A holder's burnable balances, split by token generation.
///
/// `balance_v1` counts whole V1 tokens (the legacy generation's smallest
/// unit); `balance_v2` counts micro-units. Both only ever decrease over the
/// redemption window, except that a V1 draw's sub-token change is credited
/// to `balance_v2` — V1 value may flow into V2, never the reverse.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionAccount {
    pub balance_v1: u128,
    pub balance_v2: u128,
}

impl RedemptionAccount {
    pub fn new(balance_v1: u128, balance_v2: u128) -> Self {
        Self {
            balance_v1,
            balance_v2,
        }
    }

    /// Combined balance in micro-units, with V1 scaled up.
    pub fn combined_micro(&self, v1_scale: u128) -> Option<u128> {
        self.balance_v1
            .checked_mul(v1_scale)?
            .checked_add(self.balance_v2)
    }

    pub fn is_empty(&self) -> bool {
        self.balance_v1 == 0 && self.balance_v2 == 0
    }
}
