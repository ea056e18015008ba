//! Protocol parameters for the wind-down.
//!
//! Every numeric rule of the vote and the redemption reads from this struct,
//! never from a literal at the call site. Defaults are the ratified mainnet
//! values.

use crate::amount::MICRO_PER_TOKEN;
use serde::{Deserialize, Serialize};

/// All parameters governing the migration vote and the redemption window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParams {
    // ── Redemption ───────────────────────────────────────────────────────
    /// Payout ratio numerator: micro-STX paid per `redemption_rate_den`
    /// micro-tokens burned. The ratio is applied as an exact integer
    /// multiply-then-divide with truncation toward zero.
    pub redemption_rate_num: u128,

    /// Payout ratio denominator.
    pub redemption_rate_den: u128,

    /// Micro-units credited per whole V1 token on conversion.
    pub v1_scale: u128,

    /// Maximum micro-token amount accepted by a single redemption call,
    /// independent of the holder's balance.
    pub max_redemption_per_tx: u128,

    // ── Voting ───────────────────────────────────────────────────────────
    /// Multiplier applied to a voter's raw weight for display-precision
    /// reads. Scaled weights exceed 10^27 at observed stake sizes.
    pub vote_scale_factor: u128,

    // ── Execution ────────────────────────────────────────────────────────
    /// Distinct signer approvals required before the proposal executes.
    pub execution_threshold: u32,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            // 1,700 STX per 1,000,000 tokens (0.0017 STX per token).
            redemption_rate_num: 1_700,
            redemption_rate_den: 1_000_000,
            v1_scale: MICRO_PER_TOKEN,
            // 10,000,000 whole tokens, expressed in micro-units.
            max_redemption_per_tx: 10_000_000 * MICRO_PER_TOKEN,
            vote_scale_factor: 10_u128.pow(16),
            execution_threshold: 3,
        }
    }
}
