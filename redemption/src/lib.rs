//! Burn-to-exit redemption ledger.
//!
//! Once the migration vote has passed and the signers have authorized
//! execution, holders permanently burn their tokens in exchange for a fixed
//! payout from a shared treasury. Balances are split by token generation:
//! legacy V1 (whole-token granularity) and current V2 (micro-token
//! granularity). V1 converts into V2 units at a fixed scale, redemptions pay
//! out at an exact integer ratio, and every call is capped per transaction.

pub mod account;
pub mod error;
pub mod ledger;
pub mod receipt;

pub use account::RedemptionAccount;
pub use error::RedemptionError;
pub use ledger::{LedgerStatus, RedemptionLedger};
pub use receipt::RedemptionReceipt;
