//! Execution authorizer.
//!
//! A fixed set of signers approves a subject's proposal for execution.
//! When the approval count first reaches the configured threshold, a
//! one-shot `authorized` flag becomes permanently true — the only gate the
//! redemption ledger consults before unlocking.

pub mod authorizer;
pub mod error;

pub use authorizer::{ApprovalState, ExecutionAuthorizer};
pub use error::AuthorizerError;
