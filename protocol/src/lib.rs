//! Typed operation dispatch for the wind-down.
//!
//! The surrounding system issues discrete calls against the vote gate, the
//! execution authorizer, and the redemption ledger. Here those calls are a
//! closed enumeration of typed operations dispatched through a single apply
//! loop: strictly sequential, each call all-or-nothing, every failure a
//! stable numeric code.

pub mod coordinator;
pub mod error;
pub mod op;

pub use coordinator::Coordinator;
pub use error::OpError;
pub use op::{Op, OpOutcome};
