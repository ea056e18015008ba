//! Abstract storage traits for Ember state snapshots.
//!
//! Every storage backend (an embedded KV store, or the in-memory store used
//! in tests) implements these traits. Engine crates depend only on the
//! traits and serialize their own state into opaque byte values, so the
//! store layer never depends on engine types.

pub mod authorizer;
pub mod error;
pub mod memory;
pub mod redemption;
pub mod vote;

pub use authorizer::AuthorizerStore;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use redemption::RedemptionStore;
pub use vote::VoteStore;
