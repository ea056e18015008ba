//! Migration vote gate.
//!
//! Holders vote yes/no on a migration subject, weighted by an external
//! stake snapshot taken at proposal time. The engine accumulates per-subject
//! tallies, lets a voter flip sides (moving their full recorded weight
//! atomically), and exposes the executability predicate: the proposal
//! passes iff weighted yes strictly exceeds weighted no.

pub mod engine;
pub mod error;
pub mod snapshot;
pub mod tally;

pub use engine::VoteEngine;
pub use error::VoteError;
pub use snapshot::{StakeSnapshot, StakeWeightProvider};
pub use tally::{Ballot, VoteChoice, VoteTally};
