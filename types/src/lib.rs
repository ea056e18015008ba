//! Fundamental types for the Ember wind-down protocol.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: principals, subject/voter identifiers, token and payout
//! amounts, and the protocol parameters.

pub mod address;
pub mod amount;
pub mod id;
pub mod params;

pub use address::Principal;
pub use amount::{StxAmount, TokenAmount, MICRO_PER_TOKEN};
pub use id::{SubjectId, VoterId};
pub use params::ProtocolParams;
