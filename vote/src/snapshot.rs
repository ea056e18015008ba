//! The stake-snapshot seam.
//!
//! Voting weight is derived from staked token amounts at proposal-snapshot
//! time, supplied by the chain the token lives on. The engine only sees the
//! `StakeWeightProvider` trait; `StakeSnapshot` is the shipped
//! implementation, buildable in code or loadable from a JSON fixture.

use ember_types::{Principal, TokenAmount, VoterId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// External source of voter identities and stake weights.
pub trait StakeWeightProvider {
    /// Resolve a principal to its registry-assigned voter id.
    fn voter_id(&self, principal: &Principal) -> Option<VoterId>;

    /// The voter's stake weight at snapshot time, if any.
    fn weight_of(&self, voter: VoterId) -> Option<TokenAmount>;

    /// Read-only weighted-vote helper: the voter's weight in natural units,
    /// or multiplied by `scale_factor` for display-precision reads.
    ///
    /// Exact integer arithmetic throughout; scaled values exceed 10^27 at
    /// observed stake sizes, so the result stays in u128.
    fn weighted_vote(&self, voter: VoterId, scaled: bool, scale_factor: u128) -> Option<u128> {
        let weight = self.weight_of(voter)?;
        if scaled {
            weight.raw().checked_mul(scale_factor)
        } else {
            Some(weight.raw())
        }
    }
}

/// One snapshot row: who, their registry id, and their staked weight.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub principal: Principal,
    pub voter_id: VoterId,
    pub weight: TokenAmount,
}

/// An immutable stake snapshot: principal registry plus per-voter weights.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StakeSnapshot {
    registry: HashMap<Principal, VoterId>,
    weights: HashMap<VoterId, TokenAmount>,
}

impl StakeSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a voter in the snapshot. A zero weight registers the identity
    /// without any voting power (the vote gate rejects such voters).
    pub fn register(&mut self, principal: Principal, voter: VoterId, weight: TokenAmount) {
        self.registry.insert(principal, voter);
        self.weights.insert(voter, weight);
    }

    pub fn from_entries(entries: impl IntoIterator<Item = SnapshotEntry>) -> Self {
        let mut snapshot = Self::new();
        for entry in entries {
            snapshot.register(entry.principal, entry.voter_id, entry.weight);
        }
        snapshot
    }

    /// Load a snapshot from a JSON array of entries, the fixture format
    /// produced by the snapshot exporter.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<SnapshotEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

impl StakeWeightProvider for StakeSnapshot {
    fn voter_id(&self, principal: &Principal) -> Option<VoterId> {
        self.registry.get(principal).copied()
    }

    fn weight_of(&self, voter: VoterId) -> Option<TokenAmount> {
        self.weights.get(&voter).copied()
    }
}
