//! Per-subject vote tallies and recorded ballots.

use ember_types::{TokenAmount, VoterId};
use serde::{Deserialize, Serialize};

/// A yes/no ballot choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteChoice {
    Yes,
    No,
}

impl VoteChoice {
    pub fn opposite(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

impl From<bool> for VoteChoice {
    fn from(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// A voter's recorded ballot for one subject.
///
/// The weight is snapshotted at cast time; flipping sides moves this
/// recorded weight, it never re-queries the stake snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ballot {
    pub voter: VoterId,
    pub choice: VoteChoice,
    pub weight: TokenAmount,
}

/// Accumulated vote totals for one subject.
///
/// Invariant: every voter contributes their full weight to exactly one
/// side, and `total_votes_*` counts distinct voters currently on that side.
/// Created lazily on the first vote for a subject, never deleted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub total_amount_yes: TokenAmount,
    pub total_amount_no: TokenAmount,
    pub total_votes_yes: u64,
    pub total_votes_no: u64,
}

impl VoteTally {
    /// Add a first-time ballot to one side. `None` on accumulator overflow,
    /// with no partial update.
    pub fn record_checked(&mut self, choice: VoteChoice, weight: TokenAmount) -> Option<()> {
        let (amount, votes) = self.side(choice);
        let new_amount = amount.checked_add(weight)?;
        let new_votes = votes.checked_add(1)?;
        self.set_side(choice, new_amount, new_votes);
        Some(())
    }

    /// Move a voter's full recorded weight from `from` to the other side,
    /// amount and count together. All four accumulators are computed before
    /// any is written, so a failure leaves the tally untouched.
    pub fn flip_checked(&mut self, from: VoteChoice, weight: TokenAmount) -> Option<()> {
        let to = from.opposite();
        let (from_amount, from_votes) = self.side(from);
        let (to_amount, to_votes) = self.side(to);
        let new_from_amount = from_amount.checked_sub(weight)?;
        let new_from_votes = from_votes.checked_sub(1)?;
        let new_to_amount = to_amount.checked_add(weight)?;
        let new_to_votes = to_votes.checked_add(1)?;
        self.set_side(from, new_from_amount, new_from_votes);
        self.set_side(to, new_to_amount, new_to_votes);
        Some(())
    }

    /// The proposal passes iff weighted yes strictly exceeds weighted no.
    /// Ties (including all-zero) do not pass.
    pub fn passes(&self) -> bool {
        self.total_amount_yes > self.total_amount_no
    }

    fn side(&self, choice: VoteChoice) -> (TokenAmount, u64) {
        match choice {
            VoteChoice::Yes => (self.total_amount_yes, self.total_votes_yes),
            VoteChoice::No => (self.total_amount_no, self.total_votes_no),
        }
    }

    fn set_side(&mut self, choice: VoteChoice, amount: TokenAmount, votes: u64) {
        match choice {
            VoteChoice::Yes => {
                self.total_amount_yes = amount;
                self.total_votes_yes = votes;
            }
            VoteChoice::No => {
                self.total_amount_no = amount;
                self.total_votes_no = votes;
            }
        }
    }
}
