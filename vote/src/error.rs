//! Vote-gate errors and their wire codes.

use ember_types::{Principal, VoterId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoteError {
    #[error("{0} has already voted with the same choice")]
    VotedAlready(VoterId),

    #[error("voter has nothing stacked in the snapshot")]
    NothingStacked,

    #[error("principal {0} not found in the voter registry")]
    UserNotFound(Principal),

    #[error("vote failed: weighted yes does not exceed weighted no")]
    VoteFailed,

    #[error("arithmetic overflow in vote tally")]
    Overflow,

    #[error("{0}")]
    Other(String),
}

impl VoteError {
    /// Stable numeric failure code reported at the call boundary.
    pub fn code(&self) -> u32 {
        match self {
            Self::Other(_) => 26_000,
            Self::Overflow => 26_001,
            Self::VotedAlready(_) => 26_002,
            Self::NothingStacked => 26_003,
            Self::UserNotFound(_) => 26_004,
            Self::VoteFailed => 26_007,
        }
    }
}
