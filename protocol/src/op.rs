//! The closed set of boundary operations.

use ember_redemption::RedemptionReceipt;
use ember_types::{Principal, SubjectId, TokenAmount};
use ember_vote::VoteChoice;
use serde::{Deserialize, Serialize};

/// One call against the wind-down core.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Op {
    /// Cast or change a weighted ballot on a subject.
    CastVote {
        subject: SubjectId,
        voter: Principal,
        choice: VoteChoice,
    },
    /// Query whether the subject's proposal has passed.
    CheckExecutable { subject: SubjectId },
    /// One signer's approval of the subject's execution.
    Approve {
        subject: SubjectId,
        signer: Principal,
    },
    /// Convert a holder's legacy V1 balance into V2 units.
    ConvertToV2 { holder: Principal },
    /// Burn tokens for a treasury payout.
    Redeem {
        holder: Principal,
        amount: TokenAmount,
    },
}

/// The success value of an applied operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum OpOutcome {
    VoteRecorded,
    Executable,
    ApprovalCount(u32),
    Converted(TokenAmount),
    Redeemed(RedemptionReceipt),
}
