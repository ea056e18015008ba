//! The single apply loop over the wind-down components.

use crate::error::OpError;
use crate::op::{Op, OpOutcome};
use ember_exec::ExecutionAuthorizer;
use ember_redemption::RedemptionLedger;
use ember_types::{Principal, ProtocolParams, StxAmount};
use ember_vote::{StakeSnapshot, VoteEngine};

/// Owns the vote engine, the execution authorizer, and the redemption
/// ledger, plus the stake snapshot they are evaluated against.
///
/// Constructed once and threaded through every call; there are no hidden
/// globals. Operations are applied strictly one at a time — a batch is
/// evaluated call-by-call, left to right, and every call either commits
/// fully or rejects with a coded error and no state change.
pub struct Coordinator {
    params: ProtocolParams,
    stakes: StakeSnapshot,
    votes: VoteEngine,
    authorizer: ExecutionAuthorizer,
    ledger: RedemptionLedger,
}

impl Coordinator {
    pub fn new(
        params: ProtocolParams,
        stakes: StakeSnapshot,
        signers: Vec<Principal>,
        treasury: StxAmount,
    ) -> Self {
        let threshold = params.execution_threshold;
        Self {
            params,
            stakes,
            votes: VoteEngine::new(),
            authorizer: ExecutionAuthorizer::new(signers, threshold),
            ledger: RedemptionLedger::new(treasury),
        }
    }

    /// Seed a holder's redeemable balances from the token snapshot.
    pub fn seed_holder(&mut self, holder: Principal, balance_v1: u128, balance_v2: u128) {
        self.ledger.seed_account(holder, balance_v1, balance_v2);
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    pub fn votes(&self) -> &VoteEngine {
        &self.votes
    }

    pub fn authorizer(&self) -> &ExecutionAuthorizer {
        &self.authorizer
    }

    pub fn ledger(&self) -> &RedemptionLedger {
        &self.ledger
    }

    /// Apply one operation.
    pub fn apply(&mut self, op: Op) -> Result<OpOutcome, OpError> {
        tracing::debug!(op = ?op, "applying");
        let result = self.dispatch(op);
        match &result {
            Ok(outcome) => tracing::debug!(outcome = ?outcome, "applied"),
            Err(e) => tracing::warn!(code = e.code(), error = %e, "rejected"),
        }
        result
    }

    /// Apply a batch of operations call-by-call, left to right. A rejected
    /// call commits nothing and does not halt the rest of the batch.
    pub fn apply_batch(&mut self, ops: Vec<Op>) -> Vec<Result<OpOutcome, OpError>> {
        ops.into_iter().map(|op| self.apply(op)).collect()
    }

    fn dispatch(&mut self, op: Op) -> Result<OpOutcome, OpError> {
        match op {
            Op::CastVote {
                subject,
                voter,
                choice,
            } => {
                self.votes.cast_vote(&self.stakes, subject, &voter, choice)?;
                Ok(OpOutcome::VoteRecorded)
            }
            Op::CheckExecutable { subject } => {
                self.votes.is_executable(subject)?;
                Ok(OpOutcome::Executable)
            }
            Op::Approve { subject, signer } => {
                // Only an executable proposal may be approved for
                // execution; checking first keeps a failed approval free of
                // side effects.
                self.votes.is_executable(subject)?;
                let count = self.authorizer.approve(subject, &signer)?;
                if self.authorizer.is_authorized(subject) {
                    self.ledger.unlock(&self.authorizer, subject)?;
                }
                Ok(OpOutcome::ApprovalCount(count))
            }
            Op::ConvertToV2 { holder } => {
                let credited = self.ledger.convert_to_v2(&holder, &self.params)?;
                Ok(OpOutcome::Converted(credited))
            }
            Op::Redeem { holder, amount } => {
                let receipt = self.ledger.redeem(&holder, amount, &self.params)?;
                Ok(OpOutcome::Redeemed(receipt))
            }
        }
    }
}
