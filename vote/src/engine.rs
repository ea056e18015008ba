//! The vote engine — records weighted ballots and reports executability.

use crate::error::VoteError;
use crate::snapshot::StakeWeightProvider;
use crate::tally::{Ballot, VoteChoice, VoteTally};
use ember_store::VoteStore;
use ember_types::{Principal, SubjectId, VoterId};
use std::collections::HashMap;

/// Accumulates weighted ballots per subject.
///
/// Tallies are the permanent record: created lazily on the first vote for a
/// subject and never deleted. Ballots snapshot the voter's weight at cast
/// time so a later flip moves exactly what was recorded.
#[derive(Default)]
pub struct VoteEngine {
    tallies: HashMap<SubjectId, VoteTally>,
    ballots: HashMap<(SubjectId, VoterId), Ballot>,
}

impl VoteEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cast or change a vote on `subject`.
    ///
    /// The principal must resolve through the snapshot registry and carry a
    /// non-zero stake weight. A repeat of the same choice is rejected with
    /// no mutation; the opposite choice atomically moves the voter's full
    /// recorded weight across sides.
    pub fn cast_vote(
        &mut self,
        stakes: &dyn StakeWeightProvider,
        subject: SubjectId,
        principal: &Principal,
        choice: VoteChoice,
    ) -> Result<(), VoteError> {
        let voter = stakes
            .voter_id(principal)
            .ok_or_else(|| VoteError::UserNotFound(principal.clone()))?;
        let weight = stakes
            .weight_of(voter)
            .filter(|w| !w.is_zero())
            .ok_or(VoteError::NothingStacked)?;

        match self.ballots.get_mut(&(subject, voter)) {
            Some(ballot) if ballot.choice == choice => Err(VoteError::VotedAlready(voter)),
            Some(ballot) => {
                let recorded = ballot.weight;
                let from = ballot.choice;
                let tally = self.tallies.entry(subject).or_default();
                tally
                    .flip_checked(from, recorded)
                    .ok_or(VoteError::Overflow)?;
                ballot.choice = choice;
                Ok(())
            }
            None => {
                let tally = self.tallies.entry(subject).or_default();
                tally
                    .record_checked(choice, weight)
                    .ok_or(VoteError::Overflow)?;
                self.ballots.insert(
                    (subject, voter),
                    Ballot {
                        voter,
                        choice,
                        weight,
                    },
                );
                Ok(())
            }
        }
    }

    /// Whether the proposal for `subject` has passed.
    ///
    /// Pure predicate, callable at any time. Absence of a strict weighted
    /// majority is itself a reported failure, matching the error-as-signal
    /// convention of the call boundary.
    pub fn is_executable(&self, subject: SubjectId) -> Result<(), VoteError> {
        match self.tallies.get(&subject) {
            Some(tally) if tally.passes() => Ok(()),
            _ => Err(VoteError::VoteFailed),
        }
    }

    /// The tally for `subject`, if any vote has been cast.
    pub fn tally(&self, subject: SubjectId) -> Option<&VoteTally> {
        self.tallies.get(&subject)
    }

    /// The recorded ballot for a voter on `subject`, if any.
    pub fn ballot(&self, subject: SubjectId, voter: VoterId) -> Option<&Ballot> {
        self.ballots.get(&(subject, voter))
    }
}

impl VoteEngine {
    /// Persist all tallies and ballots to a vote store.
    pub fn save_to_store(&self, store: &dyn VoteStore) -> Result<(), VoteError> {
        for (subject, tally) in &self.tallies {
            let bytes =
                bincode::serialize(tally).map_err(|e| VoteError::Other(e.to_string()))?;
            store
                .put_tally(*subject, &bytes)
                .map_err(|e| VoteError::Other(e.to_string()))?;
        }
        for ((subject, voter), ballot) in &self.ballots {
            let bytes =
                bincode::serialize(ballot).map_err(|e| VoteError::Other(e.to_string()))?;
            store
                .put_ballot(*subject, *voter, &bytes)
                .map_err(|e| VoteError::Other(e.to_string()))?;
        }
        Ok(())
    }

    /// Restore engine state from a vote store.
    pub fn load_from_store(store: &dyn VoteStore) -> Result<Self, VoteError> {
        let mut tallies = HashMap::new();
        for (subject, bytes) in store
            .iter_tallies()
            .map_err(|e| VoteError::Other(e.to_string()))?
        {
            let tally: VoteTally =
                bincode::deserialize(&bytes).map_err(|e| VoteError::Other(e.to_string()))?;
            tallies.insert(subject, tally);
        }
        let mut ballots = HashMap::new();
        for ((subject, voter), bytes) in store
            .iter_ballots()
            .map_err(|e| VoteError::Other(e.to_string()))?
        {
            let ballot: Ballot =
                bincode::deserialize(&bytes).map_err(|e| VoteError::Other(e.to_string()))?;
            ballots.insert((subject, voter), ballot);
        }
        Ok(Self { tallies, ballots })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::StakeSnapshot;
    use ember_store::MemoryStore;
    use ember_types::TokenAmount;

    const SUBJECT: SubjectId = SubjectId::new(1);

    fn principal(n: u8) -> Principal {
        Principal::new(format!("SP_TEST_{n:03}"))
    }

    /// Two stakers with the observed snapshot weights, one registered
    /// zero-weight identity.
    fn snapshot() -> StakeSnapshot {
        let mut s = StakeSnapshot::new();
        s.register(
            principal(1),
            VoterId::new(1),
            TokenAmount::new(144_479_012_000000),
        );
        s.register(
            principal(2),
            VoterId::new(2),
            TokenAmount::new(2_086_372_000000),
        );
        s.register(principal(3), VoterId::new(3), TokenAmount::ZERO);
        s
    }

    fn check_tally(engine: &VoteEngine, yes: u128, votes_yes: u64, no: u128, votes_no: u64) {
        let tally = engine.tally(SUBJECT).expect("tally exists");
        assert_eq!(tally.total_amount_yes, TokenAmount::new(yes));
        assert_eq!(tally.total_votes_yes, votes_yes);
        assert_eq!(tally.total_amount_no, TokenAmount::new(no));
        assert_eq!(tally.total_votes_no, votes_no);
    }

    #[test]
    fn rejects_unregistered_and_unstacked_voters() {
        let stakes = snapshot();
        let mut engine = VoteEngine::new();

        let err = engine
            .cast_vote(&stakes, SUBJECT, &principal(3), VoteChoice::Yes)
            .unwrap_err();
        assert_eq!(err.code(), 26_003);

        let err = engine
            .cast_vote(&stakes, SUBJECT, &principal(9), VoteChoice::Yes)
            .unwrap_err();
        assert_eq!(err.code(), 26_004);

        assert!(engine.tally(SUBJECT).is_none());
        assert_eq!(engine.is_executable(SUBJECT).unwrap_err().code(), 26_007);
    }

    #[test]
    fn rejects_duplicate_vote_with_same_choice() {
        let stakes = snapshot();
        let mut engine = VoteEngine::new();

        engine
            .cast_vote(&stakes, SUBJECT, &principal(1), VoteChoice::Yes)
            .unwrap();
        let err = engine
            .cast_vote(&stakes, SUBJECT, &principal(1), VoteChoice::Yes)
            .unwrap_err();
        assert_eq!(err.code(), 26_002);
        check_tally(&engine, 144_479_012_000000, 1, 0, 0);
    }

    #[test]
    fn flip_moves_full_weight_to_other_side() {
        let stakes = snapshot();
        let mut engine = VoteEngine::new();

        engine
            .cast_vote(&stakes, SUBJECT, &principal(2), VoteChoice::Yes)
            .unwrap();
        check_tally(&engine, 2_086_372_000000, 1, 0, 0);

        engine
            .cast_vote(&stakes, SUBJECT, &principal(2), VoteChoice::No)
            .unwrap();
        check_tally(&engine, 0, 0, 2_086_372_000000, 1);
    }

    #[test]
    fn split_vote_fails_when_no_outweighs_yes() {
        let stakes = snapshot();
        let mut engine = VoteEngine::new();

        engine
            .cast_vote(&stakes, SUBJECT, &principal(1), VoteChoice::No)
            .unwrap();
        engine
            .cast_vote(&stakes, SUBJECT, &principal(2), VoteChoice::Yes)
            .unwrap();
        check_tally(&engine, 2_086_372_000000, 1, 144_479_012_000000, 1);
        assert_eq!(engine.is_executable(SUBJECT).unwrap_err().code(), 26_007);
    }

    #[test]
    fn unanimous_yes_passes_and_unanimous_no_fails() {
        let stakes = snapshot();
        let mut engine = VoteEngine::new();

        engine
            .cast_vote(&stakes, SUBJECT, &principal(1), VoteChoice::Yes)
            .unwrap();
        engine
            .cast_vote(&stakes, SUBJECT, &principal(2), VoteChoice::Yes)
            .unwrap();
        check_tally(&engine, 146_565_384_000000, 2, 0, 0);
        assert!(engine.is_executable(SUBJECT).is_ok());

        let mut engine = VoteEngine::new();
        engine
            .cast_vote(&stakes, SUBJECT, &principal(1), VoteChoice::No)
            .unwrap();
        engine
            .cast_vote(&stakes, SUBJECT, &principal(2), VoteChoice::No)
            .unwrap();
        check_tally(&engine, 0, 0, 146_565_384_000000, 2);
        assert_eq!(engine.is_executable(SUBJECT).unwrap_err().code(), 26_007);
    }

    #[test]
    fn majority_flip_overturns_executability() {
        let stakes = snapshot();
        let mut engine = VoteEngine::new();

        engine
            .cast_vote(&stakes, SUBJECT, &principal(1), VoteChoice::Yes)
            .unwrap();
        assert!(engine.is_executable(SUBJECT).is_ok());

        // A later no-vote from the small staker does not overturn it.
        engine
            .cast_vote(&stakes, SUBJECT, &principal(2), VoteChoice::No)
            .unwrap();
        assert!(engine.is_executable(SUBJECT).is_ok());

        // The large staker flipping to no does.
        engine
            .cast_vote(&stakes, SUBJECT, &principal(1), VoteChoice::No)
            .unwrap();
        assert_eq!(engine.is_executable(SUBJECT).unwrap_err().code(), 26_007);
    }

    #[test]
    fn save_and_load_preserve_tallies_and_ballots() {
        let stakes = snapshot();
        let mut engine = VoteEngine::new();
        engine
            .cast_vote(&stakes, SUBJECT, &principal(1), VoteChoice::Yes)
            .unwrap();
        engine
            .cast_vote(&stakes, SUBJECT, &principal(2), VoteChoice::No)
            .unwrap();

        let store = MemoryStore::new();
        engine.save_to_store(&store).unwrap();
        let mut restored = VoteEngine::load_from_store(&store).unwrap();

        check_tally(&restored, 144_479_012_000000, 1, 2_086_372_000000, 1);
        // Duplicate detection still works against the reloaded ballot.
        let err = restored
            .cast_vote(&stakes, SUBJECT, &principal(2), VoteChoice::No)
            .unwrap_err();
        assert_eq!(err.code(), 26_002);
        // And a flip still re-uses the recorded weight.
        restored
            .cast_vote(&stakes, SUBJECT, &principal(2), VoteChoice::Yes)
            .unwrap();
        check_tally(
            &restored,
            146_565_384_000000,
            2,
            0,
            0,
        );
    }
}
