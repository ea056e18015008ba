use crate::StoreError;
use ember_types::{SubjectId, VoterId};

/// Store trait for persisting vote-engine state.
///
/// Uses opaque `Vec<u8>` values so the store doesn't depend on the
/// `ember-vote` crate (which would create a circular dependency). The vote
/// engine serializes/deserializes its own types.
pub trait VoteStore {
    fn get_tally(&self, subject: SubjectId) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_tally(&self, subject: SubjectId, bytes: &[u8]) -> Result<(), StoreError>;
    fn iter_tallies(&self) -> Result<Vec<(SubjectId, Vec<u8>)>, StoreError>;

    fn get_ballot(
        &self,
        subject: SubjectId,
        voter: VoterId,
    ) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_ballot(
        &self,
        subject: SubjectId,
        voter: VoterId,
        bytes: &[u8],
    ) -> Result<(), StoreError>;
    fn iter_ballots(&self) -> Result<Vec<((SubjectId, VoterId), Vec<u8>)>, StoreError>;
}
