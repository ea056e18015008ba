use crate::StoreError;
use ember_types::SubjectId;

/// Store trait for persisting the execution authorizer's approval state.
///
/// One opaque record per subject: the approval set and the one-shot
/// authorized flag, serialized by the `ember-exec` crate.
pub trait AuthorizerStore {
    fn get_approval_state(&self, subject: SubjectId) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_approval_state(&self, subject: SubjectId, bytes: &[u8]) -> Result<(), StoreError>;
    fn iter_approval_states(&self) -> Result<Vec<(SubjectId, Vec<u8>)>, StoreError>;
}
