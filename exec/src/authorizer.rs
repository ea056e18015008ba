//! Multi-signer execution approval.

use crate::error::AuthorizerError;
use ember_store::AuthorizerStore;
use ember_types::{Principal, SubjectId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Approval progress for one subject.
///
/// Approvals are ordered for a stable count; distinctness is enforced on
/// insert. Once `authorized` flips true it never flips back.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ApprovalState {
    approvals: Vec<Principal>,
    authorized: bool,
}

impl ApprovalState {
    pub fn count(&self) -> u32 {
        self.approvals.len() as u32
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized
    }
}

/// Collects distinct-signer approvals per subject.
///
/// The signer set and threshold are fixed at construction; only the
/// per-subject approval state mutates.
pub struct ExecutionAuthorizer {
    signers: Vec<Principal>,
    threshold: u32,
    states: HashMap<SubjectId, ApprovalState>,
}

impl ExecutionAuthorizer {
    pub fn new(signers: Vec<Principal>, threshold: u32) -> Self {
        Self {
            signers,
            threshold,
            states: HashMap::new(),
        }
    }

    /// Record one signer's approval of `subject`, returning the running
    /// approval count. The approval that reaches the threshold permanently
    /// sets the authorized flag; later approvals are rejected.
    pub fn approve(
        &mut self,
        subject: SubjectId,
        signer: &Principal,
    ) -> Result<u32, AuthorizerError> {
        if !self.signers.contains(signer) {
            return Err(AuthorizerError::UnauthorizedSigner(signer.clone()));
        }
        let state = self.states.entry(subject).or_default();
        if state.authorized {
            return Err(AuthorizerError::AlreadyAuthorized);
        }
        if state.approvals.contains(signer) {
            return Err(AuthorizerError::DuplicateApproval(signer.clone()));
        }
        state.approvals.push(signer.clone());
        let count = state.count();
        if count >= self.threshold {
            state.authorized = true;
        }
        Ok(count)
    }

    /// Whether `subject` has reached the execution threshold.
    pub fn is_authorized(&self, subject: SubjectId) -> bool {
        self.states
            .get(&subject)
            .map(ApprovalState::is_authorized)
            .unwrap_or(false)
    }

    /// Current approval count for `subject`.
    pub fn approval_count(&self, subject: SubjectId) -> u32 {
        self.states
            .get(&subject)
            .map(ApprovalState::count)
            .unwrap_or(0)
    }

    /// Persist per-subject approval state to an authorizer store.
    pub fn save_to_store(&self, store: &dyn AuthorizerStore) -> Result<(), AuthorizerError> {
        for (subject, state) in &self.states {
            let bytes =
                bincode::serialize(state).map_err(|e| AuthorizerError::Other(e.to_string()))?;
            store
                .put_approval_state(*subject, &bytes)
                .map_err(|e| AuthorizerError::Other(e.to_string()))?;
        }
        Ok(())
    }

    /// Restore approval state from an authorizer store. The signer set and
    /// threshold are configuration, supplied fresh by the caller.
    pub fn load_from_store(
        store: &dyn AuthorizerStore,
        signers: Vec<Principal>,
        threshold: u32,
    ) -> Result<Self, AuthorizerError> {
        let mut states = HashMap::new();
        for (subject, bytes) in store
            .iter_approval_states()
            .map_err(|e| AuthorizerError::Other(e.to_string()))?
        {
            let state: ApprovalState = bincode::deserialize(&bytes)
                .map_err(|e| AuthorizerError::Other(e.to_string()))?;
            states.insert(subject, state);
        }
        Ok(Self {
            signers,
            threshold,
            states,
        })
    }
}
