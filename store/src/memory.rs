//! In-memory storage backend.
//!
//! Backs tests and snapshot round-trips. Every keyspace is a `HashMap`
//! behind an `RwLock`; a poisoned lock is reported as a backend error
//! rather than panicking.

use crate::{AuthorizerStore, RedemptionStore, StoreError, VoteStore};
use ember_types::{Principal, SubjectId, VoterId};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    tallies: RwLock<HashMap<SubjectId, Vec<u8>>>,
    ballots: RwLock<HashMap<(SubjectId, VoterId), Vec<u8>>>,
    approval_states: RwLock<HashMap<SubjectId, Vec<u8>>>,
    accounts: RwLock<HashMap<Principal, Vec<u8>>>,
    meta: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

impl VoteStore for MemoryStore {
    fn get_tally(&self, subject: SubjectId) -> Result<Option<Vec<u8>>, StoreError> {
        let map = self.tallies.read().map_err(|_| poisoned())?;
        Ok(map.get(&subject).cloned())
    }

    fn put_tally(&self, subject: SubjectId, bytes: &[u8]) -> Result<(), StoreError> {
        let mut map = self.tallies.write().map_err(|_| poisoned())?;
        map.insert(subject, bytes.to_vec());
        Ok(())
    }

    fn iter_tallies(&self) -> Result<Vec<(SubjectId, Vec<u8>)>, StoreError> {
        let map = self.tallies.read().map_err(|_| poisoned())?;
        Ok(map.iter().map(|(k, v)| (*k, v.clone())).collect())
    }

    fn get_ballot(
        &self,
        subject: SubjectId,
        voter: VoterId,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        let map = self.ballots.read().map_err(|_| poisoned())?;
        Ok(map.get(&(subject, voter)).cloned())
    }

    fn put_ballot(
        &self,
        subject: SubjectId,
        voter: VoterId,
        bytes: &[u8],
    ) -> Result<(), StoreError> {
        let mut map = self.ballots.write().map_err(|_| poisoned())?;
        map.insert((subject, voter), bytes.to_vec());
        Ok(())
    }

    fn iter_ballots(&self) -> Result<Vec<((SubjectId, VoterId), Vec<u8>)>, StoreError> {
        let map = self.ballots.read().map_err(|_| poisoned())?;
        Ok(map.iter().map(|(k, v)| (*k, v.clone())).collect())
    }
}

impl AuthorizerStore for MemoryStore {
    fn get_approval_state(&self, subject: SubjectId) -> Result<Option<Vec<u8>>, StoreError> {
        let map = self.approval_states.read().map_err(|_| poisoned())?;
        Ok(map.get(&subject).cloned())
    }

    fn put_approval_state(&self, subject: SubjectId, bytes: &[u8]) -> Result<(), StoreError> {
        let mut map = self.approval_states.write().map_err(|_| poisoned())?;
        map.insert(subject, bytes.to_vec());
        Ok(())
    }

    fn iter_approval_states(&self) -> Result<Vec<(SubjectId, Vec<u8>)>, StoreError> {
        let map = self.approval_states.read().map_err(|_| poisoned())?;
        Ok(map.iter().map(|(k, v)| (*k, v.clone())).collect())
    }
}

impl RedemptionStore for MemoryStore {
    fn get_account(&self, holder: &Principal) -> Result<Option<Vec<u8>>, StoreError> {
        let map = self.accounts.read().map_err(|_| poisoned())?;
        Ok(map.get(holder).cloned())
    }

    fn put_account(&self, holder: &Principal, bytes: &[u8]) -> Result<(), StoreError> {
        let mut map = self.accounts.write().map_err(|_| poisoned())?;
        map.insert(holder.clone(), bytes.to_vec());
        Ok(())
    }

    fn iter_accounts(&self) -> Result<Vec<(Principal, Vec<u8>)>, StoreError> {
        let map = self.accounts.read().map_err(|_| poisoned())?;
        Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let map = self.meta.read().map_err(|_| poisoned())?;
        Ok(map.get(key).cloned())
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut map = self.meta.write().map_err(|_| poisoned())?;
        map.insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}
