use crate::StoreError;
use ember_types::Principal;

/// Store trait for persisting redemption-ledger state.
///
/// Per-holder account records are keyed by principal; the treasury balance,
/// ledger status, and receipt log live under meta keys. All values are
/// opaque bytes serialized by the `ember-redemption` crate.
pub trait RedemptionStore {
    fn get_account(&self, holder: &Principal) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_account(&self, holder: &Principal, bytes: &[u8]) -> Result<(), StoreError>;
    fn iter_accounts(&self) -> Result<Vec<(Principal, Vec<u8>)>, StoreError>;

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
}
