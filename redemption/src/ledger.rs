//! The redemption ledger — balance accounting, conversion, and payouts.

use crate::account::RedemptionAccount;
use crate::error::RedemptionError;
use crate::receipt::RedemptionReceipt;
use ember_exec::ExecutionAuthorizer;
use ember_store::RedemptionStore;
use ember_types::{Principal, ProtocolParams, StxAmount, SubjectId, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const META_TREASURY: &[u8] = b"treasury";
const META_STATUS: &[u8] = b"status";
const META_RECEIPTS: &[u8] = b"receipts";

/// Redemption window state. `Locked` until the authorizer reports the
/// subject executed; `Active` permanently thereafter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerStatus {
    #[default]
    Locked,
    Active,
}

/// Converts burned tokens into treasury payouts at a fixed exchange rate,
/// under balance, cap, and authorization enforcement.
///
/// Every call is all-or-nothing: it either commits fully or rejects with a
/// coded error and zero observable state change.
pub struct RedemptionLedger {
    status: LedgerStatus,
    accounts: HashMap<Principal, RedemptionAccount>,
    treasury: StxAmount,
    receipts: Vec<RedemptionReceipt>,
}

impl RedemptionLedger {
    /// A locked ledger holding `treasury` micro-STX and no accounts.
    pub fn new(treasury: StxAmount) -> Self {
        Self {
            status: LedgerStatus::Locked,
            accounts: HashMap::new(),
            treasury,
            receipts: Vec::new(),
        }
    }

    /// Seed a holder's balances from the token snapshot. `balance_v1` is in
    /// whole V1 tokens, `balance_v2` in micro-units.
    pub fn seed_account(&mut self, holder: Principal, balance_v1: u128, balance_v2: u128) {
        self.accounts
            .insert(holder, RedemptionAccount::new(balance_v1, balance_v2));
    }

    pub fn status(&self) -> LedgerStatus {
        self.status
    }

    pub fn treasury(&self) -> StxAmount {
        self.treasury
    }

    pub fn account(&self, holder: &Principal) -> Option<&RedemptionAccount> {
        self.accounts.get(holder)
    }

    pub fn receipts(&self) -> &[RedemptionReceipt] {
        &self.receipts
    }

    /// Flip the ledger to `Active` once the authorizer reports `subject`
    /// authorized. Idempotent once active; there is no way back to `Locked`.
    pub fn unlock(
        &mut self,
        authorizer: &ExecutionAuthorizer,
        subject: SubjectId,
    ) -> Result<(), RedemptionError> {
        if !authorizer.is_authorized(subject) {
            return Err(RedemptionError::NotAuthorized);
        }
        self.status = LedgerStatus::Active;
        Ok(())
    }

    /// Move a holder's entire V1 balance into V2 units at the documented
    /// scale, returning the micro-units credited.
    ///
    /// A zeroed V1 balance (including after a full redemption) permanently
    /// blocks further conversion. Conversion is a token operation, not a
    /// redemption, so it is available while the ledger is still locked.
    pub fn convert_to_v2(
        &mut self,
        holder: &Principal,
        params: &ProtocolParams,
    ) -> Result<TokenAmount, RedemptionError> {
        let account = self
            .accounts
            .get_mut(holder)
            .filter(|a| a.balance_v1 > 0)
            .ok_or(RedemptionError::NothingToConvert)?;
        let credited = account
            .balance_v1
            .checked_mul(params.v1_scale)
            .ok_or(RedemptionError::Overflow)?;
        let new_v2 = account
            .balance_v2
            .checked_add(credited)
            .ok_or(RedemptionError::Overflow)?;
        account.balance_v1 = 0;
        account.balance_v2 = new_v2;
        Ok(TokenAmount::new(credited))
    }

    /// Burn `amount` micro-tokens from `holder` and pay out from the
    /// treasury at the fixed ratio.
    ///
    /// Preconditions, in order: the ledger is active; the amount is
    /// non-zero and within the per-tx cap; the holder's combined balance
    /// covers it; the treasury covers the payout. The debit draws V1 first
    /// (scaled), then V2. A V1 draw that is not a whole-token multiple
    /// consumes the next whole token and credits the sub-token change to
    /// V2, so the combined balance decreases by exactly `amount`.
    pub fn redeem(
        &mut self,
        holder: &Principal,
        amount: TokenAmount,
        params: &ProtocolParams,
    ) -> Result<RedemptionReceipt, RedemptionError> {
        if self.status != LedgerStatus::Active {
            return Err(RedemptionError::NotActive);
        }
        if amount.is_zero() {
            return Err(RedemptionError::ZeroAmount);
        }
        let requested = amount.raw();
        if requested > params.max_redemption_per_tx {
            return Err(RedemptionError::ExceedsMaxPerTx {
                requested,
                cap: params.max_redemption_per_tx,
            });
        }

        let account = self.accounts.get(holder).cloned().unwrap_or_default();
        let v1_capacity = account
            .balance_v1
            .checked_mul(params.v1_scale)
            .ok_or(RedemptionError::Overflow)?;
        let combined = v1_capacity
            .checked_add(account.balance_v2)
            .ok_or(RedemptionError::Overflow)?;
        if combined == 0 {
            return Err(RedemptionError::NothingToRedeem);
        }
        if combined < requested {
            return Err(RedemptionError::InsufficientBalance {
                requested,
                available: combined,
            });
        }

        let payout = requested
            .checked_mul(params.redemption_rate_num)
            .ok_or(RedemptionError::Overflow)?
            .checked_div(params.redemption_rate_den)
            .ok_or(RedemptionError::Overflow)?;
        let new_treasury = self
            .treasury
            .raw()
            .checked_sub(payout)
            .ok_or(RedemptionError::TreasuryShortfall {
                needed: payout,
                available: self.treasury.raw(),
            })?;

        // Debit plan: every value is computed before anything is written.
        let v1_used = requested.min(v1_capacity);
        let v2_used = requested - v1_used;
        let v1_whole_consumed = v1_used.div_ceil(params.v1_scale);
        let change = v1_whole_consumed * params.v1_scale - v1_used;
        let new_v1 = account.balance_v1 - v1_whole_consumed;
        let new_v2 = account
            .balance_v2
            .checked_add(change)
            .ok_or(RedemptionError::Overflow)?
            .checked_sub(v2_used)
            .ok_or(RedemptionError::Overflow)?;

        self.accounts
            .insert(holder.clone(), RedemptionAccount::new(new_v1, new_v2));
        self.treasury = StxAmount::new(new_treasury);
        let receipt = RedemptionReceipt {
            holder: holder.clone(),
            payout: StxAmount::new(payout),
            total_burned: amount,
            v1_burned: TokenAmount::new(v1_used),
            v2_burned: TokenAmount::new(v2_used),
        };
        self.receipts.push(receipt.clone());
        Ok(receipt)
    }
}

impl RedemptionLedger {
    /// Persist accounts, treasury, status, and receipts to a store.
    pub fn save_to_store(&self, store: &dyn RedemptionStore) -> Result<(), RedemptionError> {
        for (holder, account) in &self.accounts {
            let bytes =
                bincode::serialize(account).map_err(|e| RedemptionError::Other(e.to_string()))?;
            store
                .put_account(holder, &bytes)
                .map_err(|e| RedemptionError::Other(e.to_string()))?;
        }
        let treasury = bincode::serialize(&self.treasury.raw())
            .map_err(|e| RedemptionError::Other(e.to_string()))?;
        store
            .put_meta(META_TREASURY, &treasury)
            .map_err(|e| RedemptionError::Other(e.to_string()))?;
        let status = bincode::serialize(&self.status)
            .map_err(|e| RedemptionError::Other(e.to_string()))?;
        store
            .put_meta(META_STATUS, &status)
            .map_err(|e| RedemptionError::Other(e.to_string()))?;
        let receipts = bincode::serialize(&self.receipts)
            .map_err(|e| RedemptionError::Other(e.to_string()))?;
        store
            .put_meta(META_RECEIPTS, &receipts)
            .map_err(|e| RedemptionError::Other(e.to_string()))?;
        Ok(())
    }

    /// Restore a ledger from a store.
    pub fn load_from_store(store: &dyn RedemptionStore) -> Result<Self, RedemptionError> {
        let mut accounts = HashMap::new();
        for (holder, bytes) in store
            .iter_accounts()
            .map_err(|e| RedemptionError::Other(e.to_string()))?
        {
            let account: RedemptionAccount = bincode::deserialize(&bytes)
                .map_err(|e| RedemptionError::Other(e.to_string()))?;
            accounts.insert(holder, account);
        }
        let treasury = match store
            .get_meta(META_TREASURY)
            .map_err(|e| RedemptionError::Other(e.to_string()))?
        {
            Some(bytes) => StxAmount::new(
                bincode::deserialize(&bytes).map_err(|e| RedemptionError::Other(e.to_string()))?,
            ),
            None => StxAmount::ZERO,
        };
        let status = match store
            .get_meta(META_STATUS)
            .map_err(|e| RedemptionError::Other(e.to_string()))?
        {
            Some(bytes) => bincode::deserialize(&bytes)
                .map_err(|e| RedemptionError::Other(e.to_string()))?,
            None => LedgerStatus::Locked,
        };
        let receipts = match store
            .get_meta(META_RECEIPTS)
            .map_err(|e| RedemptionError::Other(e.to_string()))?
        {
            Some(bytes) => bincode::deserialize(&bytes)
                .map_err(|e| RedemptionError::Other(e.to_string()))?,
            None => Vec::new(),
        };
        Ok(Self {
            status,
            accounts,
            treasury,
            receipts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBJECT: SubjectId = SubjectId::new(1);

    fn holder(n: u8) -> Principal {
        Principal::new(format!("SP_HOLDER_{n:03}"))
    }

    fn signer(n: u8) -> Principal {
        Principal::new(format!("SP_SIGNER_{n:03}"))
    }

    fn authorized() -> ExecutionAuthorizer {
        let mut auth =
            ExecutionAuthorizer::new(vec![signer(1), signer(2), signer(3)], 3);
        for n in 1..=3 {
            auth.approve(SUBJECT, &signer(n)).unwrap();
        }
        auth
    }

    /// Active ledger with the observed treasury, one V2 holder and one V1
    /// holder.
    fn active_ledger() -> RedemptionLedger {
        let mut ledger = RedemptionLedger::new(StxAmount::new(31_039_000000));
        ledger.seed_account(holder(1), 0, 321_825_000000);
        ledger.seed_account(holder(2), 800_000, 0);
        ledger.unlock(&authorized(), SUBJECT).unwrap();
        ledger
    }

    fn params() -> ProtocolParams {
        ProtocolParams::default()
    }

    #[test]
    fn locked_ledger_rejects_redemption() {
        let mut ledger = RedemptionLedger::new(StxAmount::new(31_039_000000));
        ledger.seed_account(holder(1), 0, 321_825_000000);
        let err = ledger
            .redeem(&holder(1), TokenAmount::new(1_000000), &params())
            .unwrap_err();
        assert_eq!(err.code(), 13_005);
    }

    #[test]
    fn unlock_requires_authorization() {
        let mut ledger = RedemptionLedger::new(StxAmount::ZERO);
        let unauthorized = ExecutionAuthorizer::new(vec![signer(1)], 3);
        let err = ledger.unlock(&unauthorized, SUBJECT).unwrap_err();
        assert_eq!(err.code(), 13_006);
        assert_eq!(ledger.status(), LedgerStatus::Locked);

        ledger.unlock(&authorized(), SUBJECT).unwrap();
        assert_eq!(ledger.status(), LedgerStatus::Active);
        // Idempotent once active.
        ledger.unlock(&authorized(), SUBJECT).unwrap();
        assert_eq!(ledger.status(), LedgerStatus::Active);
    }

    #[test]
    fn v2_redemption_pays_exact_ratio() {
        let mut ledger = active_ledger();
        let receipt = ledger
            .redeem(&holder(1), TokenAmount::new(321_825_000000), &params())
            .unwrap();

        assert_eq!(receipt.payout, StxAmount::new(547_102500));
        assert_eq!(receipt.total_burned, TokenAmount::new(321_825_000000));
        assert_eq!(receipt.v1_burned, TokenAmount::ZERO);
        assert_eq!(receipt.v2_burned, TokenAmount::new(321_825_000000));
        assert_eq!(
            ledger.treasury(),
            StxAmount::new(31_039_000000 - 547_102500)
        );

        // Immediate repeat with a zeroed balance fails, twice, without
        // state change.
        let err = ledger
            .redeem(&holder(1), TokenAmount::new(321_825_000000), &params())
            .unwrap_err();
        assert_eq!(err.code(), 13_007);
        let err = ledger
            .redeem(&holder(1), TokenAmount::new(321_825_000000), &params())
            .unwrap_err();
        assert_eq!(err.code(), 13_007);
        assert_eq!(ledger.receipts().len(), 1);
    }

    #[test]
    fn v1_redemption_draws_legacy_balance_first() {
        let mut ledger = active_ledger();
        let receipt = ledger
            .redeem(&holder(2), TokenAmount::new(800_000_000000), &params())
            .unwrap();

        assert_eq!(receipt.payout, StxAmount::new(1_360_000000));
        assert_eq!(receipt.total_burned, TokenAmount::new(800_000_000000));
        assert_eq!(receipt.v1_burned, TokenAmount::new(800_000_000000));
        assert_eq!(receipt.v2_burned, TokenAmount::ZERO);

        // The V1 balance is spent; conversion and further redemption both
        // fail.
        let err = ledger.convert_to_v2(&holder(2), &params()).unwrap_err();
        assert_eq!(err.code(), 2_003);
        let err = ledger
            .redeem(&holder(2), TokenAmount::new(800_000_000000), &params())
            .unwrap_err();
        assert_eq!(err.code(), 13_007);
    }

    #[test]
    fn convert_moves_all_v1_into_v2_once() {
        let mut ledger = active_ledger();
        let credited = ledger.convert_to_v2(&holder(2), &params()).unwrap();
        assert_eq!(credited, TokenAmount::new(800_000_000000));

        let account = ledger.account(&holder(2)).unwrap();
        assert_eq!(account.balance_v1, 0);
        assert_eq!(account.balance_v2, 800_000_000000);

        let err = ledger.convert_to_v2(&holder(2), &params()).unwrap_err();
        assert_eq!(err.code(), 2_003);

        // Redeeming after conversion draws from V2.
        let receipt = ledger
            .redeem(&holder(2), TokenAmount::new(800_000_000000), &params())
            .unwrap();
        assert_eq!(receipt.v1_burned, TokenAmount::ZERO);
        assert_eq!(receipt.v2_burned, TokenAmount::new(800_000_000000));
        assert_eq!(receipt.payout, StxAmount::new(1_360_000000));
    }

    #[test]
    fn cap_is_enforced_before_balance() {
        let mut ledger = active_ledger();
        // Cap violation wins even though the holder could never cover it.
        let err = ledger
            .redeem(&holder(1), TokenAmount::new(10_000_000_000001), &params())
            .unwrap_err();
        assert_eq!(err.code(), 13_008);

        // A rich holder is still capped.
        ledger.seed_account(holder(3), 0, 20_000_000_000000);
        let err = ledger
            .redeem(&holder(3), TokenAmount::new(10_000_000_000001), &params())
            .unwrap_err();
        assert_eq!(err.code(), 13_008);
        // The cap itself is accepted.
        let receipt = ledger
            .redeem(&holder(3), TokenAmount::new(10_000_000_000000), &params())
            .unwrap();
        assert_eq!(receipt.payout, StxAmount::new(17_000_000000));
    }

    #[test]
    fn insufficient_and_empty_balances_are_distinct_failures() {
        let mut ledger = active_ledger();
        let err = ledger
            .redeem(&holder(1), TokenAmount::new(321_825_000001), &params())
            .unwrap_err();
        assert_eq!(err.code(), 13_009);

        // Unknown holder has a combined balance of zero.
        let err = ledger
            .redeem(&holder(9), TokenAmount::new(1), &params())
            .unwrap_err();
        assert_eq!(err.code(), 13_007);
    }

    #[test]
    fn zero_amount_is_rejected() {
        let mut ledger = active_ledger();
        let err = ledger
            .redeem(&holder(1), TokenAmount::ZERO, &params())
            .unwrap_err();
        assert_eq!(err.code(), 13_011);
    }

    #[test]
    fn treasury_shortfall_fails_without_state_change() {
        let mut ledger = RedemptionLedger::new(StxAmount::new(100));
        ledger.seed_account(holder(1), 0, 321_825_000000);
        ledger.unlock(&authorized(), SUBJECT).unwrap();

        let err = ledger
            .redeem(&holder(1), TokenAmount::new(321_825_000000), &params())
            .unwrap_err();
        assert_eq!(err.code(), 13_010);
        assert_eq!(ledger.treasury(), StxAmount::new(100));
        assert_eq!(
            ledger.account(&holder(1)).unwrap().balance_v2,
            321_825_000000
        );
        assert!(ledger.receipts().is_empty());
    }

    #[test]
    fn sub_token_v1_draw_credits_change_to_v2() {
        let mut ledger = RedemptionLedger::new(StxAmount::new(1_000_000000));
        ledger.seed_account(holder(1), 2, 0);
        ledger.unlock(&authorized(), SUBJECT).unwrap();

        let receipt = ledger
            .redeem(&holder(1), TokenAmount::new(1_500000), &params())
            .unwrap();
        assert_eq!(receipt.v1_burned, TokenAmount::new(1_500000));
        assert_eq!(receipt.v2_burned, TokenAmount::ZERO);

        // Both whole tokens were consumed; the half-token change sits in V2
        // and the combined balance dropped by exactly the request.
        let account = ledger.account(&holder(1)).unwrap();
        assert_eq!(account.balance_v1, 0);
        assert_eq!(account.balance_v2, 500000);
        assert_eq!(account.combined_micro(1_000_000), Some(500000));
    }

    #[test]
    fn save_and_load_preserve_the_ledger() {
        use ember_store::MemoryStore;

        let mut ledger = active_ledger();
        ledger
            .redeem(&holder(1), TokenAmount::new(100_000_000000), &params())
            .unwrap();

        let store = MemoryStore::new();
        ledger.save_to_store(&store).unwrap();
        let mut restored = RedemptionLedger::load_from_store(&store).unwrap();

        assert_eq!(restored.status(), LedgerStatus::Active);
        assert_eq!(restored.treasury(), ledger.treasury());
        assert_eq!(restored.receipts(), ledger.receipts());
        assert_eq!(
            restored.account(&holder(1)),
            ledger.account(&holder(1))
        );

        // The reloaded ledger keeps enforcing the same rules.
        let err = restored
            .redeem(&holder(1), TokenAmount::new(321_825_000000), &params())
            .unwrap_err();
        assert_eq!(err.code(), 13_009);
    }
}
