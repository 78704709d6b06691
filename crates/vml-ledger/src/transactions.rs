//! Three-way revenue split of a sale.

use tracing::{debug, info};
use vml_store::LedgerStore;
use vml_types::{AccountName, Percentage, TransactionId};

use crate::accounts::account_not_found;
use crate::error::{LedgerError, LedgerResult};
use crate::keys::{KeyCodec, TOTAL_BALANCE_KEY};
use crate::records::{BalanceEntry, SplitShares, TransactionRecord};

/// Divide `amount` between supplier, CSP and VMC.
///
/// The VMC receives whatever the other two shares leave, so the three shares
/// always add back up to `amount`.
pub fn split(amount: f64, csp: Percentage, supplier: Percentage) -> SplitShares {
    let csp_share = csp.share_of(amount);
    let supplier_share = supplier.share_of(amount);
    SplitShares {
        supplier: supplier_share,
        csp: csp_share,
        vmc: amount - csp_share - supplier_share,
    }
}

/// Applies sales to participant balances and the global total.
#[derive(Clone, Debug)]
pub struct TransactionSplitEngine {
    store: LedgerStore,
}

impl TransactionSplitEngine {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Record a sale of `amount` and credit the three participants.
    ///
    /// Every read happens before the first write, so a missing account or an
    /// uninitialized total leaves the store untouched. Negative amounts
    /// reverse an earlier sale.
    pub fn record_transaction(
        &self,
        tx: &TransactionId,
        amount: f64,
        supplier: &AccountName,
        csp: &AccountName,
        vmc: &AccountName,
    ) -> LedgerResult<TransactionRecord> {
        if !amount.is_finite() {
            return Err(LedgerError::InvalidArgument(format!(
                "transaction amount must be finite, got {amount}"
            )));
        }
        KeyCodec::check_record_id(TransactionId::KIND, tx.as_str())?;
        for name in [supplier, csp, vmc] {
            KeyCodec::check_record_id(AccountName::KIND, name.as_str())?;
        }
        if supplier == csp || supplier == vmc || csp == vmc {
            return Err(LedgerError::InvalidArgument(format!(
                "transaction {tx} needs three distinct participants, got {supplier}, {csp}, {vmc}"
            )));
        }

        let supplier_balance = self.account_decimal(supplier, KeyCodec::balance(supplier))?;
        let csp_balance = self.account_decimal(csp, KeyCodec::balance(csp))?;
        let vmc_balance = self.account_decimal(vmc, KeyCodec::balance(vmc))?;
        let total = self
            .store
            .get_decimal(TOTAL_BALANCE_KEY)?
            .ok_or_else(|| LedgerError::TotalNotInitialized(TOTAL_BALANCE_KEY.into()))?;
        let csp_pct = self.account_percentage(csp)?;
        let supplier_pct = self.account_percentage(supplier)?;

        let shares = split(amount, csp_pct, supplier_pct);
        let new_supplier = supplier_balance + shares.supplier;
        let new_csp = csp_balance + shares.csp;
        let new_vmc = vmc_balance + shares.vmc;
        let new_total = total + amount;
        for value in [new_supplier, new_csp, new_vmc, new_total] {
            if !value.is_finite() {
                return Err(LedgerError::InvalidArgument(format!(
                    "transaction {tx} overflows a balance"
                )));
            }
        }

        let record = TransactionRecord {
            transaction_id: tx.to_string(),
            amount,
            supplier: supplier.to_string(),
            csp: csp.to_string(),
            vmc: vmc.to_string(),
            balances: vec![
                BalanceEntry {
                    company_name: supplier.to_string(),
                    balance: new_supplier,
                },
                BalanceEntry {
                    company_name: csp.to_string(),
                    balance: new_csp,
                },
                BalanceEntry {
                    company_name: vmc.to_string(),
                    balance: new_vmc,
                },
            ],
        };
        let json = serde_json::to_string(&record).map_err(|e| LedgerError::CorruptRecord {
            key: KeyCodec::transaction(tx),
            reason: e.to_string(),
        })?;

        let updates = [(csp, new_csp), (supplier, new_supplier), (vmc, new_vmc)];
        for (name, balance) in updates {
            self.store
                .put_decimal(&KeyCodec::balance_snapshot(name, tx), balance)?;
        }
        for (name, balance) in updates {
            self.store.put_decimal(&KeyCodec::balance(name), balance)?;
        }
        self.store.put_decimal(TOTAL_BALANCE_KEY, new_total)?;
        self.store.put_string(&KeyCodec::transaction(tx), &json)?;

        debug!(%tx, supplier = shares.supplier, csp = shares.csp, vmc = shares.vmc, "shares applied");
        info!(%tx, amount, total = new_total, "transaction recorded");
        Ok(record)
    }

    /// The record stored under `tx`.
    pub fn transaction(&self, tx: &TransactionId) -> LedgerResult<TransactionRecord> {
        let key = KeyCodec::transaction(tx);
        let json = self.store.require_string(&key)?;
        serde_json::from_str(&json).map_err(|e| LedgerError::CorruptRecord {
            key,
            reason: e.to_string(),
        })
    }

    fn account_decimal(&self, name: &AccountName, key: String) -> LedgerResult<f64> {
        match self.store.get_decimal(&key)? {
            Some(value) => Ok(value),
            None => Err(account_not_found(name, key)),
        }
    }

    fn account_percentage(&self, name: &AccountName) -> LedgerResult<Percentage> {
        let key = KeyCodec::percentage(name);
        let raw = self.account_decimal(name, key.clone())?;
        Percentage::new(raw).map_err(|e| LedgerError::CorruptRecord {
            key,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;
    use vml_store::InMemoryKvStore;

    use super::*;
    use crate::accounts::AccountRegistry;
    use crate::records::AccountRole;

    fn name(s: &str) -> AccountName {
        AccountName::parse(s).unwrap()
    }

    fn tx(s: &str) -> TransactionId {
        TransactionId::parse(s).unwrap()
    }

    fn pct(v: f64) -> Percentage {
        Percentage::new(v).unwrap()
    }

    fn setup() -> (LedgerStore, AccountRegistry, TransactionSplitEngine) {
        let store = LedgerStore::new(Arc::new(InMemoryKvStore::new()));
        let accounts = AccountRegistry::new(store.clone());
        accounts
            .create_account(AccountRole::Csp, &name("C"), Some(pct(0.10)), 0.0)
            .unwrap();
        accounts
            .create_account(AccountRole::Supplier, &name("S"), Some(pct(0.20)), 0.0)
            .unwrap();
        accounts
            .create_account(AccountRole::Vmc, &name("V"), None, 0.0)
            .unwrap();
        accounts.init_total(0.0).unwrap();
        (store.clone(), accounts, TransactionSplitEngine::new(store))
    }

    #[test]
    fn split_gives_vmc_the_residual() {
        let shares = split(100.0, pct(0.10), pct(0.20));
        assert_eq!(shares.csp, 10.0);
        assert_eq!(shares.supplier, 20.0);
        assert_eq!(shares.vmc, 70.0);
        assert_eq!(shares.total(), 100.0);
    }

    #[test]
    fn records_sale_and_updates_balances() {
        let (store, accounts, engine) = setup();
        let record = engine
            .record_transaction(&tx("T1"), 100.0, &name("S"), &name("C"), &name("V"))
            .unwrap();

        assert_eq!(accounts.balance(&name("C")).unwrap(), 10.0);
        assert_eq!(accounts.balance(&name("S")).unwrap(), 20.0);
        assert_eq!(accounts.balance(&name("V")).unwrap(), 70.0);
        assert_eq!(accounts.total().unwrap(), 100.0);

        assert_eq!(record.balance_of("S"), Some(20.0));
        assert_eq!(record.balances[0].company_name, "S");
        assert_eq!(record.balances[1].company_name, "C");
        assert_eq!(record.balances[2].company_name, "V");

        assert_eq!(store.require_string("C_Balance_T1").unwrap(), "10");
        assert_eq!(engine.transaction(&tx("T1")).unwrap(), record);
    }

    #[test]
    fn snapshots_match_live_balances_after_recording() {
        let (_, accounts, engine) = setup();
        engine
            .record_transaction(&tx("T1"), 12.5, &name("S"), &name("C"), &name("V"))
            .unwrap();
        engine
            .record_transaction(&tx("T2"), 7.0, &name("S"), &name("C"), &name("V"))
            .unwrap();
        for n in ["S", "C", "V"] {
            assert_eq!(
                accounts.balance_at_transaction(&name(n), &tx("T2")).unwrap(),
                accounts.balance(&name(n)).unwrap()
            );
        }
    }

    #[test]
    fn negative_amount_reverses() {
        let (_, accounts, engine) = setup();
        engine
            .record_transaction(&tx("T1"), 100.0, &name("S"), &name("C"), &name("V"))
            .unwrap();
        engine
            .record_transaction(&tx("R1"), -100.0, &name("S"), &name("C"), &name("V"))
            .unwrap();
        assert_eq!(accounts.total().unwrap(), 0.0);
        assert_eq!(accounts.balance(&name("C")).unwrap(), 0.0);
        assert_eq!(accounts.balance(&name("S")).unwrap(), 0.0);
        assert_eq!(accounts.balance(&name("V")).unwrap(), 0.0);
    }

    #[test]
    fn missing_account_writes_nothing() {
        let (store, _, engine) = setup();
        let err = engine
            .record_transaction(&tx("T1"), 100.0, &name("S"), &name("C"), &name("ghost"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound { name, key }
            if name == "ghost" && key == "ghost_Balance"));
        assert!(!store.exists("T1").unwrap());
        assert!(!store.exists("S_Balance_T1").unwrap());
        assert_eq!(store.require_string("S_Balance").unwrap(), "0");
    }

    #[test]
    fn vmc_in_csp_slot_lacks_percentage() {
        let (store, _, engine) = setup();
        let err = engine
            .record_transaction(&tx("T1"), 1.0, &name("S"), &name("V"), &name("C"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound { key, .. } if key == "V_Percentage"));
        assert!(!store.exists("T1").unwrap());
    }

    #[test]
    fn uninitialized_total_writes_nothing() {
        let (store, _, engine) = setup();
        store.delete(TOTAL_BALANCE_KEY).unwrap();
        assert!(matches!(
            engine
                .record_transaction(&tx("T1"), 1.0, &name("S"), &name("C"), &name("V"))
                .unwrap_err(),
            LedgerError::TotalNotInitialized(_)
        ));
        assert!(!store.exists("T1").unwrap());
    }

    #[test]
    fn duplicate_participants_rejected() {
        let (_, _, engine) = setup();
        assert!(matches!(
            engine
                .record_transaction(&tx("T1"), 1.0, &name("S"), &name("S"), &name("V"))
                .unwrap_err(),
            LedgerError::InvalidArgument(_)
        ));
    }

    #[test]
    fn unknown_transaction_is_key_not_found() {
        let (_, _, engine) = setup();
        assert!(matches!(
            engine.transaction(&tx("nope")).unwrap_err(),
            LedgerError::KeyNotFound(k) if k == "nope"
        ));
    }

    proptest! {
        #[test]
        fn shares_sum_to_amount(
            amount in -1.0e9f64..1.0e9,
            csp in 0.0f64..=0.5,
            supplier in 0.0f64..=0.5,
        ) {
            let shares = split(amount, pct(csp), pct(supplier));
            let tolerance = amount.abs().max(1.0) * 1e-12;
            prop_assert!((shares.total() - amount).abs() <= tolerance);
        }
    }

    #[test]
    fn transaction_id_cannot_overwrite_a_balance() {
        let (_, accounts, engine) = setup();
        let err = engine
            .record_transaction(&tx("V_Balance"), 100.0, &name("S"), &name("C"), &name("V"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidArgument(_)));
        assert_eq!(accounts.balance(&name("V")).unwrap(), 0.0);
        assert_eq!(accounts.total().unwrap(), 0.0);

        assert!(engine
            .record_transaction(&tx("T1"), 1.0, &name("S"), &name("C"), &name("V_Balance"))
            .is_err());
    }
}
