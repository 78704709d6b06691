//! The [`Ledger`] handle.

use std::sync::Arc;

use vml_store::{InMemoryKvStore, KvStore, LedgerStore};

use crate::accounts::AccountRegistry;
use crate::catalog::ProductCatalog;
use crate::error::{LedgerError, LedgerResult};
use crate::inventory::InventoryTracker;
use crate::sim::SimRegistry;
use crate::transactions::TransactionSplitEngine;

/// Every ledger component over one shared store.
///
/// Cloning is cheap; clones see the same data.
#[derive(Clone, Debug)]
pub struct Ledger {
    store: LedgerStore,
    accounts: AccountRegistry,
    transactions: TransactionSplitEngine,
    inventory: InventoryTracker,
    catalog: ProductCatalog,
    sims: SimRegistry,
}

impl Ledger {
    pub fn new(backend: Arc<dyn KvStore>) -> Self {
        let store = LedgerStore::new(backend);
        Self {
            accounts: AccountRegistry::new(store.clone()),
            transactions: TransactionSplitEngine::new(store.clone()),
            inventory: InventoryTracker::new(store.clone()),
            catalog: ProductCatalog::new(store.clone()),
            sims: SimRegistry::new(store.clone()),
            store,
        }
    }

    /// A ledger over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryKvStore::new()))
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn accounts(&self) -> &AccountRegistry {
        &self.accounts
    }

    pub fn transactions(&self) -> &TransactionSplitEngine {
        &self.transactions
    }

    pub fn inventory(&self) -> &InventoryTracker {
        &self.inventory
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn sims(&self) -> &SimRegistry {
        &self.sims
    }

    /// Raw value under any key.
    pub fn read(&self, key: &str) -> LedgerResult<Vec<u8>> {
        self.store
            .get_raw(key)?
            .ok_or_else(|| LedgerError::KeyNotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::AccountRole;
    use vml_types::{AccountName, EntityId, LocationId, Percentage, ProductId, TransactionId};

    #[test]
    fn components_share_one_store() {
        let ledger = Ledger::in_memory();
        let c = AccountName::parse("C").unwrap();
        let s = AccountName::parse("S").unwrap();
        let v = AccountName::parse("V").unwrap();

        ledger
            .accounts()
            .create_account(AccountRole::Csp, &c, Some(Percentage::new(0.1).unwrap()), 0.0)
            .unwrap();
        ledger
            .accounts()
            .create_account(AccountRole::Supplier, &s, Some(Percentage::new(0.2).unwrap()), 0.0)
            .unwrap();
        ledger
            .accounts()
            .create_account(AccountRole::Vmc, &v, None, 0.0)
            .unwrap();
        ledger.accounts().init_total(0.0).unwrap();
        ledger
            .transactions()
            .record_transaction(&TransactionId::parse("T1").unwrap(), 100.0, &s, &c, &v)
            .unwrap();

        assert_eq!(ledger.read("V_Balance").unwrap(), b"70");
        assert_eq!(ledger.read("Total_Balance").unwrap(), b"100");

        let clone = ledger.clone();
        clone
            .inventory()
            .update_inventory(
                &EntityId::parse("E1").unwrap(),
                &LocationId::parse("L1").unwrap(),
                &ProductId::parse("P1").unwrap(),
                2,
            )
            .unwrap();
        assert_eq!(ledger.read("InventoryByProduct##E1##P1").unwrap(), b"2");
    }

    #[test]
    fn read_missing_key() {
        assert!(matches!(
            Ledger::in_memory().read("nothing").unwrap_err(),
            LedgerError::KeyNotFound(k) if k == "nothing"
        ));
    }
}
