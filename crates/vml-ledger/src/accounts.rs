//! Named financial accounts and the global total.
//!
//! An account is two independent keys: `{name}_Balance` and, for CSPs and
//! suppliers, `{name}_Percentage`. Per-transaction snapshots
//! (`{name}_Balance_{txId}`) are audit records owned by the split engine and
//! survive account removal.

use tracing::info;
use vml_store::LedgerStore;
use vml_types::{AccountName, Percentage, TransactionId};

use crate::error::{LedgerError, LedgerResult};
use crate::keys::{KeyCodec, TOTAL_BALANCE_KEY};
use crate::records::AccountRole;

/// CRUD over VMC, CSP and supplier accounts.
#[derive(Clone, Debug)]
pub struct AccountRegistry {
    store: LedgerStore,
}

impl AccountRegistry {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Create (or overwrite) an account.
    ///
    /// CSPs and suppliers must be given a percentage; VMCs must not.
    pub fn create_account(
        &self,
        role: AccountRole,
        name: &AccountName,
        percentage: Option<Percentage>,
        initial_balance: f64,
    ) -> LedgerResult<()> {
        match (role.has_percentage(), percentage) {
            (true, None) => {
                return Err(LedgerError::InvalidArgument(format!(
                    "{} account {name} requires a percentage",
                    role.label()
                )))
            }
            (false, Some(_)) => {
                return Err(LedgerError::InvalidArgument(format!(
                    "{} account {name} takes no percentage",
                    role.label()
                )))
            }
            _ => {}
        }
        KeyCodec::check_record_id(AccountName::KIND, name.as_str())?;

        if let Some(pct) = percentage {
            self.store.put_decimal(&KeyCodec::percentage(name), pct.value())?;
        }
        self.store.put_decimal(&KeyCodec::balance(name), initial_balance)?;

        info!(role = role.label(), %name, initial_balance, "account created");
        Ok(())
    }

    /// Delete the live keys of an account. Snapshot keys are left intact.
    pub fn remove_account(&self, role: AccountRole, name: &AccountName) -> LedgerResult<()> {
        if role.has_percentage() {
            self.store.delete(&KeyCodec::percentage(name))?;
        }
        let existed = self.store.delete(&KeyCodec::balance(name))?;
        info!(role = role.label(), %name, existed, "account removed");
        Ok(())
    }

    /// Overwrite the live balance of an existing account.
    ///
    /// Unlike a plain key write this never creates an account: a missing
    /// balance key fails with `AccountNotFound`. Use
    /// [`AccountRegistry::create_account`] first.
    pub fn set_balance(&self, name: &AccountName, value: f64) -> LedgerResult<()> {
        let key = KeyCodec::balance(name);
        if !self.store.exists(&key)? {
            return Err(account_not_found(name, key));
        }
        self.store.put_decimal(&key, value)?;
        info!(%name, balance = value, "balance reset");
        Ok(())
    }

    /// Overwrite the split percentage of an existing CSP or supplier.
    ///
    /// A missing percentage key fails with `AccountNotFound` instead of
    /// being created, so a VMC cannot silently gain a share.
    pub fn set_percentage(&self, name: &AccountName, value: Percentage) -> LedgerResult<()> {
        let key = KeyCodec::percentage(name);
        if !self.store.exists(&key)? {
            return Err(account_not_found(name, key));
        }
        self.store.put_decimal(&key, value.value())?;
        info!(%name, percentage = value.value(), "percentage updated");
        Ok(())
    }

    /// Current balance; `KeyNotFound` if the account does not exist.
    pub fn balance(&self, name: &AccountName) -> LedgerResult<f64> {
        Ok(self.store.require_decimal(&KeyCodec::balance(name))?)
    }

    /// Current split percentage; `KeyNotFound` for VMCs and unknown accounts.
    pub fn percentage(&self, name: &AccountName) -> LedgerResult<Percentage> {
        let key = KeyCodec::percentage(name);
        let raw = self.store.require_decimal(&key)?;
        Percentage::new(raw).map_err(|e| LedgerError::CorruptRecord {
            key,
            reason: e.to_string(),
        })
    }

    /// Balance of `name` recorded right after transaction `tx`.
    pub fn balance_at_transaction(
        &self,
        name: &AccountName,
        tx: &TransactionId,
    ) -> LedgerResult<f64> {
        Ok(self
            .store
            .require_decimal(&KeyCodec::balance_snapshot(name, tx))?)
    }

    /// Set the global total (ledger initialization).
    pub fn init_total(&self, value: f64) -> LedgerResult<()> {
        self.store.put_decimal(TOTAL_BALANCE_KEY, value)?;
        info!(total = value, "global total initialized");
        Ok(())
    }

    /// Sum of all recorded transaction amounts.
    pub fn total(&self) -> LedgerResult<f64> {
        self.store
            .get_decimal(TOTAL_BALANCE_KEY)?
            .ok_or_else(|| LedgerError::TotalNotInitialized(TOTAL_BALANCE_KEY.into()))
    }
}

pub(crate) fn account_not_found(name: &AccountName, key: String) -> LedgerError {
    LedgerError::AccountNotFound {
        name: name.to_string(),
        key,
    }
}
