//! Executes parsed requests against a [`Ledger`] and encodes responses.

use serde::Serialize;
use tracing::{debug, info};
use vml_ledger::{KeyCodec, Ledger};

use crate::error::{ProtocolError, ProtocolResult};
use crate::request::{Invoke, Query};

/// Response of `getInventoryByEntityAndProduct`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuantityResponse {
    pub quantity: String,
}

/// Routes named operations to the ledger.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    ledger: Ledger,
}

impl Dispatcher {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Parse and run a state-changing operation.
    pub fn invoke(&self, operation: &str, args: &[String]) -> ProtocolResult<Vec<u8>> {
        debug!(operation, args = args.len(), "invoke");
        let request = Invoke::parse(operation, args)?;
        self.execute_invoke(&request)
    }

    /// Parse and run a read-only operation.
    pub fn query(&self, operation: &str, args: &[String]) -> ProtocolResult<Vec<u8>> {
        debug!(operation, args = args.len(), "query");
        let request = Query::parse(operation, args)?;
        self.execute_query(&request)
    }

    pub fn execute_invoke(&self, request: &Invoke) -> ProtocolResult<Vec<u8>> {
        let ledger = &self.ledger;
        match request {
            Invoke::Init { total } => ledger.accounts().init_total(*total)?,
            Invoke::AddAccount {
                role,
                name,
                percentage,
                balance,
            } => ledger
                .accounts()
                .create_account(*role, name, *percentage, *balance)?,
            Invoke::RemoveAccount { role, name } => ledger.accounts().remove_account(*role, name)?,
            Invoke::ResetBalance { name, balance } => {
                ledger.accounts().set_balance(name, *balance)?
            }
            Invoke::UpdatePercentage { name, percentage } => {
                ledger.accounts().set_percentage(name, *percentage)?
            }
            Invoke::RecordTransaction {
                tx,
                amount,
                supplier,
                csp,
                vmc,
            } => {
                let record = ledger
                    .transactions()
                    .record_transaction(tx, *amount, supplier, csp, vmc)?;
                return to_json(&record);
            }
            Invoke::AddSim {
                id,
                status,
                manufacturer,
            } => ledger.sims().add_sim(id, status, manufacturer)?,
            Invoke::ActivateSim { id, activation } => ledger.sims().activate_sim(id, activation)?,
            Invoke::DeactivateSim { id } => ledger.sims().deactivate_sim(id)?,
            Invoke::RemoveSim { id } => ledger.sims().remove_sim(id)?,
            Invoke::CreateProduct {
                id,
                entity,
                details,
            } => ledger.catalog().create_product(id, entity, details)?,
            Invoke::RemoveProduct { id } => ledger.catalog().remove_product(id)?,
            Invoke::UpdateInventory {
                entity,
                location,
                product,
                delta,
            } => {
                let update = ledger
                    .inventory()
                    .update_inventory(entity, location, product, *delta)?;
                return to_json(&update);
            }
            Invoke::ReconcileInventory { entity } => {
                let changed = ledger.inventory().reconcile(entity)?;
                info!(%entity, changed, "reconcile requested");
            }
        }
        Ok(Vec::new())
    }

    pub fn execute_query(&self, request: &Query) -> ProtocolResult<Vec<u8>> {
        let ledger = &self.ledger;
        match request {
            Query::Read { key } => Ok(ledger.read(key)?),
            Query::GetTransaction { tx } => Ok(ledger.read(&KeyCodec::transaction(tx))?),
            Query::GetBalance { name } => Ok(ledger.read(&KeyCodec::balance(name))?),
            Query::GetBalanceWithTransaction { tx, name } => {
                Ok(ledger.read(&KeyCodec::balance_snapshot(name, tx))?)
            }
            Query::GetSim { id } => to_json(&ledger.sims().get_sim(id)?),
            Query::ReadProduct { id } => to_json(&ledger.catalog().read_product(id)?),
            Query::ReadAllProducts => to_json(&ledger.catalog().read_all_products()?),
            Query::InventoryByProduct { entity, product } => {
                let quantity = ledger.inventory().quantity_by_product(entity, product)?;
                to_json(&QuantityResponse {
                    quantity: quantity.to_string(),
                })
            }
            Query::InventoryByLocation { entity, location } => {
                to_json(&ledger.inventory().by_location(entity, location)?)
            }
            Query::AllInventoryByEntity { entity } => {
                to_json(&ledger.inventory().all_by_entity(entity)?)
            }
            Query::AllInventory => to_json(&ledger.inventory().all_inventory()?),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> ProtocolResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| ProtocolError::Serialization(e.to_string()))
}
