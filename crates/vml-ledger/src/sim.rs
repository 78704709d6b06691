//! eSIM identity registry.

use tracing::info;
use vml_store::LedgerStore;
use vml_types::SimId;

use crate::error::LedgerResult;
use crate::keys::{Attribute, KeyCodec};
use crate::records::{SimActivation, SimIdentity, SimStatus};

/// Lifecycle of SIM identities: provisioned, activated for a CSP and end
/// user, deactivated, removed.
#[derive(Clone, Debug)]
pub struct SimRegistry {
    store: LedgerStore,
}

impl SimRegistry {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    pub fn add_sim(&self, id: &SimId, status: &SimStatus, manufacturer: &str) -> LedgerResult<()> {
        KeyCodec::check_record_id(SimId::KIND, id.as_str())?;
        self.put(id, Attribute::Status, status.as_str())?;
        self.put(id, Attribute::Manufacturer, manufacturer)?;
        info!(sim = %id, %status, "SIM added");
        Ok(())
    }

    pub fn activate_sim(&self, id: &SimId, activation: &SimActivation) -> LedgerResult<()> {
        KeyCodec::check_record_id(SimId::KIND, id.as_str())?;
        self.put(id, Attribute::Status, SimStatus::Active.as_str())?;
        for (attribute, value) in Attribute::SIM_ACTIVATION.into_iter().zip([
            activation.csp.as_str(),
            activation.end_user.as_str(),
            activation.iot_id.as_str(),
            activation.iot_secret.as_str(),
        ]) {
            self.put(id, attribute, value)?;
        }
        info!(sim = %id, csp = %activation.csp, "SIM activated");
        Ok(())
    }

    /// Mark inactive and drop the activation fields.
    pub fn deactivate_sim(&self, id: &SimId) -> LedgerResult<()> {
        self.put(id, Attribute::Status, SimStatus::Inactive.as_str())?;
        self.clear_activation(id)?;
        info!(sim = %id, "SIM deactivated");
        Ok(())
    }

    /// Delete every key of the SIM, activation fields included.
    pub fn remove_sim(&self, id: &SimId) -> LedgerResult<()> {
        self.store
            .delete(&KeyCodec::sim_attribute(id, Attribute::Status))?;
        self.store
            .delete(&KeyCodec::sim_attribute(id, Attribute::Manufacturer))?;
        self.clear_activation(id)?;
        info!(sim = %id, "SIM removed");
        Ok(())
    }

    /// Read a SIM; absent fields come back empty.
    pub fn get_sim(&self, id: &SimId) -> LedgerResult<SimIdentity> {
        let field =
            |attribute| self.store.get_string_or_empty(&KeyCodec::sim_attribute(id, attribute));
        Ok(SimIdentity {
            sim_id: id.to_string(),
            status: field(Attribute::Status)?,
            manufacturer: field(Attribute::Manufacturer)?,
            csp: field(Attribute::Csp)?,
            end_user: field(Attribute::EndUser)?,
            iot_id: field(Attribute::IotId)?,
            iot_secret: field(Attribute::IotSecret)?,
        })
    }

    fn put(&self, id: &SimId, attribute: Attribute, value: &str) -> LedgerResult<()> {
        Ok(self
            .store
            .put_string(&KeyCodec::sim_attribute(id, attribute), value)?)
    }

    fn clear_activation(&self, id: &SimId) -> LedgerResult<()> {
        for attribute in Attribute::SIM_ACTIVATION {
            self.store.delete(&KeyCodec::sim_attribute(id, attribute))?;
        }
        Ok(())
    }
}
