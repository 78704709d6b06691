//! Stock levels kept along two dimensions.
//!
//! Every change is written twice: once per `(entity, location, product)` and
//! once as the per-`(entity, product)` total. A key whose quantity drops to
//! zero or below is deleted, so absence means "no stock".

use std::collections::BTreeMap;

use tracing::{debug, info, warn};
use vml_store::LedgerStore;
use vml_types::{parse_quantity, EntityId, LocationId, ProductId};

use crate::error::{LedgerError, LedgerResult};
use crate::keys::KeyCodec;
use crate::records::{EntityStock, InventoryRow, InventoryUpdate, LocationStock};

/// Reads and updates the inventory key families.
#[derive(Clone, Debug)]
pub struct InventoryTracker {
    store: LedgerStore,
}

impl InventoryTracker {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Apply `delta` to one product in one location.
    ///
    /// Both new quantities are computed before either key is touched.
    pub fn update_inventory(
        &self,
        entity: &EntityId,
        location: &LocationId,
        product: &ProductId,
        delta: i64,
    ) -> LedgerResult<InventoryUpdate> {
        let location_key = KeyCodec::inventory_by_location(entity, location, product);
        let product_key = KeyCodec::inventory_by_product(entity, product);

        let location_quantity = self.apply_delta(&location_key, delta)?;
        let product_quantity = self.apply_delta(&product_key, delta)?;

        self.write_quantity(&location_key, location_quantity)?;
        self.write_quantity(&product_key, product_quantity)?;

        info!(%entity, %location, %product, delta, location_quantity, product_quantity, "inventory updated");
        Ok(InventoryUpdate {
            location_quantity: location_quantity.max(0),
            product_quantity: product_quantity.max(0),
        })
    }

    /// Total stock of `product` held by `entity`, 0 when absent.
    pub fn quantity_by_product(&self, entity: &EntityId, product: &ProductId) -> LedgerResult<i64> {
        let key = KeyCodec::inventory_by_product(entity, product);
        Ok(self.store.get_int(&key)?.unwrap_or(0).max(0))
    }

    /// Every product stocked at one location.
    pub fn by_location(
        &self,
        entity: &EntityId,
        location: &LocationId,
    ) -> LedgerResult<Vec<LocationStock>> {
        let prefix = KeyCodec::location_prefix(entity, location);
        Ok(self
            .positive_entries(&prefix)?
            .into_iter()
            .filter_map(|(key, quantity)| {
                let product = KeyCodec::parse_location_product(&key, &prefix);
                if product.is_none() {
                    warn!(%key, "skipping malformed inventory key");
                }
                product.map(|product_id| LocationStock {
                    product_id: product_id.to_string(),
                    quantity,
                })
            })
            .collect())
    }

    /// Every `(location, product)` stocked by `entity`.
    pub fn all_by_entity(&self, entity: &EntityId) -> LedgerResult<Vec<EntityStock>> {
        let prefix = KeyCodec::entity_locations_prefix(entity);
        Ok(self
            .positive_entries(&prefix)?
            .into_iter()
            .filter_map(|(key, quantity)| {
                let parsed = KeyCodec::parse_entity_location(&key, &prefix);
                if parsed.is_none() {
                    warn!(%key, "skipping malformed inventory key");
                }
                parsed.map(|(location_id, product_id)| EntityStock {
                    product_id: product_id.to_string(),
                    location_id: location_id.to_string(),
                    quantity,
                })
            })
            .collect())
    }

    /// Every by-location entry in the ledger.
    pub fn all_inventory(&self) -> LedgerResult<Vec<InventoryRow>> {
        Ok(self
            .positive_entries(&KeyCodec::all_locations_prefix())?
            .into_iter()
            .filter_map(|(key, quantity)| {
                let parsed = KeyCodec::parse_inventory_by_location(&key);
                if parsed.is_none() {
                    warn!(%key, "skipping malformed inventory key");
                }
                parsed.map(|(entity_id, location_id, product_id)| InventoryRow {
                    entity_id: entity_id.to_string(),
                    location_id: location_id.to_string(),
                    product_id: product_id.to_string(),
                    quantity,
                })
            })
            .collect())
    }

    /// Rebuild the per-product totals of `entity` from its by-location
    /// entries. Returns how many total keys were rewritten or removed.
    pub fn reconcile(&self, entity: &EntityId) -> LedgerResult<usize> {
        let mut expected: BTreeMap<String, i64> = BTreeMap::new();
        for stock in self.all_by_entity(entity)? {
            let sum = expected.entry(stock.product_id).or_insert(0);
            *sum = sum.checked_add(stock.quantity).ok_or_else(|| {
                LedgerError::InvalidArgument(format!("stock of {entity} overflows"))
            })?;
        }

        let prefix = KeyCodec::entity_products_prefix(entity);
        let mut changed = 0;

        for (key, text) in self.store.scan_prefix(&prefix)? {
            let Some(product) = KeyCodec::parse_entity_product(&key, &prefix) else {
                continue;
            };
            let current = parse_quantity("stored quantity", &text).ok();
            match expected.remove(product) {
                Some(want) if current == Some(want) => {}
                Some(want) => {
                    self.store.put_int(&key, want)?;
                    changed += 1;
                }
                None => {
                    self.store.delete(&key)?;
                    changed += 1;
                }
            }
        }
        for (product, want) in expected {
            self.store.put_int(&format!("{prefix}{product}"), want)?;
            changed += 1;
        }

        info!(%entity, changed, "inventory totals reconciled");
        Ok(changed)
    }

    fn apply_delta(&self, key: &str, delta: i64) -> LedgerResult<i64> {
        let current = self.store.get_int(key)?.unwrap_or(0);
        current.checked_add(delta).ok_or_else(|| {
            LedgerError::InvalidArgument(format!("quantity under {key} overflows"))
        })
    }

    fn write_quantity(&self, key: &str, quantity: i64) -> LedgerResult<()> {
        if quantity <= 0 {
            self.store.delete(key)?;
            debug!(key, "inventory entry cleared");
        } else {
            self.store.put_int(key, quantity)?;
        }
        Ok(())
    }

    /// Scan `prefix`, keeping entries whose value parses as a positive
    /// quantity.
    fn positive_entries(&self, prefix: &str) -> LedgerResult<Vec<(String, i64)>> {
        let entries = self.store.scan_prefix(prefix)?;
        debug!(prefix, hits = entries.len(), "inventory scan");
        Ok(entries
            .into_iter()
            .filter_map(|(key, text)| match parse_quantity("stored quantity", &text) {
                Ok(quantity) if quantity > 0 => Some((key, quantity)),
                Ok(_) => None,
                Err(_) => {
                    warn!(%key, value = %text, "skipping corrupt inventory value");
                    None
                }
            })
            .collect())
    }
}
