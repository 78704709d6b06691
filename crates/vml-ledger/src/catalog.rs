//! Product catalog.
//!
//! A product is five attribute keys plus a `Product_{id}` listing marker whose
//! value is the product id. Listing scans resolve each marker back to its
//! attribute keys.

use tracing::{info, warn};
use vml_store::LedgerStore;
use vml_types::{EntityId, ProductId};

use crate::error::LedgerResult;
use crate::keys::{Attribute, KeyCodec, PRODUCT_LISTING_PREFIX};
use crate::records::{Product, ProductDetails};

#[derive(Clone, Debug)]
pub struct ProductCatalog {
    store: LedgerStore,
}

impl ProductCatalog {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Create or overwrite a product.
    pub fn create_product(
        &self,
        id: &ProductId,
        entity: &EntityId,
        details: &ProductDetails,
    ) -> LedgerResult<()> {
        KeyCodec::check_record_id(ProductId::KIND, id.as_str())?;
        self.store
            .put_string(&KeyCodec::product_listing(id), id.as_str())?;
        for (attribute, value) in Attribute::PRODUCT.into_iter().zip([
            entity.as_str(),
            details.name.as_str(),
            details.image.as_str(),
            details.price.as_str(),
            details.qr_code.as_str(),
        ]) {
            self.store
                .put_string(&KeyCodec::product_attribute(id, attribute), value)?;
        }
        info!(product = %id, %entity, "product created");
        Ok(())
    }

    /// Delete the listing marker and every attribute key.
    pub fn remove_product(&self, id: &ProductId) -> LedgerResult<()> {
        let existed = self.store.delete(&KeyCodec::product_listing(id))?;
        for attribute in Attribute::PRODUCT {
            self.store
                .delete(&KeyCodec::product_attribute(id, attribute))?;
        }
        info!(product = %id, existed, "product removed");
        Ok(())
    }

    /// Read a product; absent attributes come back empty.
    pub fn read_product(&self, id: &ProductId) -> LedgerResult<Product> {
        let field = |attribute| {
            self.store
                .get_string_or_empty(&KeyCodec::product_attribute(id, attribute))
        };
        Ok(Product {
            product_id: id.to_string(),
            entity_id: field(Attribute::Entity)?,
            details: ProductDetails {
                name: field(Attribute::Name)?,
                image: field(Attribute::Image)?,
                price: field(Attribute::Price)?,
                qr_code: field(Attribute::QrCode)?,
            },
        })
    }

    /// Every listed product, in id order.
    pub fn read_all_products(&self) -> LedgerResult<Vec<Product>> {
        let mut products = Vec::new();
        for (key, value) in self.store.scan_prefix(PRODUCT_LISTING_PREFIX)? {
            let raw = if value.is_empty() {
                KeyCodec::parse_product_listing(&key).unwrap_or_default()
            } else {
                value.as_str()
            };
            match ProductId::parse(raw) {
                Ok(id) => products.push(self.read_product(&id)?),
                Err(err) => warn!(%key, %err, "skipping malformed product listing"),
            }
        }
        Ok(products)
    }
}
