//! Composite key encoding for the ledger namespace.
//!
//! Two key families share one flat namespace:
//!
//! - **Attribute keys** `{id}_{Attribute}` hold one field of one record
//!   (`V_Balance`, `P1_Price`, `S-7_Status`). Per-transaction balance
//!   snapshots extend this to `{name}_Balance_{txId}`; the product listing
//!   marker is `Product_{id}`; the global total lives under `Total_Balance`;
//!   transaction records live under the bare transaction id.
//! - **Dimensional keys** join segments with [`SEPARATOR`]:
//!   `InventoryByLocation##{entity}##{location}##{product}` and
//!   `InventoryByProduct##{entity}##{product}`. Fixing a prefix up to and
//!   including a trailing separator selects every entry below it.
//!
//! Parsing a scanned dimensional key strips the known prefix and splits the
//! remainder at the first separator. That is only sound because identifiers
//! can never contain `#` (see [`vml_types::validate_identifier`]).
//!
//! Attribute keys stay unambiguous only if no id that appears in them has a
//! `_`-separated segment equal to an attribute name, `Product` or `Total`.
//! [`KeyCodec::check_record_id`] enforces that: the first reserved segment of
//! a key then always marks its attribute.

use vml_types::{AccountName, EntityId, LocationId, ProductId, SimId, TransactionId};

use crate::error::{LedgerError, LedgerResult};

/// Segment separator for dimensional keys.
pub const SEPARATOR: &str = "##";

/// Singleton key holding the sum of all recorded transaction amounts.
pub const TOTAL_BALANCE_KEY: &str = "Total_Balance";

/// Prefix of the per-product listing markers.
pub const PRODUCT_LISTING_PREFIX: &str = "Product_";

/// Leading segments of the two singleton-style key families.
const RESERVED_PREFIXES: [&str; 2] = ["Product", "Total"];

pub const INVENTORY_BY_LOCATION: &str = "InventoryByLocation";
pub const INVENTORY_BY_PRODUCT: &str = "InventoryByProduct";

/// Closed set of single-valued record attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Balance,
    Percentage,
    Entity,
    Name,
    Image,
    Price,
    QrCode,
    Status,
    Manufacturer,
    Csp,
    EndUser,
    IotId,
    IotSecret,
}

impl Attribute {
    pub const ALL: [Attribute; 13] = [
        Attribute::Balance,
        Attribute::Percentage,
        Attribute::Entity,
        Attribute::Name,
        Attribute::Image,
        Attribute::Price,
        Attribute::QrCode,
        Attribute::Status,
        Attribute::Manufacturer,
        Attribute::Csp,
        Attribute::EndUser,
        Attribute::IotId,
        Attribute::IotSecret,
    ];

    /// Product record fields, in listing order.
    pub const PRODUCT: [Attribute; 5] = [
        Attribute::Entity,
        Attribute::Name,
        Attribute::Image,
        Attribute::Price,
        Attribute::QrCode,
    ];

    /// SIM fields that only exist while the SIM is active.
    pub const SIM_ACTIVATION: [Attribute; 4] = [
        Attribute::Csp,
        Attribute::EndUser,
        Attribute::IotId,
        Attribute::IotSecret,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Attribute::Balance => "Balance",
            Attribute::Percentage => "Percentage",
            Attribute::Entity => "Entity",
            Attribute::Name => "Name",
            Attribute::Image => "Image",
            Attribute::Price => "Price",
            Attribute::QrCode => "QRCode",
            Attribute::Status => "Status",
            Attribute::Manufacturer => "Manufacturer",
            Attribute::Csp => "CSP",
            Attribute::EndUser => "EndUser",
            Attribute::IotId => "IoTId",
            Attribute::IotSecret => "IoTSecret",
        }
    }
}

/// Builds and parses every key the ledger reads or writes.
pub struct KeyCodec;

impl KeyCodec {
    /// Reject an id that would alias another record's attribute key.
    ///
    /// Applies to account names, transaction ids, product ids and SIM ids.
    /// Matching is per `_` segment and case-sensitive, so `slot_3` and
    /// `Balanced` pass while `V_Balance` and `Total` do not.
    pub fn check_record_id(kind: &'static str, id: &str) -> LedgerResult<()> {
        match id.split('_').find_map(reserved_segment) {
            Some(segment) => Err(LedgerError::InvalidArgument(format!(
                "{kind} {id:?} contains reserved key segment {segment:?}"
            ))),
            None => Ok(()),
        }
    }

    /// `{id}_{attribute}`
    pub fn attribute(id: &str, attribute: Attribute) -> String {
        format!("{id}_{}", attribute.as_str())
    }

    pub fn balance(name: &AccountName) -> String {
        Self::attribute(name.as_str(), Attribute::Balance)
    }

    pub fn percentage(name: &AccountName) -> String {
        Self::attribute(name.as_str(), Attribute::Percentage)
    }

    /// `{name}_Balance_{txId}`: balance of `name` right after `tx`.
    pub fn balance_snapshot(name: &AccountName, tx: &TransactionId) -> String {
        format!("{}_{tx}", Self::balance(name))
    }

    /// Key of the consolidated transaction record.
    pub fn transaction(tx: &TransactionId) -> String {
        tx.to_string()
    }

    pub fn product_listing(id: &ProductId) -> String {
        format!("{PRODUCT_LISTING_PREFIX}{id}")
    }

    pub fn product_attribute(id: &ProductId, attribute: Attribute) -> String {
        Self::attribute(id.as_str(), attribute)
    }

    pub fn sim_attribute(id: &SimId, attribute: Attribute) -> String {
        Self::attribute(id.as_str(), attribute)
    }

    pub fn inventory_by_location(
        entity: &EntityId,
        location: &LocationId,
        product: &ProductId,
    ) -> String {
        format!("{}{product}", Self::location_prefix(entity, location))
    }

    pub fn inventory_by_product(entity: &EntityId, product: &ProductId) -> String {
        format!("{}{product}", Self::entity_products_prefix(entity))
    }

    /// `InventoryByLocation##{entity}##{location}##`
    pub fn location_prefix(entity: &EntityId, location: &LocationId) -> String {
        format!("{}{location}{SEPARATOR}", Self::entity_locations_prefix(entity))
    }

    /// `InventoryByLocation##{entity}##`
    pub fn entity_locations_prefix(entity: &EntityId) -> String {
        format!("{}{entity}{SEPARATOR}", Self::all_locations_prefix())
    }

    /// `InventoryByLocation##`
    pub fn all_locations_prefix() -> String {
        format!("{INVENTORY_BY_LOCATION}{SEPARATOR}")
    }

    /// `InventoryByProduct##{entity}##`
    pub fn entity_products_prefix(entity: &EntityId) -> String {
        format!("{INVENTORY_BY_PRODUCT}{SEPARATOR}{entity}{SEPARATOR}")
    }

    /// Remainder of `key` after `prefix`, if `key` starts with it and the
    /// remainder is non-empty.
    pub fn strip<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
        key.strip_prefix(prefix).filter(|rest| !rest.is_empty())
    }

    /// Split a remainder at the first separator into `(head, tail)`.
    pub fn split_first(rest: &str) -> Option<(&str, &str)> {
        rest.split_once(SEPARATOR)
            .filter(|(head, tail)| !head.is_empty() && !tail.is_empty())
    }

    /// Product id of a key scanned under [`KeyCodec::location_prefix`].
    pub fn parse_location_product<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
        Self::strip(key, prefix).filter(|rest| !rest.contains(SEPARATOR))
    }

    /// `(location, product)` of a key scanned under
    /// [`KeyCodec::entity_locations_prefix`].
    pub fn parse_entity_location<'a>(key: &'a str, prefix: &str) -> Option<(&'a str, &'a str)> {
        let (location, product) = Self::split_first(Self::strip(key, prefix)?)?;
        (!product.contains(SEPARATOR)).then_some((location, product))
    }

    /// `(entity, location, product)` of any by-location key.
    pub fn parse_inventory_by_location(key: &str) -> Option<(&str, &str, &str)> {
        let rest = Self::strip(key, &Self::all_locations_prefix())?;
        let (entity, rest) = Self::split_first(rest)?;
        let (location, product) = Self::split_first(rest)?;
        (!product.contains(SEPARATOR)).then_some((entity, location, product))
    }

    /// Product id of a key scanned under [`KeyCodec::entity_products_prefix`].
    pub fn parse_entity_product<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
        Self::strip(key, prefix).filter(|rest| !rest.contains(SEPARATOR))
    }

    /// Product id stored behind a `Product_{id}` listing key.
    pub fn parse_product_listing(key: &str) -> Option<&str> {
        Self::strip(key, PRODUCT_LISTING_PREFIX)
    }
}

fn reserved_segment(segment: &str) -> Option<&'static str> {
    Attribute::ALL
        .iter()
        .map(|attribute| attribute.as_str())
        .chain(RESERVED_PREFIXES)
        .find(|reserved| *reserved == segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(s: &str) -> EntityId {
        EntityId::parse(s).unwrap()
    }
    fn l(s: &str) -> LocationId {
        LocationId::parse(s).unwrap()
    }
    fn p(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    #[test]
    fn attribute_keys() {
        let v = AccountName::parse("V").unwrap();
        let tx = TransactionId::parse("T1").unwrap();
        assert_eq!(KeyCodec::balance(&v), "V_Balance");
        assert_eq!(KeyCodec::percentage(&v), "V_Percentage");
        assert_eq!(KeyCodec::balance_snapshot(&v, &tx), "V_Balance_T1");
        assert_eq!(KeyCodec::transaction(&tx), "T1");
        assert_eq!(KeyCodec::product_attribute(&p("P1"), Attribute::QrCode), "P1_QRCode");
        assert_eq!(KeyCodec::product_listing(&p("P1")), "Product_P1");
        let sim = SimId::parse("S1").unwrap();
        assert_eq!(KeyCodec::sim_attribute(&sim, Attribute::IotSecret), "S1_IoTSecret");
    }

    #[test]
    fn dimensional_keys() {
        assert_eq!(
            KeyCodec::inventory_by_location(&e("E1"), &l("L1"), &p("P1")),
            "InventoryByLocation##E1##L1##P1"
        );
        assert_eq!(
            KeyCodec::inventory_by_product(&e("E1"), &p("P1")),
            "InventoryByProduct##E1##P1"
        );
        assert_eq!(
            KeyCodec::location_prefix(&e("E1"), &l("L1")),
            "InventoryByLocation##E1##L1##"
        );
        assert_eq!(
            KeyCodec::entity_locations_prefix(&e("E1")),
            "InventoryByLocation##E1##"
        );
    }

    #[test]
    fn prefixes_are_prefixes_of_full_keys() {
        let key = KeyCodec::inventory_by_location(&e("E1"), &l("L1"), &p("P1"));
        assert!(key.starts_with(&KeyCodec::location_prefix(&e("E1"), &l("L1"))));
        assert!(key.starts_with(&KeyCodec::entity_locations_prefix(&e("E1"))));
        assert!(key.starts_with(&KeyCodec::all_locations_prefix()));
        // E1 must not select E10.
        let other = KeyCodec::inventory_by_location(&e("E10"), &l("L1"), &p("P1"));
        assert!(!other.starts_with(&KeyCodec::entity_locations_prefix(&e("E1"))));
    }

    #[test]
    fn parse_reverses_build() {
        let (ent, loc, prod) = (e("vm-7"), l("slot_3"), p("Water 50cl"));
        let key = KeyCodec::inventory_by_location(&ent, &loc, &prod);

        let prefix = KeyCodec::location_prefix(&ent, &loc);
        assert_eq!(KeyCodec::parse_location_product(&key, &prefix), Some("Water 50cl"));

        let prefix = KeyCodec::entity_locations_prefix(&ent);
        assert_eq!(
            KeyCodec::parse_entity_location(&key, &prefix),
            Some(("slot_3", "Water 50cl"))
        );

        assert_eq!(
            KeyCodec::parse_inventory_by_location(&key),
            Some(("vm-7", "slot_3", "Water 50cl"))
        );

        let total = KeyCodec::inventory_by_product(&ent, &prod);
        let prefix = KeyCodec::entity_products_prefix(&ent);
        assert_eq!(KeyCodec::parse_entity_product(&total, &prefix), Some("Water 50cl"));
    }

    #[test]
    fn record_ids_cannot_alias_attribute_keys() {
        for id in ["V_Balance", "Total", "Product", "Product_x", "a_Name_b", "S1_IoTSecret"] {
            let err = KeyCodec::check_record_id("account name", id).unwrap_err();
            assert!(matches!(err, LedgerError::InvalidArgument(_)), "{id}");
        }
        for id in ["V", "slot_3", "Balanced", "total", "vm_7_Cola", "_", "T1"] {
            KeyCodec::check_record_id("transaction id", id).unwrap();
        }
    }

    #[test]
    fn every_attribute_is_reserved() {
        for attribute in Attribute::ALL {
            let id = format!("x_{}", attribute.as_str());
            assert!(KeyCodec::check_record_id("product id", &id).is_err());
        }
    }

    #[test]
    fn parse_rejects_malformed_keys() {
        let prefix = "InventoryByLocation##E1##";
        assert_eq!(KeyCodec::parse_entity_location("InventoryByLocation##E1##", prefix), None);
        assert_eq!(KeyCodec::parse_entity_location("InventoryByLocation##E1##L1", prefix), None);
        assert_eq!(
            KeyCodec::parse_entity_location("InventoryByLocation##E1##L1##P1##x", prefix),
            None
        );
        assert_eq!(KeyCodec::parse_inventory_by_location("InventoryByProduct##E1##P1"), None);
        assert_eq!(KeyCodec::parse_product_listing("Product_"), None);
        assert_eq!(KeyCodec::parse_product_listing("Product_P9"), Some("P9"));
    }
}
