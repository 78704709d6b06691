//! Typed views of records that live as independent keys in the store.
//!
//! Serialized field names follow the ledger's external JSON format
//! (`companyName`, `relatedEntity`, `productQRCode`, ...). Quantities are
//! rendered as strings, like every other flat-map field.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use vml_types::AccountName;

/// Business role of an account. Only CSPs and suppliers carry a split
/// percentage; the VMC receives the residual.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountRole {
    Vmc,
    Csp,
    Supplier,
}

impl AccountRole {
    pub fn has_percentage(self) -> bool {
        matches!(self, AccountRole::Csp | AccountRole::Supplier)
    }

    pub fn label(self) -> &'static str {
        match self {
            AccountRole::Vmc => "VMC",
            AccountRole::Csp => "CSP",
            AccountRole::Supplier => "supplier",
        }
    }
}

/// Three-way division of one transaction amount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitShares {
    pub supplier: f64,
    pub csp: f64,
    pub vmc: f64,
}

impl SplitShares {
    pub fn total(&self) -> f64 {
        self.supplier + self.csp + self.vmc
    }
}

/// Balance of one participant right after a transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceEntry {
    pub company_name: String,
    pub balance: f64,
}

/// Consolidated record stored under the transaction id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub amount: f64,
    pub supplier: String,
    pub csp: String,
    pub vmc: String,
    /// Supplier, CSP and VMC balances, in that order.
    pub balances: Vec<BalanceEntry>,
}

impl TransactionRecord {
    /// Post-transaction balance of `name`, if it took part.
    pub fn balance_of(&self, name: &str) -> Option<f64> {
        self.balances
            .iter()
            .find(|b| b.company_name == name)
            .map(|b| b.balance)
    }
}

/// Descriptive product fields supplied at creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetails {
    #[serde(rename = "productName")]
    pub name: String,
    #[serde(rename = "productImg")]
    pub image: String,
    #[serde(rename = "productPrice")]
    pub price: String,
    #[serde(rename = "productQRCode")]
    pub qr_code: String,
}

/// A catalog entry as read back from the store. Fields whose keys are absent
/// read as empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "productId")]
    pub product_id: String,
    #[serde(rename = "relatedEntity")]
    pub entity_id: String,
    #[serde(flatten)]
    pub details: ProductDetails,
}

/// Lifecycle status of a SIM identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SimStatus {
    Active,
    Inactive,
    /// Caller-supplied initial status (e.g. `"Provisioned"`).
    Other(String),
}

impl SimStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SimStatus::Active => "Active",
            SimStatus::Inactive => "Inactive",
            SimStatus::Other(s) => s,
        }
    }
}

impl From<&str> for SimStatus {
    fn from(s: &str) -> Self {
        match s {
            "Active" => SimStatus::Active,
            "Inactive" => SimStatus::Inactive,
            other => SimStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields written when a SIM is activated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimActivation {
    pub csp: AccountName,
    pub end_user: String,
    pub iot_id: String,
    pub iot_secret: String,
}

/// A SIM identity as read back from the store. Absent fields read as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimIdentity {
    #[serde(rename = "eSIMId")]
    pub sim_id: String,
    pub status: String,
    pub manufacturer: String,
    #[serde(rename = "CSP")]
    pub csp: String,
    #[serde(rename = "EndUser")]
    pub end_user: String,
    #[serde(rename = "IoTId")]
    pub iot_id: String,
    #[serde(rename = "IoTSecret")]
    pub iot_secret: String,
}

impl SimIdentity {
    pub fn is_active(&self) -> bool {
        self.status == SimStatus::Active.as_str()
    }
}

/// Quantities left after an inventory update. Zero means the key was deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUpdate {
    #[serde(serialize_with = "as_text")]
    pub location_quantity: i64,
    #[serde(serialize_with = "as_text")]
    pub product_quantity: i64,
}

/// One product in one location of a given entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationStock {
    pub product_id: String,
    #[serde(serialize_with = "as_text")]
    pub quantity: i64,
}

/// One product in any location of a given entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityStock {
    pub product_id: String,
    pub location_id: String,
    #[serde(serialize_with = "as_text")]
    pub quantity: i64,
}

/// One by-location entry anywhere in the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRow {
    pub entity_id: String,
    pub location_id: String,
    pub product_id: String,
    #[serde(serialize_with = "as_text")]
    pub quantity: i64,
}

fn as_text<T: fmt::Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roles_with_percentage() {
        assert!(!AccountRole::Vmc.has_percentage());
        assert!(AccountRole::Csp.has_percentage());
        assert!(AccountRole::Supplier.has_percentage());
    }

    #[test]
    fn transaction_record_json_shape() {
        let record = TransactionRecord {
            transaction_id: "T1".into(),
            amount: 100.0,
            supplier: "S".into(),
            csp: "C".into(),
            vmc: "V".into(),
            balances: vec![
                BalanceEntry { company_name: "S".into(), balance: 20.0 },
                BalanceEntry { company_name: "C".into(), balance: 10.0 },
                BalanceEntry { company_name: "V".into(), balance: 70.0 },
            ],
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["transactionId"], "T1");
        assert_eq!(value["balances"][0], json!({"companyName": "S", "balance": 20.0}));
        assert_eq!(record.balance_of("V"), Some(70.0));
        assert_eq!(record.balance_of("X"), None);

        let back: TransactionRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn product_serializes_flat() {
        let product = Product {
            product_id: "P1".into(),
            entity_id: "E1".into(),
            details: ProductDetails {
                name: "Cola".into(),
                image: "cola.png".into(),
                price: "1.50".into(),
                qr_code: "qr:P1".into(),
            },
        };
        assert_eq!(
            serde_json::to_value(&product).unwrap(),
            json!({
                "productId": "P1",
                "relatedEntity": "E1",
                "productName": "Cola",
                "productImg": "cola.png",
                "productPrice": "1.50",
                "productQRCode": "qr:P1",
            })
        );
    }

    #[test]
    fn sim_status_parsing() {
        assert_eq!(SimStatus::from("Active"), SimStatus::Active);
        assert_eq!(SimStatus::from("Inactive"), SimStatus::Inactive);
        assert_eq!(SimStatus::from("Stock"), SimStatus::Other("Stock".into()));
        assert_eq!(SimStatus::Other("Stock".into()).to_string(), "Stock");
    }

    #[test]
    fn quantities_render_as_strings() {
        let stock = EntityStock {
            product_id: "P1".into(),
            location_id: "L1".into(),
            quantity: 5,
        };
        assert_eq!(
            serde_json::to_value(&stock).unwrap(),
            json!({"productId": "P1", "locationId": "L1", "quantity": "5"})
        );
    }
}
