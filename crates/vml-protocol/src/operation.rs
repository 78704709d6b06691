//! Operation names and their parameter lists.
//!
//! Each operation has a fixed parameter list; the argument count is checked
//! against it before any argument is parsed.

use serde::Serialize;

/// State-changing operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvokeOp {
    Init,
    AddVmc,
    RemoveVmc,
    AddCsp,
    RemoveCsp,
    AddSupplier,
    RemoveSupplier,
    ResetBalance,
    UpdatePercentage,
    RecordTransaction,
    AddEsim,
    ActivateEsim,
    DeactivateEsim,
    RemoveEsim,
    CreateProduct,
    RemoveProduct,
    UpdateInventory,
    ReconcileInventory,
}

impl InvokeOp {
    pub const ALL: [InvokeOp; 18] = [
        InvokeOp::Init,
        InvokeOp::AddVmc,
        InvokeOp::RemoveVmc,
        InvokeOp::AddCsp,
        InvokeOp::RemoveCsp,
        InvokeOp::AddSupplier,
        InvokeOp::RemoveSupplier,
        InvokeOp::ResetBalance,
        InvokeOp::UpdatePercentage,
        InvokeOp::RecordTransaction,
        InvokeOp::AddEsim,
        InvokeOp::ActivateEsim,
        InvokeOp::DeactivateEsim,
        InvokeOp::RemoveEsim,
        InvokeOp::CreateProduct,
        InvokeOp::RemoveProduct,
        InvokeOp::UpdateInventory,
        InvokeOp::ReconcileInventory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InvokeOp::Init => "init",
            InvokeOp::AddVmc => "addVMC",
            InvokeOp::RemoveVmc => "removeVMC",
            InvokeOp::AddCsp => "addCSP",
            InvokeOp::RemoveCsp => "removeCSP",
            InvokeOp::AddSupplier => "addSupplier",
            InvokeOp::RemoveSupplier => "removeSupplier",
            InvokeOp::ResetBalance => "resetBalance",
            InvokeOp::UpdatePercentage => "updatePercentage",
            InvokeOp::RecordTransaction => "recordTransaction",
            InvokeOp::AddEsim => "addESIM",
            InvokeOp::ActivateEsim => "activateESIM",
            InvokeOp::DeactivateEsim => "deactivateESIM",
            InvokeOp::RemoveEsim => "removeESIM",
            InvokeOp::CreateProduct => "createProduct",
            InvokeOp::RemoveProduct => "removeProduct",
            InvokeOp::UpdateInventory => "updateInventory",
            InvokeOp::ReconcileInventory => "reconcileInventory",
        }
    }

    pub fn params(self) -> &'static [&'static str] {
        match self {
            InvokeOp::Init => &["total"],
            InvokeOp::AddVmc => &["name", "balance"],
            InvokeOp::RemoveVmc
            | InvokeOp::RemoveCsp
            | InvokeOp::RemoveSupplier => &["name"],
            InvokeOp::AddCsp | InvokeOp::AddSupplier => &["name", "percentage", "balance"],
            InvokeOp::ResetBalance => &["name", "balance"],
            InvokeOp::UpdatePercentage => &["name", "percentage"],
            InvokeOp::RecordTransaction => &["transactionId", "amount", "supplier", "csp", "vmc"],
            InvokeOp::AddEsim => &["eSIMId", "status", "manufacturer"],
            InvokeOp::ActivateEsim => &["eSIMId", "csp", "endUser", "iotId", "iotSecret"],
            InvokeOp::DeactivateEsim | InvokeOp::RemoveEsim => &["eSIMId"],
            InvokeOp::CreateProduct => &[
                "productId",
                "entityId",
                "productName",
                "productImg",
                "productPrice",
                "productQRCode",
            ],
            InvokeOp::RemoveProduct => &["productId"],
            InvokeOp::UpdateInventory => &["entityId", "locationId", "productId", "delta"],
            InvokeOp::ReconcileInventory => &["entityId"],
        }
    }

    pub fn arity(self) -> usize {
        self.params().len()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

/// Read-only operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryOp {
    Read,
    GetTransaction,
    GetBalance,
    GetBalanceWithTransaction,
    GetEsim,
    ReadProduct,
    ReadAllProducts,
    GetInventoryByEntityAndProduct,
    GetInventoryByEntityAndLocation,
    GetAllInventoryByEntity,
    GetAllInventory,
}

impl QueryOp {
    pub const ALL: [QueryOp; 11] = [
        QueryOp::Read,
        QueryOp::GetTransaction,
        QueryOp::GetBalance,
        QueryOp::GetBalanceWithTransaction,
        QueryOp::GetEsim,
        QueryOp::ReadProduct,
        QueryOp::ReadAllProducts,
        QueryOp::GetInventoryByEntityAndProduct,
        QueryOp::GetInventoryByEntityAndLocation,
        QueryOp::GetAllInventoryByEntity,
        QueryOp::GetAllInventory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            QueryOp::Read => "read",
            QueryOp::GetTransaction => "getTransaction",
            QueryOp::GetBalance => "getBalance",
            QueryOp::GetBalanceWithTransaction => "getBalanceWithTransaction",
            QueryOp::GetEsim => "getESIM",
            QueryOp::ReadProduct => "readProduct",
            QueryOp::ReadAllProducts => "readAllProducts",
            QueryOp::GetInventoryByEntityAndProduct => "getInventoryByEntityAndProduct",
            QueryOp::GetInventoryByEntityAndLocation => "getInventoryByEntityAndLocation",
            QueryOp::GetAllInventoryByEntity => "getAllInventoryByEntity",
            QueryOp::GetAllInventory => "getAllInventory",
        }
    }

    pub fn params(self) -> &'static [&'static str] {
        match self {
            QueryOp::Read => &["key"],
            QueryOp::GetTransaction => &["transactionId"],
            QueryOp::GetBalance => &["name"],
            QueryOp::GetBalanceWithTransaction => &["transactionId", "name"],
            QueryOp::GetEsim => &["eSIMId"],
            QueryOp::ReadProduct => &["productId"],
            QueryOp::ReadAllProducts | QueryOp::GetAllInventory => &[],
            QueryOp::GetInventoryByEntityAndProduct => &["entityId", "productId"],
            QueryOp::GetInventoryByEntityAndLocation => &["entityId", "locationId"],
            QueryOp::GetAllInventoryByEntity => &["entityId"],
        }
    }

    pub fn arity(self) -> usize {
        self.params().len()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

/// Listing entry for operation discovery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OperationSchema {
    pub name: &'static str,
    pub kind: OperationKind,
    pub params: &'static [&'static str],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Invoke,
    Query,
}

/// Every operation, invokes first.
pub fn schema() -> Vec<OperationSchema> {
    let invokes = InvokeOp::ALL.into_iter().map(|op| OperationSchema {
        name: op.name(),
        kind: OperationKind::Invoke,
        params: op.params(),
    });
    let queries = QueryOp::ALL.into_iter().map(|op| OperationSchema {
        name: op.name(),
        kind: OperationKind::Query,
        params: op.params(),
    });
    invokes.chain(queries).collect()
}
