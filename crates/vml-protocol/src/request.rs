//! Typed requests built from an operation name and string arguments.
//!
//! Parsing order is fixed: operation name, then argument count, then each
//! argument's value. Nothing here touches the store.
//!
//! Ids that end up in `_`-joined attribute keys (accounts, transactions,
//! products, SIMs) are also checked with [`KeyCodec::check_record_id`].

use vml_ledger::{AccountRole, KeyCodec, ProductDetails, SimActivation, SimStatus};
use vml_types::{
    parse_decimal, parse_quantity, AccountName, EntityId, LocationId, Percentage, ProductId, SimId,
    TransactionId,
};

use crate::error::{ProtocolError, ProtocolResult};
use crate::operation::{InvokeOp, QueryOp};

#[derive(Clone, Debug, PartialEq)]
pub enum Invoke {
    Init {
        total: f64,
    },
    AddAccount {
        role: AccountRole,
        name: AccountName,
        percentage: Option<Percentage>,
        balance: f64,
    },
    RemoveAccount {
        role: AccountRole,
        name: AccountName,
    },
    ResetBalance {
        name: AccountName,
        balance: f64,
    },
    UpdatePercentage {
        name: AccountName,
        percentage: Percentage,
    },
    RecordTransaction {
        tx: TransactionId,
        amount: f64,
        supplier: AccountName,
        csp: AccountName,
        vmc: AccountName,
    },
    AddSim {
        id: SimId,
        status: SimStatus,
        manufacturer: String,
    },
    ActivateSim {
        id: SimId,
        activation: SimActivation,
    },
    DeactivateSim {
        id: SimId,
    },
    RemoveSim {
        id: SimId,
    },
    CreateProduct {
        id: ProductId,
        entity: EntityId,
        details: ProductDetails,
    },
    RemoveProduct {
        id: ProductId,
    },
    UpdateInventory {
        entity: EntityId,
        location: LocationId,
        product: ProductId,
        delta: i64,
    },
    ReconcileInventory {
        entity: EntityId,
    },
}

impl Invoke {
    pub fn parse(name: &str, args: &[String]) -> ProtocolResult<Self> {
        let op = InvokeOp::from_name(name)
            .ok_or_else(|| ProtocolError::UnknownOperation(name.to_string()))?;
        check_arity(op.name(), op.arity(), args)?;

        let request = match op {
            InvokeOp::Init => Invoke::Init {
                total: parse_decimal("total", &args[0])?,
            },
            InvokeOp::AddVmc => Invoke::AddAccount {
                role: AccountRole::Vmc,
                name: account(&args[0])?,
                percentage: None,
                balance: parse_decimal("balance", &args[1])?,
            },
            InvokeOp::AddCsp | InvokeOp::AddSupplier => Invoke::AddAccount {
                role: if op == InvokeOp::AddCsp {
                    AccountRole::Csp
                } else {
                    AccountRole::Supplier
                },
                name: account(&args[0])?,
                percentage: Some(Percentage::parse(&args[1])?),
                balance: parse_decimal("balance", &args[2])?,
            },
            InvokeOp::RemoveVmc | InvokeOp::RemoveCsp | InvokeOp::RemoveSupplier => {
                Invoke::RemoveAccount {
                    role: match op {
                        InvokeOp::RemoveVmc => AccountRole::Vmc,
                        InvokeOp::RemoveCsp => AccountRole::Csp,
                        _ => AccountRole::Supplier,
                    },
                    name: account(&args[0])?,
                }
            }
            InvokeOp::ResetBalance => Invoke::ResetBalance {
                name: account(&args[0])?,
                balance: parse_decimal("balance", &args[1])?,
            },
            InvokeOp::UpdatePercentage => Invoke::UpdatePercentage {
                name: account(&args[0])?,
                percentage: Percentage::parse(&args[1])?,
            },
            InvokeOp::RecordTransaction => Invoke::RecordTransaction {
                tx: transaction(&args[0])?,
                amount: parse_decimal("amount", &args[1])?,
                supplier: account(&args[2])?,
                csp: account(&args[3])?,
                vmc: account(&args[4])?,
            },
            InvokeOp::AddEsim => Invoke::AddSim {
                id: sim(&args[0])?,
                status: SimStatus::from(args[1].as_str()),
                manufacturer: args[2].clone(),
            },
            InvokeOp::ActivateEsim => Invoke::ActivateSim {
                id: sim(&args[0])?,
                activation: SimActivation {
                    csp: AccountName::parse(args[1].as_str())?,
                    end_user: args[2].clone(),
                    iot_id: args[3].clone(),
                    iot_secret: args[4].clone(),
                },
            },
            InvokeOp::DeactivateEsim => Invoke::DeactivateSim {
                id: sim(&args[0])?,
            },
            InvokeOp::RemoveEsim => Invoke::RemoveSim {
                id: sim(&args[0])?,
            },
            InvokeOp::CreateProduct => Invoke::CreateProduct {
                id: product(&args[0])?,
                entity: EntityId::parse(args[1].as_str())?,
                details: ProductDetails {
                    name: args[2].clone(),
                    image: args[3].clone(),
                    price: args[4].clone(),
                    qr_code: args[5].clone(),
                },
            },
            InvokeOp::RemoveProduct => Invoke::RemoveProduct {
                id: product(&args[0])?,
            },
            InvokeOp::UpdateInventory => Invoke::UpdateInventory {
                entity: EntityId::parse(args[0].as_str())?,
                location: LocationId::parse(args[1].as_str())?,
                product: product(&args[2])?,
                delta: parse_quantity("delta", &args[3])?,
            },
            InvokeOp::ReconcileInventory => Invoke::ReconcileInventory {
                entity: EntityId::parse(args[0].as_str())?,
            },
        };
        Ok(request)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Query {
    /// Raw value under any key. The key is passed through unvalidated.
    Read {
        key: String,
    },
    GetTransaction {
        tx: TransactionId,
    },
    GetBalance {
        name: AccountName,
    },
    GetBalanceWithTransaction {
        tx: TransactionId,
        name: AccountName,
    },
    GetSim {
        id: SimId,
    },
    ReadProduct {
        id: ProductId,
    },
    ReadAllProducts,
    InventoryByProduct {
        entity: EntityId,
        product: ProductId,
    },
    InventoryByLocation {
        entity: EntityId,
        location: LocationId,
    },
    AllInventoryByEntity {
        entity: EntityId,
    },
    AllInventory,
}

impl Query {
    pub fn parse(name: &str, args: &[String]) -> ProtocolResult<Self> {
        let op = QueryOp::from_name(name)
            .ok_or_else(|| ProtocolError::UnknownOperation(name.to_string()))?;
        check_arity(op.name(), op.arity(), args)?;

        let request = match op {
            QueryOp::Read => Query::Read {
                key: args[0].clone(),
            },
            QueryOp::GetTransaction => Query::GetTransaction {
                tx: transaction(&args[0])?,
            },
            QueryOp::GetBalance => Query::GetBalance {
                name: account(&args[0])?,
            },
            QueryOp::GetBalanceWithTransaction => Query::GetBalanceWithTransaction {
                tx: transaction(&args[0])?,
                name: account(&args[1])?,
            },
            QueryOp::GetEsim => Query::GetSim {
                id: sim(&args[0])?,
            },
            QueryOp::ReadProduct => Query::ReadProduct {
                id: product(&args[0])?,
            },
            QueryOp::ReadAllProducts => Query::ReadAllProducts,
            QueryOp::GetInventoryByEntityAndProduct => Query::InventoryByProduct {
                entity: EntityId::parse(args[0].as_str())?,
                product: product(&args[1])?,
            },
            QueryOp::GetInventoryByEntityAndLocation => Query::InventoryByLocation {
                entity: EntityId::parse(args[0].as_str())?,
                location: LocationId::parse(args[1].as_str())?,
            },
            QueryOp::GetAllInventoryByEntity => Query::AllInventoryByEntity {
                entity: EntityId::parse(args[0].as_str())?,
            },
            QueryOp::GetAllInventory => Query::AllInventory,
        };
        Ok(request)
    }
}

fn account(value: &str) -> ProtocolResult<AccountName> {
    let name = AccountName::parse(value)?;
    KeyCodec::check_record_id(AccountName::KIND, name.as_str())?;
    Ok(name)
}

fn transaction(value: &str) -> ProtocolResult<TransactionId> {
    let tx = TransactionId::parse(value)?;
    KeyCodec::check_record_id(TransactionId::KIND, tx.as_str())?;
    Ok(tx)
}

fn product(value: &str) -> ProtocolResult<ProductId> {
    let id = ProductId::parse(value)?;
    KeyCodec::check_record_id(ProductId::KIND, id.as_str())?;
    Ok(id)
}

fn sim(value: &str) -> ProtocolResult<SimId> {
    let id = SimId::parse(value)?;
    KeyCodec::check_record_id(SimId::KIND, id.as_str())?;
    Ok(id)
}

fn check_arity(operation: &'static str, expected: usize, args: &[String]) -> ProtocolResult<()> {
    if args.len() != expected {
        return Err(ProtocolError::InvalidArgumentCount {
            operation,
            expected,
            got: args.len(),
        });
    }
    Ok(())
}
