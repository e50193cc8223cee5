use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::types::{AssetTypeId, SystemWalletKind, UserId};

/// Taxonomia de errores que el motor expone hacia el adaptador HTTP.
///
/// Todo error de persistencia llega aqui ya clasificado: las carreras de
/// idempotencia se resuelven dentro del motor (devolviendo la transaccion
/// previa) y solo emergen como `DuplicateTransaction` cuando no hay fila
/// previa visible tras el rollback.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Asset type {0} not found")]
    AssetUnknown(String),

    #[error("{kind} wallet not found for asset {asset}")]
    SystemWalletMissing {
        kind: SystemWalletKind,
        asset: String,
    },

    #[error("Insufficient funds. Balance: {available}, Required: {required}")]
    InsufficientFunds {
        available: Decimal,
        required: Decimal,
    },

    #[error("Wallet not found for user {user_id} and asset_type {asset_type_id}")]
    WalletNotFound {
        user_id: UserId,
        asset_type_id: AssetTypeId,
    },

    #[error("Transaction with key {0} already exists")]
    DuplicateTransaction(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
