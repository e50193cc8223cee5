use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    AssetTypeId, EntryType, SystemWalletKind, TransactionKind, TransactionStatus, UserId, WalletId,
};

/// Modelo de Entidad: AssetType.
/// Un tipo de activo virtual (p. ej. `COINS`, `GEMS`) sobre el que se abren billeteras.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetType {
    pub id: AssetTypeId,
    pub code: String, // Unique
    pub display_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Modelo de Entidad: Wallet.
/// Saldo de un (propietario, activo). Las billeteras del sistema usan
/// `user_id` negativo y son las unicas autorizadas a quedar en saldo negativo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub user_id: UserId,
    pub asset_type_id: AssetTypeId,
    pub balance: Decimal, // Precision fija NUMERIC(20, 8)
    pub is_system_wallet: bool,
    pub system_wallet_type: Option<SystemWalletKind>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Modelo de Entidad: Transaction.
/// Un evento de movimiento; la unidad de idempotencia del servicio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub transaction_id: String,  // Unique, UUID generado por el servicio
    pub idempotency_key: String, // Unique, provisto por el cliente
    pub transaction_type: TransactionKind,
    pub user_id: UserId,
    pub asset_type_id: AssetTypeId,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub metadata: Option<serde_json::Value>,
    pub error_message: Option<String>, // presente solo si status = FAILED
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Modelo de Entidad: LedgerEntry.
/// Una mitad de la partida doble. Append-only: nunca se actualiza ni borra.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub transaction_id: String,
    pub wallet_id: WalletId,
    pub entry_type: EntryType,
    pub amount: Decimal, // con signo: DEBIT = -monto, CREDIT = +monto
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Vista de lectura para la consulta de saldo: billetera + codigo del activo.
///
/// El codigo se resuelve con un JOIN al momento de leer; las entidades no
/// mantienen referencias bidireccionales entre billetera y activo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalanceView {
    pub user_id: UserId,
    pub asset_type_id: AssetTypeId,
    pub asset_type_code: String,
    pub balance: Decimal,
}
