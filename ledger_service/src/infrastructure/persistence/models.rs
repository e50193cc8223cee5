use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::domain::entities::{AssetType, LedgerEntry, Transaction, Wallet, WalletBalanceView};
use crate::domain::types::{
    AssetTypeId, EntryType, SystemWalletKind, TransactionKind, TransactionStatus, UserId, WalletId,
};

#[derive(Debug, FromRow)]
pub struct AssetTypeModel {
    pub id: AssetTypeId,
    pub code: String,
    pub display_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AssetTypeModel> for AssetType {
    fn from(m: AssetTypeModel) -> Self {
        Self {
            id: m.id,
            code: m.code,
            display_name: m.display_name,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct WalletModel {
    pub id: WalletId,
    pub user_id: UserId,
    pub asset_type_id: AssetTypeId,
    pub balance: Decimal,
    pub is_system_wallet: bool,
    pub system_wallet_type: Option<SystemWalletKind>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WalletModel> for Wallet {
    fn from(m: WalletModel) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            asset_type_id: m.asset_type_id,
            balance: m.balance,
            is_system_wallet: m.is_system_wallet,
            system_wallet_type: m.system_wallet_type,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct TransactionModel {
    pub id: i64,
    pub transaction_id: String,
    pub idempotency_key: String,
    pub transaction_type: TransactionKind,
    pub user_id: UserId,
    pub asset_type_id: AssetTypeId,
    pub amount: Decimal,
    pub status: TransactionStatus,
    // La columna conserva el nombre historico `transaction_metadata`
    pub transaction_metadata: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<TransactionModel> for Transaction {
    fn from(m: TransactionModel) -> Self {
        Self {
            id: m.id,
            transaction_id: m.transaction_id,
            idempotency_key: m.idempotency_key,
            transaction_type: m.transaction_type,
            user_id: m.user_id,
            asset_type_id: m.asset_type_id,
            amount: m.amount,
            status: m.status,
            metadata: m.transaction_metadata,
            error_message: m.error_message,
            created_at: m.created_at,
            completed_at: m.completed_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct LedgerEntryModel {
    pub id: i64,
    pub transaction_id: String,
    pub wallet_id: WalletId,
    pub entry_type: EntryType,
    pub amount: Decimal,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<LedgerEntryModel> for LedgerEntry {
    fn from(m: LedgerEntryModel) -> Self {
        Self {
            id: m.id,
            transaction_id: m.transaction_id,
            wallet_id: m.wallet_id,
            entry_type: m.entry_type,
            amount: m.amount,
            balance_before: m.balance_before,
            balance_after: m.balance_after,
            description: m.description,
            created_at: m.created_at,
        }
    }
}

/// Fila del JOIN billetera + activo para la consulta de saldo.
#[derive(Debug, FromRow)]
pub struct WalletBalanceModel {
    pub user_id: UserId,
    pub asset_type_id: AssetTypeId,
    pub asset_type_code: String,
    pub balance: Decimal,
}

impl From<WalletBalanceModel> for WalletBalanceView {
    fn from(m: WalletBalanceModel) -> Self {
        Self {
            user_id: m.user_id,
            asset_type_id: m.asset_type_id,
            asset_type_code: m.asset_type_code,
            balance: m.balance,
        }
    }
}
