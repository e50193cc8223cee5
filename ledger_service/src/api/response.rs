use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::entities::{Transaction, WalletBalanceView};
use crate::domain::types::{TransactionKind, TransactionStatus};

/// DTO de salida para los tres movimientos.
///
/// Los montos viajan como strings decimales y los timestamps en ISO-8601 UTC.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransactionResponse {
    pub transaction_id: String,
    pub idempotency_key: String,
    #[schema(value_type = String, example = "TOPUP")]
    pub transaction_type: TransactionKind,
    pub user_id: i64,
    pub asset_type_id: i32,
    #[schema(value_type = String, example = "100.00")]
    pub amount: Decimal,
    #[schema(value_type = String, example = "COMPLETED")]
    pub status: TransactionStatus,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            transaction_id: t.transaction_id,
            idempotency_key: t.idempotency_key,
            transaction_type: t.transaction_type,
            user_id: t.user_id.0,
            asset_type_id: t.asset_type_id.0,
            amount: t.amount,
            status: t.status,
            metadata: t.metadata,
            created_at: t.created_at,
            completed_at: t.completed_at,
        }
    }
}

/// DTO de salida para la consulta de saldo.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WalletBalanceResponse {
    pub user_id: i64,
    pub asset_type_id: i32,
    pub asset_type_code: String,
    #[schema(value_type = String, example = "250.50")]
    pub balance: Decimal,
}

impl From<WalletBalanceView> for WalletBalanceResponse {
    fn from(v: WalletBalanceView) -> Self {
        Self {
            user_id: v.user_id.0,
            asset_type_id: v.asset_type_id.0,
            asset_type_code: v.asset_type_code,
            balance: v.balance,
        }
    }
}
