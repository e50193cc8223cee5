use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::api::error::ApiError;
use crate::api::response::{TransactionResponse, WalletBalanceResponse};
use crate::domain::types::{AssetTypeId, UserId};
use crate::use_cases::get_wallet_balance::GetWalletBalanceUseCase;
use crate::use_cases::process_transaction::{MovementRequest, ProcessTransactionUseCase};

// Estado compartido de la aplicacion
pub struct AppState {
    pub process_transaction_use_case: ProcessTransactionUseCase,
    pub get_wallet_balance_use_case: GetWalletBalanceUseCase,
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/transactions/topup", post(topup))
        .route("/transactions/bonus", post(bonus))
        .route("/transactions/spend", post(spend))
        .route("/wallets/{user_id}/balance", get(get_wallet_balance))
        .with_state(state) // Inyectamos el estado (Casos de Uso)
}

// DTO de entrada, compartido por los tres movimientos
#[derive(Debug, Deserialize, ToSchema)]
pub struct MovementRequestDto {
    pub idempotency_key: String,
    pub user_id: i64,
    pub asset_type: String,
    #[schema(value_type = String, example = "100.00")]
    pub amount: Decimal,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
}

impl From<MovementRequestDto> for MovementRequest {
    fn from(dto: MovementRequestDto) -> Self {
        Self {
            idempotency_key: dto.idempotency_key,
            user_id: UserId(dto.user_id),
            asset_type: dto.asset_type,
            amount: dto.amount,
            metadata: dto.metadata,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BalanceQuery {
    pub asset_type_id: i32,
}

// Handler: TOPUP (Treasury -> usuario)
// POST /transactions/topup
#[utoipa::path(
    post,
    path = "/transactions/topup",
    request_body = MovementRequestDto,
    responses(
        (status = 200, description = "Movimiento completado (o replay idempotente)", body = TransactionResponse),
        (status = 400, description = "Error de dominio"),
        (status = 409, description = "Clave de idempotencia en conflicto"),
        (status = 422, description = "Cuerpo invalido"),
    )
)]
pub async fn topup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MovementRequestDto>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let transaction = state
        .process_transaction_use_case
        .top_up(payload.into())
        .await?;
    Ok(Json(transaction.into()))
}

// Handler: BONUS (Marketing -> usuario)
// POST /transactions/bonus
#[utoipa::path(
    post,
    path = "/transactions/bonus",
    request_body = MovementRequestDto,
    responses(
        (status = 200, description = "Movimiento completado (o replay idempotente)", body = TransactionResponse),
        (status = 400, description = "Error de dominio, incluye fondos insuficientes de marketing"),
        (status = 409, description = "Clave de idempotencia en conflicto"),
        (status = 422, description = "Cuerpo invalido"),
    )
)]
pub async fn bonus(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MovementRequestDto>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let transaction = state
        .process_transaction_use_case
        .bonus(payload.into())
        .await?;
    Ok(Json(transaction.into()))
}

// Handler: SPEND (usuario -> Revenue)
// POST /transactions/spend
#[utoipa::path(
    post,
    path = "/transactions/spend",
    request_body = MovementRequestDto,
    responses(
        (status = 200, description = "Movimiento completado (o replay idempotente)", body = TransactionResponse),
        (status = 400, description = "Error de dominio, incluye fondos insuficientes del usuario"),
        (status = 409, description = "Clave de idempotencia en conflicto"),
        (status = 422, description = "Cuerpo invalido"),
    )
)]
pub async fn spend(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MovementRequestDto>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let transaction = state
        .process_transaction_use_case
        .spend(payload.into())
        .await?;
    Ok(Json(transaction.into()))
}

// Handler: saldo de una billetera (usuario, activo)
// GET /wallets/{user_id}/balance?asset_type_id=...
#[utoipa::path(
    get,
    path = "/wallets/{user_id}/balance",
    params(
        ("user_id" = i64, Path, description = "Propietario de la billetera"),
        BalanceQuery,
    ),
    responses(
        (status = 200, description = "Saldo actual", body = WalletBalanceResponse),
        (status = 404, description = "Billetera inexistente"),
    )
)]
pub async fn get_wallet_balance(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<WalletBalanceResponse>, ApiError> {
    let view = state
        .get_wallet_balance_use_case
        .execute(UserId(user_id), AssetTypeId(query.asset_type_id))
        .await?;
    Ok(Json(view.into()))
}

// Handler: liveness probe
// GET /health (montado en la raiz, fuera del prefijo versionado)
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Servicio vivo"))
)]
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}
