use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::error::LedgerError;

// Error unificado de la API; envuelve la taxonomia de dominio y la traduce
// a status HTTP + cuerpo estructurado {error, message, details}.
#[derive(Debug)]
pub struct ApiError(pub LedgerError);

// Permitimos convertir errores de dominio al ApiError implicitamente
impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            LedgerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            LedgerError::AssetUnknown(_)
            | LedgerError::SystemWalletMissing { .. }
            | LedgerError::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
            LedgerError::WalletNotFound { .. } => StatusCode::NOT_FOUND,
            LedgerError::DuplicateTransaction(_) => StatusCode::CONFLICT,
            LedgerError::Store(_) | LedgerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self.0 {
            LedgerError::Validation(_) => "validation_error",
            LedgerError::AssetUnknown(_) => "asset_unknown",
            LedgerError::SystemWalletMissing { .. } => "system_wallet_missing",
            LedgerError::InsufficientFunds { .. } => "insufficient_funds",
            LedgerError::WalletNotFound { .. } => "wallet_not_found",
            LedgerError::DuplicateTransaction(_) => "duplicate_transaction",
            LedgerError::Store(_) => "database_error",
            LedgerError::Internal(_) => "internal_server_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        // Los 5xx nunca exponen el detalle interno; queda en el log.
        let message = match &self.0 {
            LedgerError::Store(e) => {
                tracing::error!("Database error surfaced at the API boundary: {}", e);
                "A database error occurred".to_string()
            }
            LedgerError::Internal(e) => {
                tracing::error!("Internal error surfaced at the API boundary: {}", e);
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": code,
            "message": message,
            "details": {},
        }));

        (status, body).into_response()
    }
}
