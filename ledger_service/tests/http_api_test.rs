mod support;

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use ledger_service::api::http_routes::{self, AppState, BalanceQuery, MovementRequestDto};
use ledger_service::infrastructure::persistence::wallet_repository::PostgresWalletRepository;
use ledger_service::use_cases::get_wallet_balance::GetWalletBalanceUseCase;
use ledger_service::use_cases::process_transaction::ProcessTransactionUseCase;

use support::{fresh_user, idem_key, seed_ledger, try_pool};

fn app_state(pool: &sqlx::PgPool) -> Arc<AppState> {
    Arc::new(AppState {
        process_transaction_use_case: ProcessTransactionUseCase::new(pool.clone()),
        get_wallet_balance_use_case: GetWalletBalanceUseCase::new(Arc::new(
            PostgresWalletRepository::new(pool.clone()),
        )),
    })
}

fn payload(key: &str, user_id: i64, asset: &str, amount: Decimal) -> MovementRequestDto {
    MovementRequestDto {
        idempotency_key: key.to_string(),
        user_id,
        asset_type: asset.to_string(),
        amount,
        metadata: Some(serde_json::json!({"source": "api_test"})),
    }
}

#[tokio::test]
async fn test_topup_endpoint_returns_the_transaction_json() {
    let Some(pool) = try_pool().await else { return };

    // Arrange
    let ledger = seed_ledger(&pool).await;
    let state = app_state(&pool);
    let user = fresh_user();

    // Act
    let result = http_routes::topup(
        State(state),
        Json(payload(&idem_key("api-topup"), user, &ledger.asset_code, dec!(100.00))),
    )
    .await;

    // Assert
    let Json(response) = result.expect("topup request should succeed");
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["transaction_type"], "TOPUP");
    assert_eq!(value["status"], "COMPLETED");
    assert_eq!(value["user_id"], user);
    assert_eq!(value["metadata"]["source"], "api_test");
    assert!(value["transaction_id"].as_str().is_some());
    assert!(value["completed_at"].as_str().is_some());

    // El monto viaja como string decimal; el valor es exacto aunque cambie la escala
    let amount = Decimal::from_str(value["amount"].as_str().unwrap()).unwrap();
    assert_eq!(amount, dec!(100.00));
}

#[tokio::test]
async fn test_movement_validation_maps_to_422() {
    let Some(pool) = try_pool().await else { return };

    // Arrange
    let ledger = seed_ledger(&pool).await;
    let state = app_state(&pool);

    // Act: monto en cero nunca llega al motor
    let result = http_routes::spend(
        State(state),
        Json(payload(&idem_key("api-zero"), fresh_user(), &ledger.asset_code, dec!(0.00))),
    )
    .await;

    // Assert
    let error = result.err().expect("zero amount must be rejected");
    assert_eq!(error.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error.code(), "validation_error");
}

#[tokio::test]
async fn test_unknown_asset_maps_to_400_with_error_body() {
    let Some(pool) = try_pool().await else { return };

    // Arrange
    seed_ledger(&pool).await;
    let state = app_state(&pool);
    let missing_code = format!("DOGE_{}", fresh_user());

    // Act
    let result = http_routes::topup(
        State(state),
        Json(payload(&idem_key("api-doge"), fresh_user(), &missing_code, dec!(1.00))),
    )
    .await;

    // Assert: status y cuerpo estructurado {error, message, details}
    let response = result.err().unwrap().into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "asset_unknown");
    assert!(body["message"].as_str().unwrap().contains(&missing_code));
    assert_eq!(body["details"], serde_json::json!({}));
}

#[tokio::test]
async fn test_balance_endpoint_returns_the_wallet_view() {
    let Some(pool) = try_pool().await else { return };

    // Arrange
    let ledger = seed_ledger(&pool).await;
    let state = app_state(&pool);
    let user = fresh_user();

    http_routes::topup(
        State(state.clone()),
        Json(payload(&idem_key("api-fund"), user, &ledger.asset_code, dec!(42.00))),
    )
    .await
    .expect("funding topup");

    // Act
    let result = http_routes::get_wallet_balance(
        State(state),
        Path(user),
        Query(BalanceQuery {
            asset_type_id: ledger.asset_id.0,
        }),
    )
    .await;

    // Assert
    let Json(response) = result.expect("balance request should succeed");
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["user_id"], user);
    assert_eq!(value["asset_type_code"], ledger.asset_code);
    let balance = Decimal::from_str(value["balance"].as_str().unwrap()).unwrap();
    assert_eq!(balance, dec!(42.00));
}

#[tokio::test]
async fn test_balance_endpoint_maps_missing_wallet_to_404() {
    let Some(pool) = try_pool().await else { return };

    // Arrange
    let ledger = seed_ledger(&pool).await;
    let state = app_state(&pool);

    // Act
    let result = http_routes::get_wallet_balance(
        State(state),
        Path(fresh_user()),
        Query(BalanceQuery {
            asset_type_id: ledger.asset_id.0,
        }),
    )
    .await;

    // Assert
    let error = result.err().expect("missing wallet must be a 404");
    assert_eq!(error.status(), StatusCode::NOT_FOUND);
    assert_eq!(error.code(), "wallet_not_found");
}

#[tokio::test]
async fn test_health_endpoint_reports_healthy() {
    let Json(body) = http_routes::health_check().await;
    assert_eq!(body["status"], "healthy");
}
