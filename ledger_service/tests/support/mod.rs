//! Arnes compartido de los tests de integracion.
//!
//! Los tests corren contra la base de `TEST_DATABASE_URL` y se saltan con un
//! aviso cuando no esta definida. Cada test siembra SU propio tipo de activo
//! (codigo unico) con sus tres billeteras del sistema, asi que los tests se
//! aislan entre si y entre corridas sin limpiar tablas.

#![allow(dead_code)]

use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use ledger_service::domain::types::{AssetTypeId, SystemWalletKind, UserId};
use ledger_service::use_cases::process_transaction::MovementRequest;

/// Conecta a `TEST_DATABASE_URL` y aplica las migraciones (idempotente).
/// Devuelve `None` cuando la variable no esta definida.
pub async fn try_pool() -> Option<PgPool> {
    dotenvy::dotenv().ok();

    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set; skipping database-backed test");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&url)
        .await
        .expect("failed to connect to TEST_DATABASE_URL");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to apply migrations to the test database");

    Some(pool)
}

pub struct TestLedger {
    pub asset_code: String,
    pub asset_id: AssetTypeId,
}

/// Siembra un activo nuevo con tesoreria y marketing fondeados a 1,000,000.
pub async fn seed_ledger(pool: &PgPool) -> TestLedger {
    seed_ledger_with(pool, Decimal::from(1_000_000), Decimal::from(1_000_000)).await
}

/// Siembra un activo nuevo con saldos iniciales a medida para los pools.
pub async fn seed_ledger_with(pool: &PgPool, treasury: Decimal, marketing: Decimal) -> TestLedger {
    let suffix = Uuid::new_v4().simple().to_string().to_uppercase();
    let asset_code = format!("COINS_{}", &suffix[..12]);

    let (asset_id,): (i32,) = sqlx::query_as(
        "INSERT INTO asset_types (code, display_name) VALUES ($1, 'Test Coins') RETURNING id",
    )
    .bind(&asset_code)
    .fetch_one(pool)
    .await
    .expect("failed to seed asset type");

    for (kind, balance) in [
        (SystemWalletKind::Treasury, treasury),
        (SystemWalletKind::Marketing, marketing),
        (SystemWalletKind::Revenue, Decimal::ZERO),
    ] {
        sqlx::query(
            r#"
            INSERT INTO wallets (user_id, asset_type_id, balance, is_system_wallet, system_wallet_type)
            VALUES ($1, $2, $3, TRUE, $4)
            "#,
        )
        .bind(kind.owner_id())
        .bind(asset_id)
        .bind(balance)
        .bind(kind)
        .execute(pool)
        .await
        .expect("failed to seed system wallet");
    }

    TestLedger {
        asset_code,
        asset_id: AssetTypeId(asset_id),
    }
}

/// Clave de idempotencia unica por corrida (la tabla persiste entre corridas).
pub fn idem_key(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

pub fn movement(key: &str, user_id: i64, asset_code: &str, amount: Decimal) -> MovementRequest {
    MovementRequest {
        idempotency_key: key.to_string(),
        user_id: UserId(user_id),
        asset_type: asset_code.to_string(),
        amount,
        metadata: None,
    }
}

/// Id de usuario fresco, para no chocar con billeteras de otros tests.
pub fn fresh_user() -> i64 {
    // Uuid v4 como fuente de aleatoriedad sin dependencias extra
    (Uuid::new_v4().as_u128() % 1_000_000_000) as i64 + 1
}

/// Saldo actual leido directo de la tabla; `None` si la billetera no existe.
pub async fn balance_of(pool: &PgPool, user_id: i64, asset_id: AssetTypeId) -> Option<Decimal> {
    sqlx::query_as::<_, (Decimal,)>(
        "SELECT balance FROM wallets WHERE user_id = $1 AND asset_type_id = $2",
    )
    .bind(user_id)
    .bind(asset_id)
    .fetch_optional(pool)
    .await
    .expect("failed to read wallet balance")
    .map(|(balance,)| balance)
}

pub async fn system_balance(pool: &PgPool, kind: SystemWalletKind, asset_id: AssetTypeId) -> Decimal {
    balance_of(pool, kind.owner_id().0, asset_id)
        .await
        .expect("system wallet should exist")
}

/// Suma de saldos de TODAS las billeteras de un activo (ley de conservacion).
pub async fn total_supply(pool: &PgPool, asset_id: AssetTypeId) -> Decimal {
    let (total,): (Decimal,) = sqlx::query_as(
        "SELECT COALESCE(SUM(balance), 0) FROM wallets WHERE asset_type_id = $1",
    )
    .bind(asset_id)
    .fetch_one(pool)
    .await
    .expect("failed to sum balances");
    total
}

pub async fn transactions_with_key(pool: &PgPool, idempotency_key: &str) -> i64 {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM transactions WHERE idempotency_key = $1")
            .bind(idempotency_key)
            .fetch_one(pool)
            .await
            .expect("failed to count transactions");
    count
}
