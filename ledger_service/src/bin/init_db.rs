use anyhow::Context;
use dotenvy::dotenv;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use std::env;

use ledger_service::domain::types::SystemWalletKind;

// Activos provisionados por defecto en entornos de desarrollo
const DEFAULT_ASSETS: &[(&str, &str)] = &[("COINS", "Coins"), ("GEMS", "Gems")];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    println!("Connecting to ledger database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect")?;

    println!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Migration failed")?;

    // Las billeteras del sistema deben existir para cada activo ANTES de
    // aceptar movimientos de ese activo; el motor no las crea nunca.
    for (code, display_name) in DEFAULT_ASSETS {
        sqlx::query(
            r#"
            INSERT INTO asset_types (code, display_name)
            VALUES ($1, $2)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(code)
        .bind(display_name)
        .execute(&pool)
        .await?;

        let (asset_id,): (i32,) = sqlx::query_as("SELECT id FROM asset_types WHERE code = $1")
            .bind(code)
            .fetch_one(&pool)
            .await?;

        for kind in [
            SystemWalletKind::Treasury,
            SystemWalletKind::Marketing,
            SystemWalletKind::Revenue,
        ] {
            // Tesoreria y marketing arrancan fondeados; revenue acumula desde 0
            let seed_balance = match kind {
                SystemWalletKind::Treasury | SystemWalletKind::Marketing => {
                    Decimal::from(1_000_000)
                }
                SystemWalletKind::Revenue => Decimal::ZERO,
            };

            sqlx::query(
                r#"
                INSERT INTO wallets (user_id, asset_type_id, balance, is_system_wallet, system_wallet_type)
                VALUES ($1, $2, $3, TRUE, $4)
                ON CONFLICT (user_id, asset_type_id) DO NOTHING
                "#,
            )
            .bind(kind.owner_id())
            .bind(asset_id)
            .bind(seed_balance)
            .bind(kind)
            .execute(&pool)
            .await?;
        }

        println!("Seeded asset {} with its system wallets", code);
    }

    println!("✅ Ledger DB initialized successfully!");
    Ok(())
}
