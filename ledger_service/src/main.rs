use axum::routing::get;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use ledger_service::{
    api::http_routes::{self, routes, AppState},
    config::Settings,
    infrastructure::persistence::wallet_repository::PostgresWalletRepository,
    use_cases::{
        get_wallet_balance::GetWalletBalanceUseCase,
        process_transaction::ProcessTransactionUseCase,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        ledger_service::api::http_routes::topup,
        ledger_service::api::http_routes::bonus,
        ledger_service::api::http_routes::spend,
        ledger_service::api::http_routes::get_wallet_balance,
        ledger_service::api::http_routes::health_check
    ),
    components(schemas(
        ledger_service::api::http_routes::MovementRequestDto,
        ledger_service::api::response::TransactionResponse,
        ledger_service::api::response::WalletBalanceResponse
    ))
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Cargar variables de entorno
    dotenv().ok();

    // 2. Configurar Logging/Tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting Wallet Ledger Service...");

    // 3. Cargar configuracion y conectar a la base de datos
    let settings = Settings::from_env()?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await?;

    info!("Connected to Database");

    // 4. Instanciar Dependencias (Infraestructura)
    let wallet_repo = Arc::new(PostgresWalletRepository::new(pool.clone()));

    // 5. Instanciar Casos de Uso
    let process_transaction_use_case = ProcessTransactionUseCase::new(pool.clone());
    let get_wallet_balance_use_case = GetWalletBalanceUseCase::new(wallet_repo);

    // 6. Configurar Estado de la App Axum
    let app_state = Arc::new(AppState {
        process_transaction_use_case,
        get_wallet_balance_use_case,
    });

    // 7. Configurar Rutas y Servidor
    let app = axum::Router::new()
        .route("/health", get(http_routes::health_check))
        .nest(&settings.api_v1_prefix, routes(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    info!(
        "{} listening on {} (API prefix {})",
        settings.project_name, addr, settings.api_v1_prefix
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
