use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(&'static str),
}

/// Configuracion del servicio, cargada una sola vez desde el entorno.
///
/// El proceso la posee (junto con el pool de conexiones); el motor nunca lee
/// el entorno ni mantiene estado global propio.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub app_env: String,
    pub secret_key: String,
    pub api_v1_prefix: String,
    pub project_name: String,
    /// Solo la usan los tests de integracion; nunca el servicio en ejecucion.
    pub test_database_url: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: require("DATABASE_URL")?,
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            secret_key: require("SECRET_KEY")?,
            api_v1_prefix: env::var("API_V1_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
            project_name: env::var("PROJECT_NAME")
                .unwrap_or_else(|_| "Wallet Ledger Service".to_string()),
            test_database_url: env::var("TEST_DATABASE_URL").ok(),
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}
