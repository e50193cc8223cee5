use sqlx::error::ErrorKind;
use thiserror::Error;

use crate::domain::error::LedgerError;

/// Error a nivel de store, previo a la clasificacion de dominio.
///
/// Las violaciones de integridad (unicidad, check, FK, NOT NULL) se
/// distinguen del resto de fallos de base de datos: el motor las necesita
/// separadas para resolver la carrera de claves de idempotencia con una
/// segunda consulta en vez de propagar el error crudo.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Integrity violation on {}", constraint.as_deref().unwrap_or("unnamed constraint"))]
    IntegrityViolation { constraint: Option<String> },

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, StoreError::IntegrityViolation { .. })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            match db.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => {
                    return StoreError::IntegrityViolation {
                        constraint: db.constraint().map(str::to_owned),
                    };
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        LedgerError::Store(err.to_string())
    }
}
