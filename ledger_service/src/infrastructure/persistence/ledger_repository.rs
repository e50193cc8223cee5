use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::domain::entities::LedgerEntry;
use crate::domain::types::{EntryType, WalletId};
use crate::infrastructure::persistence::models::LedgerEntryModel;
use crate::infrastructure::persistence::store::StoreError;

/// Parametros de una partida contable. El monto lleva signo: DEBIT negativo,
/// CREDIT positivo.
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub transaction_id: String,
    pub wallet_id: WalletId,
    pub entry_type: EntryType,
    pub amount: Decimal,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub description: Option<String>,
}

/// Repositorio del Libro Mayor basado en PostgreSQL. Append-only.
pub struct PostgresLedgerRepository {
    pool: PgPool,
}

impl PostgresLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserta una partida dentro del alcance transaccional del movimiento.
    pub async fn insert(
        conn: &mut PgConnection,
        entry: NewLedgerEntry,
    ) -> Result<LedgerEntry, StoreError> {
        let model = sqlx::query_as::<_, LedgerEntryModel>(
            r#"
            INSERT INTO ledger_entries (
                transaction_id, wallet_id, entry_type,
                amount, balance_before, balance_after, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&entry.transaction_id)
        .bind(entry.wallet_id)
        .bind(entry.entry_type)
        .bind(entry.amount)
        .bind(entry.balance_before)
        .bind(entry.balance_after)
        .bind(entry.description)
        .fetch_one(&mut *conn)
        .await
        .map_err(StoreError::from)?;

        Ok(model.into())
    }

    /// Recupera las partidas de una transaccion (dos para las COMPLETED,
    /// ninguna para PENDING/FAILED), ordenadas por creacion.
    pub async fn find_by_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let models = sqlx::query_as::<_, LedgerEntryModel>(
            r#"
            SELECT * FROM ledger_entries
            WHERE transaction_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }
}
