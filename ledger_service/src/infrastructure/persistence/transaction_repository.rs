use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::domain::entities::Transaction;
use crate::domain::types::{AssetTypeId, TransactionKind, TransactionStatus, UserId};
use crate::infrastructure::persistence::models::TransactionModel;
use crate::infrastructure::persistence::store::StoreError;

/// Parametros para registrar la intencion de un movimiento (fila PENDING).
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub transaction_id: String,
    pub idempotency_key: String,
    pub transaction_type: TransactionKind,
    pub user_id: UserId,
    pub asset_type_id: AssetTypeId,
    pub amount: Decimal,
    pub metadata: Option<serde_json::Value>,
}

/// Repositorio de Transacciones basado en PostgreSQL.
///
/// Las funciones asociadas corren dentro del alcance transaccional del motor;
/// los metodos de instancia usan el pool y existen para las consultas que
/// ocurren FUERA de ese alcance (la re-verificacion tras un rollback y la
/// marca best-effort de FAILED).
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Busca por clave de idempotencia dentro del alcance en curso.
    ///
    /// Es la verificacion CONSULTIVA del protocolo: la restriccion UNIQUE
    /// sobre `idempotency_key` sigue siendo la autoridad final.
    pub async fn find_by_idempotency_key(
        conn: &mut PgConnection,
        idempotency_key: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        let model_opt = sqlx::query_as::<_, TransactionModel>(
            r#"
            SELECT * FROM transactions
            WHERE idempotency_key = $1
            "#,
        )
        .bind(idempotency_key)
        .fetch_optional(&mut *conn)
        .await
        .map_err(StoreError::from)?;

        Ok(model_opt.map(|m| m.into()))
    }

    /// Inserta una transaccion nueva en estado PENDING (INSERT .. RETURNING).
    ///
    /// # Errores
    /// Una carrera sobre `idempotency_key` emerge como
    /// [`StoreError::IntegrityViolation`]; el motor la resuelve con una
    /// segunda consulta tras el rollback.
    pub async fn insert_pending(
        conn: &mut PgConnection,
        new: NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let model = sqlx::query_as::<_, TransactionModel>(
            r#"
            INSERT INTO transactions (
                transaction_id, idempotency_key, transaction_type,
                user_id, asset_type_id, amount, transaction_metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&new.transaction_id)
        .bind(&new.idempotency_key)
        .bind(new.transaction_type)
        .bind(new.user_id)
        .bind(new.asset_type_id)
        .bind(new.amount)
        .bind(new.metadata)
        .fetch_one(&mut *conn)
        .await
        .map_err(StoreError::from)?;

        Ok(model.into())
    }

    /// Transiciona el estado de una transaccion.
    ///
    /// Fija `completed_at = now()` solo al pasar a COMPLETED y escribe
    /// `error_message` solo al pasar a FAILED. Devuelve `None` si la fila
    /// no existe (p. ej. la fila PENDING ya fue revertida).
    pub async fn update_status(
        conn: &mut PgConnection,
        transaction_id: &str,
        status: TransactionStatus,
        error_message: Option<&str>,
    ) -> Result<Option<Transaction>, StoreError> {
        let model_opt = sqlx::query_as::<_, TransactionModel>(
            r#"
            UPDATE transactions
            SET status = $2,
                completed_at = CASE WHEN $2 = 'COMPLETED' THEN now() ELSE completed_at END,
                error_message = CASE WHEN $2 = 'FAILED' THEN $3 ELSE error_message END
            WHERE transaction_id = $1
            RETURNING *
            "#,
        )
        .bind(transaction_id)
        .bind(status)
        .bind(error_message)
        .fetch_optional(&mut *conn)
        .await
        .map_err(StoreError::from)?;

        Ok(model_opt.map(|m| m.into()))
    }

    /// Re-verificacion de idempotencia fuera de todo alcance transaccional.
    ///
    /// Se usa tras un rollback por violacion de integridad: si otra peticion
    /// gano la carrera, su fila ya es visible aqui.
    pub async fn refetch_by_idempotency_key(
        &self,
        idempotency_key: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::from)?;
        Self::find_by_idempotency_key(&mut conn, idempotency_key).await
    }

    /// Busca una transaccion por su identificador externo.
    pub async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        let model_opt = sqlx::query_as::<_, TransactionModel>(
            r#"
            SELECT * FROM transactions
            WHERE transaction_id = $1
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from)?;

        Ok(model_opt.map(|m| m.into()))
    }

    /// Marca best-effort de FAILED tras un rollback.
    ///
    /// La fila PENDING fue revertida junto con el resto del alcance, asi que
    /// normalmente no afecta ninguna fila; devuelve `true` solo si existia.
    pub async fn mark_failed(
        &self,
        transaction_id: &str,
        error_message: &str,
    ) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::from)?;
        let updated = Self::update_status(
            &mut conn,
            transaction_id,
            TransactionStatus::Failed,
            Some(error_message),
        )
        .await?;

        Ok(updated.is_some())
    }
}
