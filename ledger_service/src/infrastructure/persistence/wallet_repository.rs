use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::domain::entities::{Wallet, WalletBalanceView};
use crate::domain::error::LedgerError;
use crate::domain::repository::WalletRepository;
use crate::domain::types::{AssetTypeId, SystemWalletKind, UserId, WalletId};
use crate::infrastructure::persistence::models::{WalletBalanceModel, WalletModel};
use crate::infrastructure::persistence::store::StoreError;

/// Repositorio de Billeteras basado en PostgreSQL.
///
/// Los metodos de instancia leen sobre el pool (sin locks) y sirven al
/// adaptador HTTP. Las funciones asociadas operan sobre la conexion de una
/// transaccion en curso: son las unicas que adquieren o dependen de locks de
/// fila, y el lock vive hasta el commit/rollback de ese alcance.
pub struct PostgresWalletRepository {
    pool: PgPool,
}

impl PostgresWalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Busca la billetera y la BLOQUEA para la transaccion en curso.
    ///
    /// Usa `SELECT ... FOR UPDATE`: cualquier escritor concurrente de la misma
    /// fila queda bloqueado hasta commit/rollback. Si la fila no existe
    /// devuelve `None` sin adquirir ningun lock.
    pub async fn find_with_lock(
        conn: &mut PgConnection,
        user_id: UserId,
        asset_type_id: AssetTypeId,
    ) -> Result<Option<Wallet>, StoreError> {
        let model_opt = sqlx::query_as::<_, WalletModel>(
            r#"
            SELECT * FROM wallets
            WHERE user_id = $1 AND asset_type_id = $2
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .bind(asset_type_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(StoreError::from)?;

        Ok(model_opt.map(|m| m.into()))
    }

    /// Inserta una billetera con saldo 0, visible de inmediato dentro del
    /// alcance (el INSERT se ejecuta sobre la conexion de la transaccion).
    pub async fn insert(
        conn: &mut PgConnection,
        user_id: UserId,
        asset_type_id: AssetTypeId,
        is_system_wallet: bool,
        system_wallet_type: Option<SystemWalletKind>,
    ) -> Result<Wallet, StoreError> {
        let model = sqlx::query_as::<_, WalletModel>(
            r#"
            INSERT INTO wallets (user_id, asset_type_id, is_system_wallet, system_wallet_type)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(asset_type_id)
        .bind(is_system_wallet)
        .bind(system_wallet_type)
        .fetch_one(&mut *conn)
        .await
        .map_err(StoreError::from)?;

        Ok(model.into())
    }

    /// Escribe el nuevo saldo de una billetera ya bloqueada en este alcance.
    ///
    /// Siempre llamar primero a [`Self::find_with_lock`]; fuera de un alcance
    /// con el lock tomado esta escritura no tiene garantias de consistencia.
    pub async fn set_balance(
        conn: &mut PgConnection,
        id: WalletId,
        new_balance: Decimal,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE wallets
            SET balance = $1,
                updated_at = now()
            WHERE id = $2
            "#,
        )
        .bind(new_balance)
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(StoreError::from)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Database(sqlx::Error::RowNotFound));
        }

        Ok(())
    }
}

#[async_trait]
impl WalletRepository for PostgresWalletRepository {
    /// Busca una billetera por su ID.
    async fn find_by_id(&self, id: WalletId) -> Result<Option<Wallet>, LedgerError> {
        let model_opt = sqlx::query_as::<_, WalletModel>(
            r#"
            SELECT * FROM wallets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::Store(e.to_string()))?;

        Ok(model_opt.map(|m| m.into()))
    }

    /// Busca la billetera de un usuario para un activo por su clave logica.
    async fn find_by_user_and_asset(
        &self,
        user_id: UserId,
        asset_type_id: AssetTypeId,
    ) -> Result<Option<Wallet>, LedgerError> {
        let model_opt = sqlx::query_as::<_, WalletModel>(
            r#"
            SELECT * FROM wallets
            WHERE user_id = $1 AND asset_type_id = $2
            "#,
        )
        .bind(user_id)
        .bind(asset_type_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::Store(e.to_string()))?;

        Ok(model_opt.map(|m| m.into()))
    }

    /// Saldo + codigo del activo, resuelto con un JOIN al momento de leer.
    async fn balance_view(
        &self,
        user_id: UserId,
        asset_type_id: AssetTypeId,
    ) -> Result<Option<WalletBalanceView>, LedgerError> {
        let model_opt = sqlx::query_as::<_, WalletBalanceModel>(
            r#"
            SELECT w.user_id, w.asset_type_id, a.code AS asset_type_code, w.balance
            FROM wallets w
            JOIN asset_types a ON a.id = w.asset_type_id
            WHERE w.user_id = $1 AND w.asset_type_id = $2
            "#,
        )
        .bind(user_id)
        .bind(asset_type_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::Store(e.to_string()))?;

        Ok(model_opt.map(|m| m.into()))
    }
}
