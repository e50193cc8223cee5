use sqlx::PgConnection;

use crate::domain::entities::AssetType;
use crate::infrastructure::persistence::models::AssetTypeModel;
use crate::infrastructure::persistence::store::StoreError;

/// Repositorio de Tipos de Activo basado en PostgreSQL.
///
/// Solo expone operaciones dentro del alcance transaccional del motor: la
/// resolucion del codigo ocurre siempre con los locks de billetera por tomar,
/// asi que cada funcion recibe la conexion de la transaccion en curso.
pub struct PostgresAssetTypeRepository;

impl PostgresAssetTypeRepository {
    /// Busca un tipo de activo por su codigo. Los codigos distinguen mayusculas.
    pub async fn find_by_code(
        conn: &mut PgConnection,
        code: &str,
    ) -> Result<Option<AssetType>, StoreError> {
        let model_opt = sqlx::query_as::<_, AssetTypeModel>(
            r#"
            SELECT * FROM asset_types
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&mut *conn)
        .await
        .map_err(StoreError::from)?;

        Ok(model_opt.map(|m| m.into()))
    }
}
