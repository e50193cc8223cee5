use crate::domain::entities::{Wallet, WalletBalanceView};
use crate::domain::error::LedgerError;
use crate::domain::types::{AssetTypeId, UserId, WalletId};
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

// Interface (Port) para las lecturas de billeteras fuera del alcance
// transaccional del motor. Las operaciones con lock viven en la capa de
// infraestructura porque exigen una conexion dentro de la transaccion.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WalletRepository: Send + Sync {
    async fn find_by_id(&self, id: WalletId) -> Result<Option<Wallet>, LedgerError>;

    async fn find_by_user_and_asset(
        &self,
        user_id: UserId,
        asset_type_id: AssetTypeId,
    ) -> Result<Option<Wallet>, LedgerError>;

    /// Saldo + codigo del activo resuelto con un JOIN al momento de leer.
    async fn balance_view(
        &self,
        user_id: UserId,
        asset_type_id: AssetTypeId,
    ) -> Result<Option<WalletBalanceView>, LedgerError>;
}
