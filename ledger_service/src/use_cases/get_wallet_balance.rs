use std::sync::Arc;

use crate::domain::entities::WalletBalanceView;
use crate::domain::error::LedgerError;
use crate::domain::repository::WalletRepository;
use crate::domain::types::{AssetTypeId, UserId};

/// Caso de uso de consulta de saldo para un (usuario, activo).
///
/// Lectura pura sobre el puerto de billeteras, sin locks ni alcance
/// transaccional; el codigo del activo llega resuelto por el JOIN de lectura.
#[derive(Clone)]
pub struct GetWalletBalanceUseCase {
    wallet_repo: Arc<dyn WalletRepository>,
}

impl GetWalletBalanceUseCase {
    pub fn new(wallet_repo: Arc<dyn WalletRepository>) -> Self {
        Self { wallet_repo }
    }

    #[tracing::instrument(name = "GetWalletBalanceUseCase::execute", skip(self))]
    pub async fn execute(
        &self,
        user_id: UserId,
        asset_type_id: AssetTypeId,
    ) -> Result<WalletBalanceView, LedgerError> {
        self.wallet_repo
            .balance_view(user_id, asset_type_id)
            .await?
            .ok_or(LedgerError::WalletNotFound {
                user_id,
                asset_type_id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::MockWalletRepository;
    use mockall::predicate::eq;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_get_balance_returns_view_for_existing_wallet() {
        // Arrange
        let mut mock_repo = MockWalletRepository::new();
        let user_id = UserId(42);
        let asset_type_id = AssetTypeId(1);

        mock_repo
            .expect_balance_view()
            .with(eq(user_id), eq(asset_type_id))
            .times(1)
            .returning(move |user_id, asset_type_id| {
                Ok(Some(WalletBalanceView {
                    user_id,
                    asset_type_id,
                    asset_type_code: "COINS".to_string(),
                    balance: dec!(250.50),
                }))
            });

        let use_case = GetWalletBalanceUseCase::new(Arc::new(mock_repo));

        // Act
        let result = use_case.execute(user_id, asset_type_id).await;

        // Assert
        let view = result.expect("balance query should succeed");
        assert_eq!(view.user_id, user_id);
        assert_eq!(view.asset_type_code, "COINS");
        assert_eq!(view.balance, dec!(250.50));
    }

    #[tokio::test]
    async fn test_get_balance_missing_wallet_is_not_found() {
        // Arrange
        let mut mock_repo = MockWalletRepository::new();

        mock_repo
            .expect_balance_view()
            .times(1)
            .returning(|_, _| Ok(None));

        let use_case = GetWalletBalanceUseCase::new(Arc::new(mock_repo));

        // Act
        let result = use_case.execute(UserId(7), AssetTypeId(3)).await;

        // Assert
        match result.unwrap_err() {
            LedgerError::WalletNotFound {
                user_id,
                asset_type_id,
            } => {
                assert_eq!(user_id, UserId(7));
                assert_eq!(asset_type_id, AssetTypeId(3));
            }
            other => panic!("Expected WalletNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_balance_propagates_store_errors() {
        // Arrange
        let mut mock_repo = MockWalletRepository::new();

        mock_repo
            .expect_balance_view()
            .times(1)
            .returning(|_, _| Err(LedgerError::Store("connection reset".to_string())));

        let use_case = GetWalletBalanceUseCase::new(Arc::new(mock_repo));

        // Act
        let result = use_case.execute(UserId(1), AssetTypeId(1)).await;

        // Assert
        assert!(matches!(result, Err(LedgerError::Store(_))));
    }
}
