use serde::{Deserialize, Serialize};
use std::fmt;

/// Identificador de Usuario usando NewType Pattern.
///
/// Los valores negativos estan reservados para las billeteras del sistema
/// (ver [`SystemWalletKind::owner_id`]); los usuarios reales siempre son > 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct UserId(pub i64);

impl UserId {
    pub fn is_system(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identificador de Billetera usando NewType Pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct WalletId(pub i64);

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identificador de Tipo de Activo usando NewType Pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct AssetTypeId(pub i32);

impl fmt::Display for AssetTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tipos de movimiento soportados por el motor de transacciones.
///
/// Cada tipo es una instancia del mismo protocolo de dos partidas; solo
/// cambia que billetera del sistema participa y en que direccion fluye el
/// valor (ver la tabla de politicas en `use_cases::process_transaction`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Topup,
    Spend,
    Bonus,
}

impl TransactionKind {
    /// Billetera del sistema que participa en el movimiento.
    pub fn system_wallet(&self) -> SystemWalletKind {
        match self {
            TransactionKind::Topup => SystemWalletKind::Treasury,
            TransactionKind::Spend => SystemWalletKind::Revenue,
            TransactionKind::Bonus => SystemWalletKind::Marketing,
        }
    }

    /// `true` cuando la billetera del usuario es el origen (se debita).
    pub fn user_is_source(&self) -> bool {
        matches!(self, TransactionKind::Spend)
    }

    /// `true` cuando el origen debe cubrir el monto antes de mover fondos.
    /// TOPUP queda exento: la tesoreria puede quedar en negativo.
    pub fn requires_source_funds(&self) -> bool {
        matches!(self, TransactionKind::Spend | TransactionKind::Bonus)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Topup => "TOPUP",
            TransactionKind::Spend => "SPEND",
            TransactionKind::Bonus => "BONUS",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estados del ciclo de vida de una transaccion.
///
/// `Pending` -> `Completed` o `Failed`; ambos estados finales son terminales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

/// Lado de una partida contable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    Debit,
    Credit,
}

/// Billeteras del sistema: pools contables con `user_id` reservado negativo.
///
/// # Examples
/// ```
/// use ledger_service::domain::types::SystemWalletKind;
///
/// assert_eq!(SystemWalletKind::Treasury.owner_id().0, -1);
/// assert_eq!(SystemWalletKind::Revenue.as_str(), "REVENUE");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemWalletKind {
    Treasury,
    Marketing,
    Revenue,
}

impl SystemWalletKind {
    /// `user_id` reservado de la billetera del sistema.
    pub fn owner_id(&self) -> UserId {
        match self {
            SystemWalletKind::Treasury => UserId(-1),
            SystemWalletKind::Marketing => UserId(-2),
            SystemWalletKind::Revenue => UserId(-3),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SystemWalletKind::Treasury => "TREASURY",
            SystemWalletKind::Marketing => "MARKETING",
            SystemWalletKind::Revenue => "REVENUE",
        }
    }
}

impl fmt::Display for SystemWalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_owner_ids_are_reserved_negatives() {
        assert_eq!(SystemWalletKind::Treasury.owner_id(), UserId(-1));
        assert_eq!(SystemWalletKind::Marketing.owner_id(), UserId(-2));
        assert_eq!(SystemWalletKind::Revenue.owner_id(), UserId(-3));
        assert!(SystemWalletKind::Treasury.owner_id().is_system());
    }

    #[test]
    fn test_kind_policy_table() {
        // TOPUP: Treasury -> user, sin chequeo de fondos
        assert_eq!(TransactionKind::Topup.system_wallet(), SystemWalletKind::Treasury);
        assert!(!TransactionKind::Topup.user_is_source());
        assert!(!TransactionKind::Topup.requires_source_funds());

        // BONUS: Marketing -> user, marketing debe cubrir el monto
        assert_eq!(TransactionKind::Bonus.system_wallet(), SystemWalletKind::Marketing);
        assert!(!TransactionKind::Bonus.user_is_source());
        assert!(TransactionKind::Bonus.requires_source_funds());

        // SPEND: user -> Revenue, el usuario debe cubrir el monto
        assert_eq!(TransactionKind::Spend.system_wallet(), SystemWalletKind::Revenue);
        assert!(TransactionKind::Spend.user_is_source());
        assert!(TransactionKind::Spend.requires_source_funds());
    }

    #[test]
    fn test_kind_serializes_screaming_snake_case() {
        assert_eq!(serde_json::to_string(&TransactionKind::Topup).unwrap(), "\"TOPUP\"");
        assert_eq!(serde_json::to_string(&TransactionStatus::Completed).unwrap(), "\"COMPLETED\"");
        assert_eq!(serde_json::to_string(&EntryType::Debit).unwrap(), "\"DEBIT\"");
    }
}
