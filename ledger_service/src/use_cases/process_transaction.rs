use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::Transaction;
use crate::domain::error::LedgerError;
use crate::domain::types::{EntryType, TransactionKind, TransactionStatus, UserId};
use crate::infrastructure::persistence::asset_type_repository::PostgresAssetTypeRepository;
use crate::infrastructure::persistence::ledger_repository::{
    NewLedgerEntry, PostgresLedgerRepository,
};
use crate::infrastructure::persistence::store::StoreError;
use crate::infrastructure::persistence::transaction_repository::{
    NewTransaction, PostgresTransactionRepository,
};
use crate::infrastructure::persistence::wallet_repository::PostgresWalletRepository;

const MAX_IDEMPOTENCY_KEY_LEN: usize = 100;
const MAX_ASSET_CODE_LEN: usize = 50;
// NUMERIC(20, 8): 8 decimales exactos y hasta 12 digitos enteros
const MAX_AMOUNT_SCALE: u32 = 8;
const MAX_AMOUNT_INTEGER_DIGITS: u32 = 12;

/// Comando de movimiento: una invocacion del protocolo de dos partidas.
#[derive(Debug, Clone)]
pub struct MovementRequest {
    pub idempotency_key: String,
    pub user_id: UserId,
    pub asset_type: String,
    pub amount: Decimal,
    pub metadata: Option<serde_json::Value>,
}

impl MovementRequest {
    /// Valida forma y rango antes de tocar el store.
    ///
    /// # Examples
    /// ```
    /// use ledger_service::use_cases::process_transaction::MovementRequest;
    /// use ledger_service::domain::types::UserId;
    /// use rust_decimal::Decimal;
    ///
    /// let request = MovementRequest {
    ///     idempotency_key: "order-42".to_string(),
    ///     user_id: UserId(7),
    ///     asset_type: "COINS".to_string(),
    ///     amount: Decimal::new(10_050, 2), // 100.50
    ///     metadata: None,
    /// };
    /// assert!(request.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.idempotency_key.is_empty() || self.idempotency_key.len() > MAX_IDEMPOTENCY_KEY_LEN {
            return Err(LedgerError::Validation(format!(
                "idempotency_key must be between 1 and {} characters",
                MAX_IDEMPOTENCY_KEY_LEN
            )));
        }
        if self.user_id.0 <= 0 {
            return Err(LedgerError::Validation(
                "user_id must be a positive integer".to_string(),
            ));
        }
        if self.asset_type.is_empty() || self.asset_type.len() > MAX_ASSET_CODE_LEN {
            return Err(LedgerError::Validation(format!(
                "asset_type must be between 1 and {} characters",
                MAX_ASSET_CODE_LEN
            )));
        }
        if self.amount <= Decimal::ZERO {
            return Err(LedgerError::Validation(
                "amount must be greater than zero".to_string(),
            ));
        }
        if self.amount.scale() > MAX_AMOUNT_SCALE {
            return Err(LedgerError::Validation(format!(
                "amount supports at most {} decimal places",
                MAX_AMOUNT_SCALE
            )));
        }
        if self.amount >= Decimal::from(10i64.pow(MAX_AMOUNT_INTEGER_DIGITS)) {
            return Err(LedgerError::Validation(
                "amount exceeds the supported precision".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fallo interno del protocolo, previo a su clasificacion hacia el cliente.
///
/// Las violaciones de integridad NO se traducen directo a un error de
/// dominio: primero se re-verifica la clave de idempotencia, porque la causa
/// tipica es una carrera entre dos reintentos del mismo movimiento.
enum MovementFailure {
    Domain(LedgerError),
    Store(StoreError),
}

impl From<LedgerError> for MovementFailure {
    fn from(e: LedgerError) -> Self {
        MovementFailure::Domain(e)
    }
}

impl From<StoreError> for MovementFailure {
    fn from(e: StoreError) -> Self {
        MovementFailure::Store(e)
    }
}

/// Caso de uso central: el motor de movimientos del ledger.
///
/// Los tres tipos (`top_up`, `bonus`, `spend`) son instancias del mismo
/// protocolo atomico de dos partidas; la politica por tipo vive en
/// [`TransactionKind`]:
///
/// | Tipo  | Origen (DEBIT)      | Destino (CREDIT)  | Chequeo de fondos |
/// |-------|---------------------|-------------------|-------------------|
/// | TOPUP | billetera TREASURY  | billetera usuario | ninguno           |
/// | BONUS | billetera MARKETING | billetera usuario | marketing >= monto|
/// | SPEND | billetera usuario   | billetera REVENUE | usuario >= monto  |
///
/// Cada invocacion corre en SU propio alcance transaccional del store; el
/// motor no mantiene estado compartido fuera del pool de conexiones.
///
/// # Examples
/// ```ignore
/// use ledger_service::use_cases::process_transaction::{MovementRequest, ProcessTransactionUseCase};
///
/// let engine = ProcessTransactionUseCase::new(pool);
/// let completed = engine.top_up(request).await?;
/// assert_eq!(completed.status, TransactionStatus::Completed);
/// ```
pub struct ProcessTransactionUseCase {
    pool: PgPool,
    transaction_repo: PostgresTransactionRepository,
}

impl ProcessTransactionUseCase {
    pub fn new(pool: PgPool) -> Self {
        Self {
            transaction_repo: PostgresTransactionRepository::new(pool.clone()),
            pool,
        }
    }

    /// TOPUP: la tesoreria financia la compra del usuario (puede quedar en negativo).
    pub async fn top_up(&self, request: MovementRequest) -> Result<Transaction, LedgerError> {
        self.process(TransactionKind::Topup, request).await
    }

    /// BONUS: marketing regala saldo al usuario, si el pool alcanza.
    pub async fn bonus(&self, request: MovementRequest) -> Result<Transaction, LedgerError> {
        self.process(TransactionKind::Bonus, request).await
    }

    /// SPEND: el usuario consume saldo hacia la billetera de ingresos.
    pub async fn spend(&self, request: MovementRequest) -> Result<Transaction, LedgerError> {
        self.process(TransactionKind::Spend, request).await
    }

    #[tracing::instrument(
        name = "ProcessTransactionUseCase::process",
        skip(self, request),
        fields(kind = %kind, user_id = %request.user_id, idempotency_key = %request.idempotency_key)
    )]
    async fn process(
        &self,
        kind: TransactionKind,
        request: MovementRequest,
    ) -> Result<Transaction, LedgerError> {
        request.validate()?;

        // El UUID se genera antes de abrir el alcance para poder referirlo
        // tambien en la ruta de fallo (marca best-effort de FAILED).
        let transaction_id = Uuid::new_v4().to_string();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerError::Store(e.to_string()))?;

        match self
            .run_protocol(&mut tx, kind, &transaction_id, &request)
            .await
        {
            Ok(completed) => match tx.commit().await {
                Ok(()) => Ok(completed),
                // Un commit fallido deja el alcance revertido del lado del
                // servidor; se recorre la misma ruta de recuperacion.
                Err(e) => {
                    self.recover(kind, &transaction_id, &request, StoreError::from(e).into())
                        .await
                }
            },
            Err(failure) => {
                if let Err(e) = tx.rollback().await {
                    tracing::error!("Rollback failed after movement error: {}", e);
                }
                self.recover(kind, &transaction_id, &request, failure).await
            }
        }
    }

    /// El protocolo de ocho pasos, completo dentro de UN alcance transaccional.
    async fn run_protocol(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        kind: TransactionKind,
        transaction_id: &str,
        request: &MovementRequest,
    ) -> Result<Transaction, MovementFailure> {
        // Paso 1: verificacion consultiva de idempotencia. Si la clave ya
        // existe se devuelve la transaccion previa SIN re-ejecutar efectos,
        // cualquiera sea su estado. La restriccion UNIQUE sigue siendo la
        // autoridad final (paso 6 puede fallar igual bajo carrera).
        if let Some(existing) = PostgresTransactionRepository::find_by_idempotency_key(
            &mut *tx,
            &request.idempotency_key,
        )
        .await?
        {
            tracing::debug!(
                transaction_id = %existing.transaction_id,
                "Idempotency key already processed; returning prior transaction"
            );
            return Ok(existing);
        }

        // Paso 2: resolver el tipo de activo por codigo
        let asset = PostgresAssetTypeRepository::find_by_code(&mut *tx, &request.asset_type)
            .await?
            .ok_or_else(|| LedgerError::AssetUnknown(request.asset_type.clone()))?;

        // Paso 3: locks de fila en orden global determinista: owner ascendente
        // dentro del activo. Los owners del sistema son negativos y user_id ya
        // se valido > 0, asi que la billetera del sistema se bloquea primero,
        // con el mismo orden para los tres tipos de movimiento.
        let system_kind = kind.system_wallet();
        let system_owner = system_kind.owner_id();
        debug_assert!(system_owner < request.user_id);

        let system_wallet =
            PostgresWalletRepository::find_with_lock(&mut *tx, system_owner, asset.id)
                .await?
                .ok_or_else(|| LedgerError::SystemWalletMissing {
                    kind: system_kind,
                    asset: asset.code.clone(),
                })?;

        // Paso 4: creacion perezosa de la billetera del usuario. Tambien para
        // SPEND: la billetera nace en 0 y el paso 5 rechaza el movimiento.
        let user_wallet = match PostgresWalletRepository::find_with_lock(
            &mut *tx,
            request.user_id,
            asset.id,
        )
        .await?
        {
            Some(wallet) => wallet,
            None => {
                PostgresWalletRepository::insert(&mut *tx, request.user_id, asset.id, false, None)
                    .await?;
                // Re-toma el lock sobre la fila recien insertada; una carrera
                // de creacion emerge como violacion de `uq_user_asset` y se
                // resuelve en la ruta de recuperacion.
                PostgresWalletRepository::find_with_lock(&mut *tx, request.user_id, asset.id)
                    .await?
                    .ok_or_else(|| {
                        LedgerError::Internal("wallet row missing right after insert".to_string())
                    })?
            }
        };

        let (source, destination) = if kind.user_is_source() {
            (user_wallet, system_wallet)
        } else {
            (system_wallet, user_wallet)
        };

        // Paso 5: chequeo de fondos sobre el saldo recien bloqueado del origen
        if kind.requires_source_funds() && source.balance < request.amount {
            return Err(LedgerError::InsufficientFunds {
                available: source.balance,
                required: request.amount,
            }
            .into());
        }

        // Paso 6: registrar la intencion como fila PENDING
        PostgresTransactionRepository::insert_pending(
            &mut *tx,
            NewTransaction {
                transaction_id: transaction_id.to_string(),
                idempotency_key: request.idempotency_key.clone(),
                transaction_type: kind,
                user_id: request.user_id,
                asset_type_id: asset.id,
                amount: request.amount,
                metadata: request.metadata.clone(),
            },
        )
        .await?;

        // Paso 7: partida doble con aritmetica decimal exacta
        let source_before = source.balance;
        let destination_before = destination.balance;
        let source_after = source_before - request.amount;
        let destination_after = destination_before + request.amount;

        PostgresWalletRepository::set_balance(&mut *tx, source.id, source_after).await?;
        PostgresWalletRepository::set_balance(&mut *tx, destination.id, destination_after).await?;

        PostgresLedgerRepository::insert(
            &mut *tx,
            NewLedgerEntry {
                transaction_id: transaction_id.to_string(),
                wallet_id: source.id,
                entry_type: EntryType::Debit,
                amount: -request.amount,
                balance_before: source_before,
                balance_after: source_after,
                description: Some(debit_description(kind, request)),
            },
        )
        .await?;

        PostgresLedgerRepository::insert(
            &mut *tx,
            NewLedgerEntry {
                transaction_id: transaction_id.to_string(),
                wallet_id: destination.id,
                entry_type: EntryType::Credit,
                amount: request.amount,
                balance_before: destination_before,
                balance_after: destination_after,
                description: Some(credit_description(kind, request)),
            },
        )
        .await?;

        // Paso 8: transicion a COMPLETED; el commit ocurre en el llamador
        let completed = PostgresTransactionRepository::update_status(
            &mut *tx,
            transaction_id,
            TransactionStatus::Completed,
            None,
        )
        .await?
        .ok_or_else(|| {
            LedgerError::Internal("pending transaction vanished before completion".to_string())
        })?;

        Ok(completed)
    }

    /// Ruta de recuperacion tras el rollback del alcance.
    ///
    /// La carrera de idempotencia se resuelve como flujo de control explicito:
    /// intento de insert -> violacion de unicidad -> re-consulta -> devolver
    /// la fila ganadora. Solo si no hay fila visible se clasifica como
    /// `DuplicateTransaction`.
    async fn recover(
        &self,
        kind: TransactionKind,
        transaction_id: &str,
        request: &MovementRequest,
        failure: MovementFailure,
    ) -> Result<Transaction, LedgerError> {
        match failure {
            MovementFailure::Store(StoreError::IntegrityViolation { constraint }) => {
                tracing::debug!(
                    ?constraint,
                    "Integrity violation during movement; re-checking idempotency key"
                );
                match self
                    .transaction_repo
                    .refetch_by_idempotency_key(&request.idempotency_key)
                    .await
                {
                    Ok(Some(existing)) => Ok(existing),
                    Ok(None) => Err(LedgerError::DuplicateTransaction(
                        request.idempotency_key.clone(),
                    )),
                    Err(e) => Err(LedgerError::Store(e.to_string())),
                }
            }
            failure => {
                let error = match failure {
                    MovementFailure::Domain(e) => e,
                    MovementFailure::Store(e) => LedgerError::Store(e.to_string()),
                };

                // Marca best-effort: la fila PENDING se revirtio junto con el
                // resto del alcance, asi que normalmente no afecta ninguna fila
                // y el intento fallido solo queda en el log (ver DESIGN.md).
                match self
                    .transaction_repo
                    .mark_failed(transaction_id, &error.to_string())
                    .await
                {
                    Ok(true) => tracing::warn!(
                        %transaction_id, kind = %kind,
                        "Movement failed; transaction marked FAILED"
                    ),
                    Ok(false) => tracing::warn!(
                        %transaction_id, kind = %kind, error = %error,
                        "Movement failed with no durable record to mark FAILED"
                    ),
                    Err(e) => tracing::error!(
                        %transaction_id,
                        "Could not mark transaction FAILED: {}", e
                    ),
                }

                Err(error)
            }
        }
    }
}

fn debit_description(kind: TransactionKind, request: &MovementRequest) -> String {
    match kind {
        TransactionKind::Topup => format!(
            "User {} purchased {} {}",
            request.user_id, request.amount, request.asset_type
        ),
        TransactionKind::Bonus => format!("Bonus granted to user {}", request.user_id),
        TransactionKind::Spend => format!(
            "User {} spent {} {}",
            request.user_id, request.amount, request.asset_type
        ),
    }
}

fn credit_description(kind: TransactionKind, request: &MovementRequest) -> String {
    match kind {
        TransactionKind::Topup => format!("Purchased {} {}", request.amount, request.asset_type),
        TransactionKind::Bonus => {
            format!("Received {} {} bonus", request.amount, request.asset_type)
        }
        TransactionKind::Spend => format!("Revenue from user {} spend", request.user_id),
    }
}
