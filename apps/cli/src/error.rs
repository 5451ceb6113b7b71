//! # API Error Type
//!
//! Unified error type for command functions.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Fiado POS                              │
//! │                                                                         │
//! │  Terminal                    Rust Backend                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  fiado clientes pagar c1 abc                                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Database Error? ─── DbError::QueryFailed("...") ──┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Validation Error? ─── CoreError::Validation ──── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Destructive? ─── not confirmed ── CONFIRMATION_REQUIRED ──────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Erro: amount has invalid format: not a number                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Insight failures never show up here: `fiado-ai` absorbs them.

use serde::Serialize;
use thiserror::Error;

use fiado_core::{CoreError, ValidationError};
use fiado_db::DbError;

/// Error returned from command functions.
///
/// ## Serialization
/// This is what `--json` prints when a command fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Cliente não encontrado: c9"
/// }
/// ```
#[derive(Debug, Clone, Error, Serialize)]
#[error("[{code:?}] {message}")]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product or customer not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Wrong PIN, or no open session
    Unauthorized,

    /// Destructive action not yet confirmed
    ConfirmationRequired,

    /// File or terminal I/O failed
    Io,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} não encontrado: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    /// Asks the caller to repeat the action with confirmation.
    ///
    /// `question` is shown to the operator as-is.
    pub fn confirmation_required(question: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ConfirmationRequired, question)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn is_confirmation_required(&self) -> bool {
        self.code == ErrorCode::ConfirmationRequired
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::CorruptDocument { key, reason } => {
                tracing::error!(key = %key, reason = %reason, "Stored document is unreadable");
                ApiError::new(
                    ErrorCode::DatabaseError,
                    format!("Dados salvos ilegíveis ({}); nada foi alterado", key),
                )
            }
            DbError::Serialization(e) => {
                tracing::error!("Serialization failed: {}", e);
                ApiError::internal("Falha ao preparar os dados para salvar")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Falha ao abrir o banco de dados")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Falha ao atualizar o banco de dados")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Falha ao salvar os dados")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Falha ao salvar os dados")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Banco de dados ocupado")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Falha ao salvar os dados")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Produto", &id),
            CoreError::CustomerNotFound(id) => ApiError::not_found("Cliente", &id),
            CoreError::AmountOverflow(what) => {
                tracing::warn!(total = %what, "Amount overflow");
                ApiError::validation("Valor grande demais; nada foi alterado")
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::new(ErrorCode::Io, err.to_string())
    }
}

impl From<inquire::InquireError> for ApiError {
    fn from(err: inquire::InquireError) -> Self {
        match err {
            inquire::InquireError::NotTTY => ApiError::new(
                ErrorCode::Io,
                "Sem terminal interativo; use --pin e --yes",
            ),
            inquire::InquireError::IO(e) => e.into(),
            other => ApiError::internal(other.to_string()),
        }
    }
}
