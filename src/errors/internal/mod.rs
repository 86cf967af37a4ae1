use thiserror::Error;

pub mod credential;
pub mod crypto;
pub mod database;
pub mod resource;

pub use credential::CredentialError;
pub use crypto::CryptoError;
pub use database::DatabaseError;
pub use resource::ResourceError;

/// Internal error type for store, provider and bootstrap operations
///
/// Infrastructure errors (database, parse, crypto) are shared; domain errors
/// (credential, resource) carry the detail coordinators need to pick a
/// caller-facing `ServiceError`. Never handed to callers directly.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn transaction_begin(source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::TransactionBegin { source })
    }

    pub fn transaction_commit(source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::TransactionCommit { source })
    }

    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> InternalError {
        InternalError::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    /// Infrastructure faults the caller cannot act on
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            InternalError::Database(_) | InternalError::Parse { .. } | InternalError::Crypto(_)
        )
    }
}
