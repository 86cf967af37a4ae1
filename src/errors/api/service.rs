use thiserror::Error;

use crate::errors::internal::{CredentialError, InternalError, ResourceError};

/// Failure half of every public operation
///
/// `Display` is the human-readable message shown to the user. `Auth` is
/// deliberately generic: unknown identifier, wrong password and pending
/// approval all read the same.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Malformed input rejected before the store is touched
    #[error("{0}")]
    Validation(String),

    /// Username or email already registered
    #[error("{0}")]
    Conflict(String),

    #[error("Invalid credentials or account not approved")]
    Auth,

    /// Caller lacks the permission or grant for the action
    #[error("{0}")]
    Permission(String),

    #[error("{0}")]
    NotFound(String),

    /// Store failure; the transaction was rolled back
    #[error("{0}")]
    Persistence(String),
}

impl ServiceError {
    pub fn missing_fields() -> Self {
        ServiceError::Validation("Please fill in all fields".to_string())
    }

    pub fn invalid_email() -> Self {
        ServiceError::Validation("Invalid email format".to_string())
    }

    pub fn password_mismatch() -> Self {
        ServiceError::Validation("Passwords do not match".to_string())
    }

    pub fn reserved_role() -> Self {
        ServiceError::Validation("Super admin accounts can only be created at bootstrap".to_string())
    }

    pub fn username_taken() -> Self {
        ServiceError::Conflict("Username already exists".to_string())
    }

    pub fn email_taken() -> Self {
        ServiceError::Conflict("Email already exists".to_string())
    }

    /// `action` completes "No permission to ..."
    pub fn permission_denied(action: &str) -> Self {
        ServiceError::Permission(format!("No permission to {}", action))
    }

    pub fn tab_access_denied() -> Self {
        ServiceError::Permission("No access to this tab".to_string())
    }

    pub fn user_not_found() -> Self {
        ServiceError::NotFound("User not found".to_string())
    }

    pub fn tab_not_found() -> Self {
        ServiceError::NotFound("Tab not found".to_string())
    }

    pub fn employee_not_found() -> Self {
        ServiceError::NotFound("Employee not found".to_string())
    }

    /// Short machine-readable name of the error class
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::Auth => "auth",
            ServiceError::Permission(_) => "permission",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Persistence(_) => "persistence",
        }
    }

    /// Map an internal error at the operation boundary
    ///
    /// Domain errors become their matching class. Infrastructure faults are
    /// logged with full detail and surface only as `failure_message`.
    pub fn from_internal(err: InternalError, failure_message: &str) -> Self {
        match err {
            InternalError::Credential(credential) => match credential {
                CredentialError::DuplicateUsername { .. } => Self::username_taken(),
                CredentialError::DuplicateEmail { .. } => Self::email_taken(),
                CredentialError::UsernameNotFound { .. } | CredentialError::UserIdNotFound { .. } => {
                    Self::user_not_found()
                }
                CredentialError::UnknownIdentifier { .. } | CredentialError::IncorrectPassword { .. } => {
                    ServiceError::Auth
                }
            },
            InternalError::Resource(resource) => match resource {
                ResourceError::TabNotFound { .. } => Self::tab_not_found(),
                ResourceError::EmployeeNotFound { .. } => Self::employee_not_found(),
                ResourceError::DuplicateEmployeeEmail { .. } => {
                    ServiceError::Conflict("Employee email already exists".to_string())
                }
            },
            other => {
                tracing::error!(error = %other, "{}", failure_message);
                ServiceError::Persistence(failure_message.to_string())
            }
        }
    }
}
