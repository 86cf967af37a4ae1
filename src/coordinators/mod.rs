// Coordinators layer - Workflow orchestration
//
// Each public operation opens one transaction, composes provider and store
// calls on it, commits, and maps failures to `ServiceError` at the boundary.

pub mod admin_coordinator;
pub mod bootstrap_coordinator;
pub mod dashboard_coordinator;
pub mod login_coordinator;
pub mod registration_coordinator;

pub use admin_coordinator::AdminCoordinator;
pub use bootstrap_coordinator::{BootstrapReport, ensure_bootstrapped};
pub use dashboard_coordinator::DashboardCoordinator;
pub use login_coordinator::LoginCoordinator;
pub use registration_coordinator::RegistrationCoordinator;

use crate::errors::{InternalError, ServiceError};

/// Failure inside an operation body, before the boundary mapping
pub(crate) enum StepError {
    /// Business-rule rejection, returned to the caller as is
    Rejected(ServiceError),
    Internal(InternalError),
}

impl StepError {
    pub(crate) fn into_service_error(self, failure_message: &str) -> ServiceError {
        match self {
            StepError::Rejected(err) => err,
            StepError::Internal(err) => ServiceError::from_internal(err, failure_message),
        }
    }
}

impl From<InternalError> for StepError {
    fn from(err: InternalError) -> Self {
        StepError::Internal(err)
    }
}

impl From<ServiceError> for StepError {
    fn from(err: ServiceError) -> Self {
        StepError::Rejected(err)
    }
}
