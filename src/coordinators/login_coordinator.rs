use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::errors::{InternalError, ServiceError};
use crate::providers::{AuthenticationProvider, LoginRequest};
use crate::types::internal::UserRecord;

pub struct LoginCoordinator {
    db: DatabaseConnection,
    authentication_provider: Arc<AuthenticationProvider>,
}

impl LoginCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            authentication_provider: Arc::clone(&app_data.providers.authentication_provider),
        }
    }

    /// Sign in with username or email.
    ///
    /// Every failure, including store faults, is `ServiceError::Auth`. The
    /// internal reason only reaches the debug log.
    pub async fn authenticate(&self, identifier: &str, password: &str) -> Result<UserRecord, ServiceError> {
        let request = LoginRequest {
            identifier: identifier.to_string(),
            password: password.to_string(),
        };

        match self.try_authenticate(&request).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, username = %user.username, "Login successful");
                Ok(user)
            }
            Err(InternalError::Credential(reason)) => {
                tracing::debug!(identifier, reason = %reason, "Login rejected");
                Err(ServiceError::Auth)
            }
            Err(err) => {
                tracing::error!(identifier, error = %err, "Login failed on store error");
                Err(ServiceError::Auth)
            }
        }
    }

    async fn try_authenticate(&self, request: &LoginRequest) -> Result<UserRecord, InternalError> {
        let txn = begin_transaction(&self.db).await?;
        let user = self
            .authentication_provider
            .authenticate(&txn, request, chrono::Utc::now().timestamp())
            .await?;
        commit_transaction(txn).await?;
        UserRecord::try_from(user)
    }
}
