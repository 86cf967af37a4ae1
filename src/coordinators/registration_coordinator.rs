use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::errors::{InternalError, ServiceError};
use crate::providers::user_provider::registration_message;
use crate::providers::{RegistrationRequest, UserProvider};
use crate::types::internal::RoleName;

const REGISTRATION_FAILED: &str = "Registration failed";

pub struct RegistrationCoordinator {
    db: DatabaseConnection,
    user_provider: Arc<UserProvider>,
    root_username: String,
}

impl RegistrationCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_provider: Arc::clone(&app_data.providers.user_provider),
            root_username: app_data.settings.root_username().to_string(),
        }
    }

    /// Self-service sign-up as a viewer. The account waits for approval.
    pub async fn register(&self, request: RegistrationRequest) -> Result<String, ServiceError> {
        self.register_as(request, RoleName::Viewer).await
    }

    /// Sign-up with an explicit role. Super-admin accounts only come from bootstrap.
    pub async fn register_as(&self, request: RegistrationRequest, role: RoleName) -> Result<String, ServiceError> {
        if role.is_super_admin() {
            return Err(ServiceError::reserved_role());
        }
        self.user_provider.validate(&request)?;
        // Reserved for the bootstrap account even when no account holds it
        if request.username == self.root_username {
            return Err(ServiceError::username_taken());
        }

        let username = request.username.clone();
        let user = self
            .create(request, role)
            .await
            .map_err(|e| ServiceError::from_internal(e, REGISTRATION_FAILED))?;

        tracing::info!(user_id = user.id, username = %username, role = %role, "User registered");

        Ok(registration_message(role).to_string())
    }

    async fn create(
        &self,
        request: RegistrationRequest,
        role: RoleName,
    ) -> Result<crate::types::db::user::Model, InternalError> {
        let txn = begin_transaction(&self.db).await?;
        let user = self.user_provider.create_user(&txn, request, role).await?;
        commit_transaction(txn).await?;
        Ok(user)
    }
}
