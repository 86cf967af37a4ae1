use std::sync::{Arc, LazyLock};

use regex::Regex;
use sea_orm::ConnectionTrait;

use crate::errors::{InternalError, ServiceError};
use crate::providers::crypto_provider::PasswordHasher;
use crate::stores::UserStore;
use crate::types::db::user;
use crate::types::internal::{NewUser, RoleName};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern is valid")
});

/// Self-service registration form
#[derive(Debug, Clone, Default)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Outcome message for a newly created account of `role`
pub fn registration_message(role: RoleName) -> &'static str {
    if role.is_super_admin() {
        "Registration successful"
    } else {
        "Registration successful. Waiting for admin approval."
    }
}

/// Registration rules and account creation
pub struct UserProvider {
    store: Arc<UserStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserProvider {
    pub fn new(store: Arc<UserStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    /// Checks that need no store access. Runs before a transaction is opened.
    pub fn validate(&self, request: &RegistrationRequest) -> Result<(), ServiceError> {
        let required = [&request.username, &request.email, &request.password, &request.confirm_password];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(ServiceError::missing_fields());
        }
        if !is_valid_email(&request.email) {
            return Err(ServiceError::invalid_email());
        }
        if request.password != request.confirm_password {
            return Err(ServiceError::password_mismatch());
        }
        Ok(())
    }

    /// Hash the password and insert the account with `role`
    pub async fn create_user(
        &self,
        conn: &impl ConnectionTrait,
        request: RegistrationRequest,
        role: RoleName,
    ) -> Result<user::Model, InternalError> {
        let password_digest = self.hasher.hash(&request.password)?;
        self.store
            .create(
                conn,
                NewUser {
                    username: request.username,
                    email: request.email,
                    password_digest,
                    first_name: request.first_name,
                    last_name: request.last_name,
                    role,
                },
            )
            .await
    }
}
