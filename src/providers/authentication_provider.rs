use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::crypto_provider::PasswordHasher;
use crate::stores::{LookupScope, UserStore};
use crate::types::db::user;
use crate::types::internal::RoleName;

pub struct LoginRequest {
    /// Username or email
    pub identifier: String,
    pub password: String,
}

/// Checks credentials against the identity store and stamps `last_login`
pub struct AuthenticationProvider {
    store: Arc<UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    root_username: String,
}

impl AuthenticationProvider {
    pub fn new(store: Arc<UserStore>, hasher: Arc<dyn PasswordHasher>, root_username: impl Into<String>) -> Self {
        Self {
            store,
            hasher,
            root_username: root_username.into(),
        }
    }

    /// Find the sign-in candidate for `identifier`.
    ///
    /// The reserved root username is looked up by username alone and skips
    /// the approval gate, but only while it belongs to a super-admin.
    /// Everyone else must be active and approved.
    async fn find_candidate(
        &self,
        conn: &impl ConnectionTrait,
        identifier: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        if identifier == self.root_username {
            let root = self
                .store
                .find_by_username(conn, identifier)
                .await?
                .filter(|candidate| candidate.role_name == RoleName::SuperAdmin.as_str());
            if root.is_some() {
                return Ok(root);
            }
        }
        self.store
            .find_by_username_or_email(conn, identifier, LookupScope::SignInEligible)
            .await
    }

    /// Verify the credential pair. Unknown identifiers and wrong passwords
    /// come back as distinct `CredentialError`s for logging; callers must
    /// not tell them apart.
    pub async fn verify_credential(
        &self,
        conn: &impl ConnectionTrait,
        request: &LoginRequest,
    ) -> Result<user::Model, InternalError> {
        let Some(candidate) = self.find_candidate(conn, &request.identifier).await? else {
            return Err(CredentialError::UnknownIdentifier {
                identifier: request.identifier.clone(),
            }
            .into());
        };

        if !self.hasher.verify(&request.password, &candidate.password_digest)? {
            return Err(CredentialError::IncorrectPassword {
                username: candidate.username,
            }
            .into());
        }

        Ok(candidate)
    }

    /// Verify and, on success, persist `last_login = now`
    pub async fn authenticate(
        &self,
        conn: &impl ConnectionTrait,
        request: &LoginRequest,
        now: i64,
    ) -> Result<user::Model, InternalError> {
        let candidate = self.verify_credential(conn, request).await?;
        let user = self.store.record_login(conn, candidate, now).await?;

        tracing::debug!(user_id = user.id, username = %user.username, "Credential verified");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::crypto_provider::Sha256Hasher;
    use crate::stores::UserStore;
    use crate::test::utils::setup_test_db;
    use crate::types::internal::NewUser;
    use sea_orm::ActiveModelTrait;
    use sea_orm::ActiveValue::Set;

    async fn provider_with_user(
        db: &sea_orm::DatabaseConnection,
        username: &str,
        role: RoleName,
    ) -> (AuthenticationProvider, user::Model) {
        let store = Arc::new(UserStore::new());
        let hasher: Arc<dyn PasswordHasher> = Arc::new(Sha256Hasher);
        let user = store
            .create(
                db,
                NewUser {
                    username: username.to_string(),
                    email: format!("{}@x.com", username),
                    password_digest: hasher.hash("pw123").unwrap(),
                    first_name: String::new(),
                    last_name: String::new(),
                    role,
                },
            )
            .await
            .unwrap();
        (AuthenticationProvider::new(store, hasher, "root"), user)
    }

    fn login(identifier: &str, password: &str) -> LoginRequest {
        LoginRequest {
            identifier: identifier.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_unapproved_user_is_unknown_identifier() {
        let db = setup_test_db().await;
        let (provider, _) = provider_with_user(&db, "alice", RoleName::Viewer).await;

        let err = provider.authenticate(&db, &login("alice", "pw123"), 10).await.unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::UnknownIdentifier { .. })));
    }

    #[tokio::test]
    async fn test_approved_user_by_email_records_login() {
        let db = setup_test_db().await;
        let (provider, user) = provider_with_user(&db, "alice", RoleName::Viewer).await;
        UserStore::new().set_approved(&db, user).await.unwrap();

        let signed_in = provider.authenticate(&db, &login("alice@x.com", "pw123"), 1234).await.unwrap();
        assert_eq!(signed_in.last_login, Some(1234));

        let err = provider.authenticate(&db, &login("alice", "wrong"), 1300).await.unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::IncorrectPassword { .. })));
    }

    #[tokio::test]
    async fn test_root_bypasses_approval_gate() {
        let db = setup_test_db().await;
        let (provider, root) = provider_with_user(&db, "root", RoleName::SuperAdmin).await;
        let mut row: user::ActiveModel = root.into();
        row.is_approved = Set(false);
        row.update(&db).await.unwrap();

        let signed_in = provider.authenticate(&db, &login("root", "pw123"), 99).await.unwrap();
        assert!(!signed_in.is_approved);
        assert_eq!(signed_in.last_login, Some(99));

        // The bypass is by username only
        let err = provider.authenticate(&db, &login("root@x.com", "pw123"), 100).await.unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::UnknownIdentifier { .. })));
    }

    #[tokio::test]
    async fn test_reserved_username_without_super_admin_role_needs_approval() {
        let db = setup_test_db().await;
        let (provider, squatter) = provider_with_user(&db, "root", RoleName::Viewer).await;

        let err = provider.authenticate(&db, &login("root", "pw123"), 10).await.unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::UnknownIdentifier { .. })));

        // Once approved it signs in through the normal path
        UserStore::new().set_approved(&db, squatter).await.unwrap();
        let signed_in = provider.authenticate(&db, &login("root", "pw123"), 11).await.unwrap();
        assert_eq!(signed_in.role_name, "viewer");
    }
}
