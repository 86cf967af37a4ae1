use std::collections::BTreeSet;
use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::errors::InternalError;
use crate::stores::{EmployeeGrants, EmployeeStore, GrantSet, RoleStore, TabGrants, UserStore};
use crate::types::db::tab;
use crate::types::internal::{Permission, RoleName, UserRecord};

/// Read-only access decisions: role permissions plus per-user grants
pub struct AuthorizationProvider {
    user_store: Arc<UserStore>,
    role_store: Arc<RoleStore>,
    employee_store: Arc<EmployeeStore>,
    tab_grants: Arc<TabGrants>,
    employee_grants: Arc<EmployeeGrants>,
}

impl AuthorizationProvider {
    pub fn new(
        user_store: Arc<UserStore>,
        role_store: Arc<RoleStore>,
        employee_store: Arc<EmployeeStore>,
        tab_grants: Arc<TabGrants>,
        employee_grants: Arc<EmployeeGrants>,
    ) -> Self {
        Self {
            user_store,
            role_store,
            employee_store,
            tab_grants,
            employee_grants,
        }
    }

    /// Resolve the acting user by username
    pub async fn load_user(&self, conn: &impl ConnectionTrait, username: &str) -> Result<UserRecord, InternalError> {
        self.user_store.get_by_username(conn, username).await?.try_into()
    }

    /// Resolve `username` and check `permission`. `None` means the user exists but lacks it.
    pub async fn require(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
        permission: Permission,
    ) -> Result<Option<UserRecord>, InternalError> {
        let user = self.load_user(conn, username).await?;
        if self.has_permission(conn, &user, permission).await? {
            Ok(Some(user))
        } else {
            tracing::debug!(username, %permission, "Permission denied");
            Ok(None)
        }
    }

    /// The super-admin always holds every permission, whatever the matrix says
    pub async fn permissions_for(
        &self,
        conn: &impl ConnectionTrait,
        role: RoleName,
    ) -> Result<BTreeSet<Permission>, InternalError> {
        if role.is_super_admin() {
            return Ok(Permission::ALL.into_iter().collect());
        }
        self.role_store.permissions_for(conn, role).await
    }

    pub async fn has_permission(
        &self,
        conn: &impl ConnectionTrait,
        user: &UserRecord,
        permission: Permission,
    ) -> Result<bool, InternalError> {
        if user.role.is_super_admin() {
            return Ok(true);
        }
        self.role_store.has_permission(conn, user.role, permission).await
    }

    pub async fn can_access_tab(
        &self,
        conn: &impl ConnectionTrait,
        user: &UserRecord,
        tab: &tab::Model,
    ) -> Result<bool, InternalError> {
        if user.role.is_super_admin() {
            return Ok(true);
        }
        self.tab_grants.contains(conn, user.id, tab.id).await
    }

    /// Shared employees are visible to everyone. A missing employee is never accessible.
    pub async fn can_access_employee(
        &self,
        conn: &impl ConnectionTrait,
        user: &UserRecord,
        employee_id: i32,
    ) -> Result<bool, InternalError> {
        let Some(employee) = self.employee_store.find_by_id(conn, employee_id).await? else {
            return Ok(false);
        };
        if employee.is_shared || user.role.is_super_admin() {
            return Ok(true);
        }
        self.employee_grants.contains(conn, user.id, employee_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{new_employee, seed_viewer, setup_test_db};

    fn provider() -> AuthorizationProvider {
        AuthorizationProvider::new(
            Arc::new(UserStore::new()),
            Arc::new(RoleStore::new()),
            Arc::new(EmployeeStore::new()),
            Arc::new(TabGrants::new()),
            Arc::new(EmployeeGrants::new()),
        )
    }

    fn as_role(mut user: UserRecord, role: RoleName) -> UserRecord {
        user.role = role;
        user
    }

    #[tokio::test]
    async fn test_super_admin_has_all_permissions_without_rows() {
        let db = setup_test_db().await;
        let provider = provider();
        let user = seed_viewer(&db, "boss").await;
        let boss = as_role(UserRecord::try_from(user).unwrap(), RoleName::SuperAdmin);

        for permission in Permission::ALL {
            assert!(provider.has_permission(&db, &boss, permission).await.unwrap());
        }
        assert_eq!(
            provider.permissions_for(&db, RoleName::SuperAdmin).await.unwrap().len(),
            Permission::ALL.len()
        );
    }

    #[tokio::test]
    async fn test_viewer_permissions_follow_matrix() {
        let db = setup_test_db().await;
        let provider = provider();
        let viewer = UserRecord::try_from(seed_viewer(&db, "alice").await).unwrap();

        assert!(!provider.has_permission(&db, &viewer, Permission::Read).await.unwrap());

        RoleStore::new()
            .grant_permission(&db, RoleName::Viewer, Permission::Read)
            .await
            .unwrap();
        assert!(provider.has_permission(&db, &viewer, Permission::Read).await.unwrap());
        assert!(!provider.has_permission(&db, &viewer, Permission::Delete).await.unwrap());
    }

    #[tokio::test]
    async fn test_require_resolves_user() {
        let db = setup_test_db().await;
        let provider = provider();
        seed_viewer(&db, "alice").await;

        assert!(provider.require(&db, "alice", Permission::Update).await.unwrap().is_none());

        RoleStore::new()
            .grant_permission(&db, RoleName::Viewer, Permission::Update)
            .await
            .unwrap();
        let user = provider.require(&db, "alice", Permission::Update).await.unwrap();
        assert_eq!(user.map(|u| u.username), Some("alice".to_string()));

        let err = provider.require(&db, "nobody", Permission::Read).await.unwrap_err();
        assert!(matches!(
            err,
            InternalError::Credential(crate::errors::internal::CredentialError::UsernameNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_can_access_tab_through_grant() {
        let db = setup_test_db().await;
        let provider = provider();
        let viewer = UserRecord::try_from(seed_viewer(&db, "alice").await).unwrap();
        let sales = crate::stores::TabStore::new().get_by_name(&db, "sales").await.unwrap();

        assert!(!provider.can_access_tab(&db, &viewer, &sales).await.unwrap());
        TabGrants::new().add(&db, viewer.id, sales.id).await.unwrap();
        assert!(provider.can_access_tab(&db, &viewer, &sales).await.unwrap());

        let boss = as_role(viewer, RoleName::SuperAdmin);
        let overview = crate::stores::TabStore::new().get_by_name(&db, "overview").await.unwrap();
        assert!(provider.can_access_tab(&db, &boss, &overview).await.unwrap());
    }

    #[tokio::test]
    async fn test_shared_employee_visible_without_grant() {
        let db = setup_test_db().await;
        let provider = provider();
        let viewer = UserRecord::try_from(seed_viewer(&db, "alice").await).unwrap();
        let store = EmployeeStore::new();
        let shared = store.create(&db, new_employee("s@x.com", true), 0).await.unwrap();
        let private = store.create(&db, new_employee("p@x.com", false), 0).await.unwrap();

        assert!(provider.can_access_employee(&db, &viewer, shared.id).await.unwrap());
        assert!(!provider.can_access_employee(&db, &viewer, private.id).await.unwrap());
        assert!(!provider.can_access_employee(&db, &viewer, 999).await.unwrap());

        EmployeeGrants::new().add(&db, viewer.id, private.id).await.unwrap();
        assert!(provider.can_access_employee(&db, &viewer, private.id).await.unwrap());
    }
}
