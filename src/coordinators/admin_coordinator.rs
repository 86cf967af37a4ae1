use std::collections::BTreeSet;
use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::AppData;
use crate::config::AccessSettings;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::coordinators::StepError;
use crate::errors::ServiceError;
use crate::providers::AuthorizationProvider;
use crate::stores::{EmployeeGrants, EmployeeStore, GrantSet, TabGrants, TabStore, UserStore};
use crate::types::internal::{EmployeeRecord, Permission, RoleName, UserRecord};

/// Approval workflow and grant management for administrators
///
/// Every mutating operation requires the caller to hold UPDATE.
pub struct AdminCoordinator {
    db: DatabaseConnection,
    settings: Arc<AccessSettings>,
    user_store: Arc<UserStore>,
    tab_store: Arc<TabStore>,
    employee_store: Arc<EmployeeStore>,
    tab_grants: Arc<TabGrants>,
    employee_grants: Arc<EmployeeGrants>,
    authorization_provider: Arc<AuthorizationProvider>,
}

impl AdminCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            settings: Arc::clone(&app_data.settings),
            user_store: Arc::clone(&app_data.stores.users),
            tab_store: Arc::clone(&app_data.stores.tabs),
            employee_store: Arc::clone(&app_data.stores.employees),
            tab_grants: Arc::clone(&app_data.stores.tab_grants),
            employee_grants: Arc::clone(&app_data.stores.employee_grants),
            authorization_provider: Arc::clone(&app_data.providers.authorization_provider),
        }
    }

    async fn require_update(
        &self,
        conn: &impl ConnectionTrait,
        admin_username: &str,
        action: &str,
    ) -> Result<UserRecord, StepError> {
        self.authorization_provider
            .require(conn, admin_username, Permission::Update)
            .await?
            .ok_or_else(|| StepError::Rejected(ServiceError::permission_denied(action)))
    }

    /// Open the approval gate for `user_id`.
    ///
    /// The first approval also grants the configured default tabs.
    /// Approving an already approved user changes nothing.
    pub async fn approve(&self, admin_username: &str, user_id: i32) -> Result<String, ServiceError> {
        self.approve_impl(admin_username, user_id)
            .await
            .map_err(|e| e.into_service_error("Failed to approve user"))
    }

    async fn approve_impl(&self, admin_username: &str, user_id: i32) -> Result<String, StepError> {
        let txn = begin_transaction(&self.db).await?;
        let admin = self.require_update(&txn, admin_username, "approve users").await?;
        let target = self.user_store.get_by_id(&txn, user_id).await?;
        let username = target.username.clone();

        if target.is_approved && target.is_active {
            tracing::debug!(user_id, "User already approved");
        } else {
            let first_approval = !target.is_approved;
            let approved = self.user_store.set_approved(&txn, target).await?;

            if first_approval {
                let default_tabs = self.tab_store.find_by_names(&txn, self.settings.default_tabs()).await?;
                for tab in default_tabs {
                    self.tab_grants.add(&txn, approved.id, tab.id).await?;
                }
            }
            tracing::info!(user_id, username = %username, approved_by = %admin.username, "User approved");
        }

        commit_transaction(txn).await?;
        Ok(format!("User {} has been approved", username))
    }

    /// Replace the user's tab grants with exactly the named tabs. Unknown names are ignored.
    pub async fn manage_tabs(
        &self,
        admin_username: &str,
        user_id: i32,
        tab_names: &[String],
    ) -> Result<String, ServiceError> {
        self.manage_tabs_impl(admin_username, user_id, tab_names)
            .await
            .map_err(|e| e.into_service_error("Failed to update user tab access"))
    }

    async fn manage_tabs_impl(
        &self,
        admin_username: &str,
        user_id: i32,
        tab_names: &[String],
    ) -> Result<String, StepError> {
        let txn = begin_transaction(&self.db).await?;
        self.require_update(&txn, admin_username, "manage user tabs").await?;
        let target = self.user_store.get_by_id(&txn, user_id).await?;

        let tab_ids: BTreeSet<i32> = self
            .tab_store
            .find_by_names(&txn, tab_names)
            .await?
            .into_iter()
            .map(|tab| tab.id)
            .collect();
        self.tab_grants.replace_all(&txn, target.id, &tab_ids).await?;

        commit_transaction(txn).await?;
        tracing::info!(user_id, tabs = tab_ids.len(), "Tab grants replaced");
        Ok("User tab access updated successfully".to_string())
    }

    /// Grant a single tab. Returns false when the grant already existed.
    pub async fn grant_tab(&self, admin_username: &str, user_id: i32, tab_name: &str) -> Result<bool, ServiceError> {
        self.change_tab_impl(admin_username, user_id, tab_name, true)
            .await
            .map_err(|e| e.into_service_error("Failed to update user tab access"))
    }

    /// Revoke a single tab. Returns false when there was no grant.
    pub async fn revoke_tab(&self, admin_username: &str, user_id: i32, tab_name: &str) -> Result<bool, ServiceError> {
        self.change_tab_impl(admin_username, user_id, tab_name, false)
            .await
            .map_err(|e| e.into_service_error("Failed to update user tab access"))
    }

    async fn change_tab_impl(
        &self,
        admin_username: &str,
        user_id: i32,
        tab_name: &str,
        grant: bool,
    ) -> Result<bool, StepError> {
        let txn = begin_transaction(&self.db).await?;
        self.require_update(&txn, admin_username, "manage user tabs").await?;
        let target = self.user_store.get_by_id(&txn, user_id).await?;
        let tab = self.tab_store.get_by_name(&txn, tab_name).await?;

        let changed = if grant {
            self.tab_grants.add(&txn, target.id, tab.id).await?
        } else {
            self.tab_grants.remove(&txn, target.id, tab.id).await?
        };

        commit_transaction(txn).await?;
        Ok(changed)
    }

    /// Give `target_username` access to one employee record
    pub async fn share_employee(
        &self,
        admin_username: &str,
        employee_id: i32,
        target_username: &str,
    ) -> Result<bool, ServiceError> {
        self.change_employee_impl(admin_username, employee_id, target_username, true)
            .await
            .map_err(|e| e.into_service_error("Failed to share employee"))
    }

    pub async fn revoke_employee(
        &self,
        admin_username: &str,
        employee_id: i32,
        target_username: &str,
    ) -> Result<bool, ServiceError> {
        self.change_employee_impl(admin_username, employee_id, target_username, false)
            .await
            .map_err(|e| e.into_service_error("Failed to share employee"))
    }

    async fn change_employee_impl(
        &self,
        admin_username: &str,
        employee_id: i32,
        target_username: &str,
        grant: bool,
    ) -> Result<bool, StepError> {
        let txn = begin_transaction(&self.db).await?;
        self.require_update(&txn, admin_username, "share employee data").await?;
        let employee = self.employee_store.get_by_id(&txn, employee_id).await?;
        let target = self.user_store.get_by_username(&txn, target_username).await?;

        let changed = if grant {
            self.employee_grants.add(&txn, target.id, employee.id).await?
        } else {
            self.employee_grants.remove(&txn, target.id, employee.id).await?
        };

        commit_transaction(txn).await?;
        Ok(changed)
    }

    /// Replace the user's employee grants. Ids that name no employee are ignored.
    pub async fn manage_employees(
        &self,
        admin_username: &str,
        user_id: i32,
        employee_ids: &[i32],
    ) -> Result<String, ServiceError> {
        self.manage_employees_impl(admin_username, user_id, employee_ids)
            .await
            .map_err(|e| e.into_service_error("Failed to share employee"))
    }

    async fn manage_employees_impl(
        &self,
        admin_username: &str,
        user_id: i32,
        employee_ids: &[i32],
    ) -> Result<String, StepError> {
        let txn = begin_transaction(&self.db).await?;
        self.require_update(&txn, admin_username, "share employee data").await?;
        let target = self.user_store.get_by_id(&txn, user_id).await?;

        let requested: BTreeSet<i32> = employee_ids.iter().copied().collect();
        let existing = self.employee_store.existing_ids(&txn, &requested).await?;
        self.employee_grants.replace_all(&txn, target.id, &existing).await?;

        commit_transaction(txn).await?;
        Ok("User employee access updated successfully".to_string())
    }

    /// Flag an employee as visible to everyone, or take the flag away
    pub async fn set_employee_shared(
        &self,
        admin_username: &str,
        employee_id: i32,
        shared: bool,
    ) -> Result<EmployeeRecord, ServiceError> {
        self.set_employee_shared_impl(admin_username, employee_id, shared)
            .await
            .map_err(|e| e.into_service_error("Failed to update employee"))
    }

    async fn set_employee_shared_impl(
        &self,
        admin_username: &str,
        employee_id: i32,
        shared: bool,
    ) -> Result<EmployeeRecord, StepError> {
        let txn = begin_transaction(&self.db).await?;
        self.require_update(&txn, admin_username, "update employees").await?;
        let employee = self.employee_store.get_by_id(&txn, employee_id).await?;
        let updated = self.employee_store.set_shared(&txn, employee, shared).await?;
        commit_transaction(txn).await?;
        Ok(updated.into())
    }

    /// Accounts awaiting approval, oldest first
    pub async fn list_pending_users(&self) -> Result<Vec<UserRecord>, ServiceError> {
        self.list_users_impl(true)
            .await
            .map_err(|e| e.into_service_error("Failed to load users"))
    }

    /// Everyone except the super-admin, for the admin view's user picker
    pub async fn list_manageable_users(&self) -> Result<Vec<UserRecord>, ServiceError> {
        self.list_users_impl(false)
            .await
            .map_err(|e| e.into_service_error("Failed to load users"))
    }

    async fn list_users_impl(&self, pending_only: bool) -> Result<Vec<UserRecord>, StepError> {
        let txn = begin_transaction(&self.db).await?;
        let users = if pending_only {
            self.user_store.list_pending(&txn).await?
        } else {
            self.user_store.list_by_role_excluding(&txn, RoleName::SuperAdmin).await?
        };
        commit_transaction(txn).await?;

        Ok(users
            .into_iter()
            .map(UserRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }
}
