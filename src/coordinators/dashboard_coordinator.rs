use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::coordinators::StepError;
use crate::errors::{InternalError, ServiceError};
use crate::providers::AuthorizationProvider;
use crate::stores::{EmployeeGrants, EmployeeStore, GrantSet, MetricStore, TabGrants, TabStore};
use crate::types::db::tab;
use crate::types::internal::{EmployeeRecord, NewEmployee, NewTabMetric, Permission, TabMetric};

/// Read paths of the dashboard: tab data, employees and permission checks
pub struct DashboardCoordinator {
    db: DatabaseConnection,
    tab_store: Arc<TabStore>,
    employee_store: Arc<EmployeeStore>,
    metric_store: Arc<MetricStore>,
    tab_grants: Arc<TabGrants>,
    employee_grants: Arc<EmployeeGrants>,
    authorization_provider: Arc<AuthorizationProvider>,
}

impl DashboardCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            tab_store: Arc::clone(&app_data.stores.tabs),
            employee_store: Arc::clone(&app_data.stores.employees),
            metric_store: Arc::clone(&app_data.stores.metrics),
            tab_grants: Arc::clone(&app_data.stores.tab_grants),
            employee_grants: Arc::clone(&app_data.stores.employee_grants),
            authorization_provider: Arc::clone(&app_data.providers.authorization_provider),
        }
    }

    /// False on any failure, including an unknown username
    pub async fn has_permission(&self, username: &str, permission: Permission) -> bool {
        self.check_permission(username, permission).await.unwrap_or_else(|err| {
            tracing::debug!(username, %permission, error = %err, "Permission check failed");
            false
        })
    }

    async fn check_permission(&self, username: &str, permission: Permission) -> Result<bool, InternalError> {
        let txn = begin_transaction(&self.db).await?;
        let user = self.authorization_provider.load_user(&txn, username).await?;
        let allowed = self.authorization_provider.has_permission(&txn, &user, permission).await?;
        commit_transaction(txn).await?;
        Ok(allowed)
    }

    pub async fn can_access_tab(&self, username: &str, tab_name: &str) -> bool {
        self.check_tab_access(username, tab_name).await.unwrap_or_else(|err| {
            tracing::debug!(username, tab_name, error = %err, "Tab access check failed");
            false
        })
    }

    async fn check_tab_access(&self, username: &str, tab_name: &str) -> Result<bool, InternalError> {
        let txn = begin_transaction(&self.db).await?;
        let user = self.authorization_provider.load_user(&txn, username).await?;
        let tab = self.tab_store.get_by_name(&txn, tab_name).await?;
        let allowed = self.authorization_provider.can_access_tab(&txn, &user, &tab).await?;
        commit_transaction(txn).await?;
        Ok(allowed)
    }

    pub async fn can_access_employee(&self, username: &str, employee_id: i32) -> bool {
        self.check_employee_access(username, employee_id)
            .await
            .unwrap_or_else(|err| {
                tracing::debug!(username, employee_id, error = %err, "Employee access check failed");
                false
            })
    }

    async fn check_employee_access(&self, username: &str, employee_id: i32) -> Result<bool, InternalError> {
        let txn = begin_transaction(&self.db).await?;
        let user = self.authorization_provider.load_user(&txn, username).await?;
        let allowed = self
            .authorization_provider
            .can_access_employee(&txn, &user, employee_id)
            .await?;
        commit_transaction(txn).await?;
        Ok(allowed)
    }

    /// Stored metric records for a tab, newest first. Denied unless the user can open the tab.
    pub async fn get_tab_data(&self, username: &str, tab_name: &str) -> Result<Vec<TabMetric>, ServiceError> {
        self.get_tab_data_impl(username, tab_name)
            .await
            .map_err(|e| e.into_service_error("Failed to load tab data"))
    }

    async fn get_tab_data_impl(&self, username: &str, tab_name: &str) -> Result<Vec<TabMetric>, StepError> {
        let txn = begin_transaction(&self.db).await?;
        let user = self.authorization_provider.load_user(&txn, username).await?;
        let tab = self.tab_store.get_by_name(&txn, tab_name).await?;

        if !self.authorization_provider.can_access_tab(&txn, &user, &tab).await? {
            return Err(ServiceError::tab_access_denied().into());
        }

        let records = self.metric_store.records_for_tab(&txn, tab.id).await?;
        commit_transaction(txn).await?;
        Ok(records.into_iter().map(TabMetric::from).collect())
    }

    /// Tabs the user can open, in tab id order. The super-admin sees all of them.
    pub async fn accessible_tabs(&self, username: &str) -> Result<Vec<tab::Model>, ServiceError> {
        self.accessible_tabs_impl(username)
            .await
            .map_err(|e| e.into_service_error("Failed to load tabs"))
    }

    async fn accessible_tabs_impl(&self, username: &str) -> Result<Vec<tab::Model>, StepError> {
        let txn = begin_transaction(&self.db).await?;
        let user = self.authorization_provider.load_user(&txn, username).await?;

        let tabs = if user.role.is_super_admin() {
            self.tab_store.list(&txn).await?
        } else {
            let granted = self.tab_grants.members(&txn, user.id).await?;
            self.tab_store.find_by_ids(&txn, granted).await?
        };

        commit_transaction(txn).await?;
        Ok(tabs)
    }

    /// Store a data point for a tab. Used by the external data generator.
    pub async fn record_metric(&self, metric: NewTabMetric) -> Result<TabMetric, ServiceError> {
        self.record_metric_impl(metric)
            .await
            .map_err(|e| e.into_service_error("Failed to record metric"))
    }

    async fn record_metric_impl(&self, metric: NewTabMetric) -> Result<TabMetric, StepError> {
        let txn = begin_transaction(&self.db).await?;
        let tab = self.tab_store.get_by_name(&txn, &metric.tab_name).await?;
        let stored = self.metric_store.record(&txn, tab.id, metric).await?;
        commit_transaction(txn).await?;
        Ok(stored.into())
    }

    /// Add an employee record. Requires CREATE.
    pub async fn create_employee(
        &self,
        creator_username: &str,
        employee: NewEmployee,
    ) -> Result<EmployeeRecord, ServiceError> {
        self.create_employee_impl(creator_username, employee)
            .await
            .map_err(|e| e.into_service_error("Failed to create employee"))
    }

    async fn create_employee_impl(
        &self,
        creator_username: &str,
        employee: NewEmployee,
    ) -> Result<EmployeeRecord, StepError> {
        let txn = begin_transaction(&self.db).await?;
        self.authorization_provider
            .require(&txn, creator_username, Permission::Create)
            .await?
            .ok_or_else(|| StepError::Rejected(ServiceError::permission_denied("create employee records")))?;

        let created = self
            .employee_store
            .create(&txn, employee, chrono::Utc::now().timestamp())
            .await?;
        commit_transaction(txn).await?;

        tracing::info!(employee_id = created.id, created_by = creator_username, "Employee created");
        Ok(created.into())
    }

    /// Employees the user may see: shared ones plus their grants, or all for the super-admin
    pub async fn accessible_employees(&self, username: &str) -> Result<Vec<EmployeeRecord>, ServiceError> {
        self.accessible_employees_impl(username)
            .await
            .map_err(|e| e.into_service_error("Failed to load employees"))
    }

    async fn accessible_employees_impl(&self, username: &str) -> Result<Vec<EmployeeRecord>, StepError> {
        let txn = begin_transaction(&self.db).await?;
        let user = self.authorization_provider.load_user(&txn, username).await?;

        let employees = if user.role.is_super_admin() {
            self.employee_store.list_all(&txn).await?
        } else {
            let granted = self.employee_grants.members(&txn, user.id).await?;
            self.employee_store.list_visible(&txn, &granted).await?
        };

        commit_transaction(txn).await?;
        Ok(employees.into_iter().map(EmployeeRecord::from).collect())
    }
}
