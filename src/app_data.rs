use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AccessSettings;
use crate::providers::crypto_provider::hasher_for;
use crate::providers::{AuthenticationProvider, AuthorizationProvider, PasswordHasher, UserProvider};
use crate::stores::{EmployeeGrants, EmployeeStore, MetricStore, RoleStore, TabGrants, TabStore, UserStore};

/// Stores shared by every coordinator
pub struct Stores {
    pub users: Arc<UserStore>,
    pub roles: Arc<RoleStore>,
    pub tabs: Arc<TabStore>,
    pub employees: Arc<EmployeeStore>,
    pub metrics: Arc<MetricStore>,
    pub tab_grants: Arc<TabGrants>,
    pub employee_grants: Arc<EmployeeGrants>,
}

pub struct Providers {
    pub authentication_provider: Arc<AuthenticationProvider>,
    pub authorization_provider: Arc<AuthorizationProvider>,
    pub user_provider: Arc<UserProvider>,
}

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(db, settings)
///   ↓ creates once
///   ├─ hasher (Arc<dyn PasswordHasher>, picked by PASSWORD_SCHEME)
///   ├─ stores (users, roles, tabs, employees, metrics, grant sets)
///   └─ providers (authentication, authorization, user)
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to coordinators
///   ├─ LoginCoordinator::new(app_data)
///   ├─ RegistrationCoordinator::new(app_data)
///   ├─ AdminCoordinator::new(app_data)
///   └─ DashboardCoordinator::new(app_data)
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: Arc<AccessSettings>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub stores: Stores,
    pub providers: Providers,
}

impl AppData {
    /// Database should be connected and migrated before calling this
    pub fn init(db: DatabaseConnection, settings: AccessSettings) -> Self {
        tracing::info!("Initializing AppData...");

        let hasher: Arc<dyn PasswordHasher> = Arc::from(hasher_for(&settings));
        tracing::debug!(scheme = ?settings.password_scheme(), "Password hasher selected");

        let stores = Stores {
            users: Arc::new(UserStore::new()),
            roles: Arc::new(RoleStore::new()),
            tabs: Arc::new(TabStore::new()),
            employees: Arc::new(EmployeeStore::new()),
            metrics: Arc::new(MetricStore::new()),
            tab_grants: Arc::new(TabGrants::new()),
            employee_grants: Arc::new(EmployeeGrants::new()),
        };

        let providers = Providers {
            authentication_provider: Arc::new(AuthenticationProvider::new(
                stores.users.clone(),
                hasher.clone(),
                settings.root_username(),
            )),
            authorization_provider: Arc::new(AuthorizationProvider::new(
                stores.users.clone(),
                stores.roles.clone(),
                stores.employees.clone(),
                stores.tab_grants.clone(),
                stores.employee_grants.clone(),
            )),
            user_provider: Arc::new(UserProvider::new(stores.users.clone(), hasher.clone())),
        };

        tracing::info!("AppData initialization complete");

        Self {
            db,
            settings: Arc::new(settings),
            hasher,
            stores,
            providers,
        }
    }
}
