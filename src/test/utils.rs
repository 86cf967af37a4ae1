// Test utilities shared by the unit tests
// Only compiled when running tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::app_data::AppData;
use crate::config::{AccessSettings, MockEnvironment};
use crate::stores::{EmployeeStore, RoleStore, TabStore, UserStore};
use crate::types::db::{employee, user};
use crate::types::internal::{DashboardTab, NewEmployee, NewUser, RoleName};

/// In-memory database with the schema applied and nothing seeded
pub async fn setup_empty_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// In-memory database with roles and all dashboard tabs seeded (tab ids 1..=5)
pub async fn setup_test_db() -> DatabaseConnection {
    let db = setup_empty_db().await;

    RoleStore::new()
        .ensure_roles(&db)
        .await
        .expect("Failed to seed roles");
    TabStore::new()
        .ensure_tabs(&db, &DashboardTab::ALL)
        .await
        .expect("Failed to seed tabs");

    db
}

/// Pending viewer `<username>` with email `<username>@x.com`
pub async fn seed_viewer(db: &DatabaseConnection, username: &str) -> user::Model {
    UserStore::new()
        .create(
            db,
            NewUser {
                username: username.to_string(),
                email: format!("{}@x.com", username),
                password_digest: "digest".to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                role: RoleName::Viewer,
            },
        )
        .await
        .expect("Failed to seed viewer")
}

pub fn new_employee(email: &str, is_shared: bool) -> NewEmployee {
    NewEmployee {
        name: "Test Employee".to_string(),
        email: email.to_string(),
        department: "Sales".to_string(),
        position: "Analyst".to_string(),
        salary: 50_000.0,
        joining_date: None,
        is_shared,
    }
}

pub async fn seed_employee(db: &DatabaseConnection, email: &str, is_shared: bool) -> employee::Model {
    EmployeeStore::new()
        .create(db, new_employee(email, is_shared), 0)
        .await
        .expect("Failed to seed employee")
}

/// AppData over an empty migrated database. Root password "root-pass", SHA-256 hashing.
pub async fn test_app_data() -> Arc<AppData> {
    test_app_data_with(&[("ROOT_PASSWORD", "root-pass"), ("PASSWORD_SCHEME", "sha256")]).await
}

pub async fn test_app_data_with(vars: &[(&str, &str)]) -> Arc<AppData> {
    let env = MockEnvironment::empty().with_vars(vars);
    let settings = AccessSettings::from_env_provider(&env).expect("Failed to build test settings");
    Arc::new(AppData::init(setup_empty_db().await, settings))
}
