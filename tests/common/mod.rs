// Common test utilities for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tabwarden::AppData;
use tabwarden::config::{AccessSettings, EnvironmentProvider};
use tabwarden::coordinators::{
    AdminCoordinator, DashboardCoordinator, LoginCoordinator, RegistrationCoordinator, ensure_bootstrapped,
};
use tabwarden::providers::RegistrationRequest;

pub const ROOT_PASSWORD: &str = "root-pass";

/// Environment backed by a fixed map, so tests never touch process state
pub struct TestEnvironment {
    vars: HashMap<String, String>,
}

impl TestEnvironment {
    pub fn new(vars: &[(&str, &str)]) -> Self {
        Self {
            vars: vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }
}

impl EnvironmentProvider for TestEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Creates an in-memory database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Every coordinator over one bootstrapped store
pub struct TestApp {
    pub app_data: Arc<AppData>,
    pub login: LoginCoordinator,
    pub registration: RegistrationCoordinator,
    pub admin: AdminCoordinator,
    pub dashboard: DashboardCoordinator,
}

/// Bootstrapped app with root password `ROOT_PASSWORD` and SHA-256 digests
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

/// Like `setup_test_app`, with extra environment variables layered on top
pub async fn setup_test_app_with(extra: &[(&str, &str)]) -> TestApp {
    let mut vars = vec![("ROOT_PASSWORD", ROOT_PASSWORD), ("PASSWORD_SCHEME", "sha256")];
    vars.extend_from_slice(extra);

    let settings =
        AccessSettings::from_env_provider(&TestEnvironment::new(&vars)).expect("Failed to build test settings");
    let app_data = Arc::new(AppData::init(setup_test_db().await, settings));
    ensure_bootstrapped(&app_data).await.expect("Bootstrap failed");

    TestApp {
        login: LoginCoordinator::new(app_data.clone()),
        registration: RegistrationCoordinator::new(app_data.clone()),
        admin: AdminCoordinator::new(app_data.clone()),
        dashboard: DashboardCoordinator::new(app_data.clone()),
        app_data,
    }
}

pub fn registration(username: &str, email: &str, password: &str, confirm: &str) -> RegistrationRequest {
    RegistrationRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        confirm_password: confirm.to_string(),
        first_name: String::new(),
        last_name: String::new(),
    }
}

impl TestApp {
    /// Register and look up the new user's id
    pub async fn register_viewer(&self, username: &str) -> i32 {
        self.registration
            .register(registration(username, &format!("{}@x.com", username), "pw123", "pw123"))
            .await
            .expect("Registration failed");
        self.app_data
            .stores
            .users
            .get_by_username(&self.app_data.db, username)
            .await
            .expect("Registered user missing")
            .id
    }

    /// Register and approve as root
    pub async fn approved_viewer(&self, username: &str) -> i32 {
        let user_id = self.register_viewer(username).await;
        self.admin.approve("root", user_id).await.expect("Approval failed");
        user_id
    }
}
