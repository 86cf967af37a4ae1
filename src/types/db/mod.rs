// Database entities - SeaORM models
pub mod employee;
pub mod role;
pub mod role_permission;
pub mod tab;
pub mod tab_metric;
pub mod user;
pub mod user_employee_access;
pub mod user_tab_access;
