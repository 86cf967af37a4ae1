// Stores layer - Data access over the identity and dashboard tables
pub mod employee_store;
pub mod grant_store;
pub mod metric_store;
pub mod role_store;
pub mod tab_store;
pub mod user_store;

pub use employee_store::EmployeeStore;
pub use grant_store::{EmployeeGrants, GrantSet, TabGrants};
pub use metric_store::MetricStore;
pub use role_store::RoleStore;
pub use tab_store::TabStore;
pub use user_store::{LookupScope, UserStore};
