// Domain types shared by stores, providers and coordinators
pub mod employee;
pub mod identity;
pub mod metric;
pub mod user;

pub use employee::{EmployeeRecord, NewEmployee};
pub use identity::{DashboardTab, Permission, RoleName};
pub use metric::{NewTabMetric, TabMetric};
pub use user::{NewUser, UserRecord};
