// Caller-facing errors returned by coordinators
pub mod service;

pub use service::ServiceError;
