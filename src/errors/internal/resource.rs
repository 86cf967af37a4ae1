use thiserror::Error;

use super::InternalError;

/// Tab and employee lookups that came back empty, and employee conflicts
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Tab not found: {name}")]
    TabNotFound { name: String },

    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound { employee_id: i32 },

    #[error("Employee email already exists: {email}")]
    DuplicateEmployeeEmail { email: String },
}

impl ResourceError {
    pub fn tab_not_found(name: &str) -> InternalError {
        InternalError::Resource(Self::TabNotFound {
            name: name.to_owned(),
        })
    }

    pub fn employee_not_found(employee_id: i32) -> InternalError {
        InternalError::Resource(Self::EmployeeNotFound { employee_id })
    }

    pub fn duplicate_employee_email(email: &str) -> InternalError {
        InternalError::Resource(Self::DuplicateEmployeeEmail {
            email: email.to_owned(),
        })
    }
}
