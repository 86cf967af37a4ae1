use serde::Serialize;

use crate::types::db::employee;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeRecord {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    pub salary: f64,
    pub joining_date: i64,
    pub is_shared: bool,
}

impl From<employee::Model> for EmployeeRecord {
    fn from(model: employee::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            department: model.department,
            position: model.position,
            salary: model.salary,
            joining_date: model.joining_date,
            is_shared: model.is_shared,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    pub salary: f64,
    /// Defaults to the creation time when absent
    pub joining_date: Option<i64>,
    pub is_shared: bool,
}
