use std::collections::BTreeSet;

use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::errors::InternalError;
use crate::errors::internal::ResourceError;
use crate::types::db::employee;
use crate::types::internal::NewEmployee;

/// Employee directory records
#[derive(Debug, Default)]
pub struct EmployeeStore {}

impl EmployeeStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Insert an employee. `joining_date` falls back to `now` when absent.
    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        new_employee: NewEmployee,
        now: i64,
    ) -> Result<employee::Model, InternalError> {
        let existing = employee::Entity::find()
            .filter(employee::Column::Email.eq(&new_employee.email))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_employee_by_email", e))?;
        if existing.is_some() {
            return Err(ResourceError::duplicate_employee_email(&new_employee.email));
        }

        let row = employee::ActiveModel {
            name: Set(new_employee.name),
            email: Set(new_employee.email),
            department: Set(new_employee.department),
            position: Set(new_employee.position),
            salary: Set(new_employee.salary),
            joining_date: Set(new_employee.joining_date.unwrap_or(now)),
            is_shared: Set(new_employee.is_shared),
            ..Default::default()
        };
        row.insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_employee", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        employee_id: i32,
    ) -> Result<Option<employee::Model>, InternalError> {
        employee::Entity::find_by_id(employee_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_employee_by_id", e))
    }

    pub async fn get_by_id(&self, conn: &impl ConnectionTrait, employee_id: i32) -> Result<employee::Model, InternalError> {
        self.find_by_id(conn, employee_id)
            .await?
            .ok_or_else(|| ResourceError::employee_not_found(employee_id))
    }

    pub async fn list_all(&self, conn: &impl ConnectionTrait) -> Result<Vec<employee::Model>, InternalError> {
        employee::Entity::find()
            .order_by_asc(employee::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_employees", e))
    }

    /// Shared employees plus those whose id is in `granted`
    pub async fn list_visible(
        &self,
        conn: &impl ConnectionTrait,
        granted: &BTreeSet<i32>,
    ) -> Result<Vec<employee::Model>, InternalError> {
        let mut visibility = Condition::any().add(employee::Column::IsShared.eq(true));
        if !granted.is_empty() {
            visibility = visibility.add(employee::Column::Id.is_in(granted.iter().copied()));
        }

        employee::Entity::find()
            .filter(visibility)
            .order_by_asc(employee::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_visible_employees", e))
    }

    /// Subset of `ids` that name existing employees
    pub async fn existing_ids(
        &self,
        conn: &impl ConnectionTrait,
        ids: &BTreeSet<i32>,
    ) -> Result<BTreeSet<i32>, InternalError> {
        if ids.is_empty() {
            return Ok(BTreeSet::new());
        }
        let rows = employee::Entity::find()
            .filter(employee::Column::Id.is_in(ids.iter().copied()))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_employees_by_ids", e))?;
        Ok(rows.into_iter().map(|row| row.id).collect())
    }

    pub async fn set_shared(
        &self,
        conn: &impl ConnectionTrait,
        employee: employee::Model,
        shared: bool,
    ) -> Result<employee::Model, InternalError> {
        let mut row: employee::ActiveModel = employee.into();
        row.is_shared = Set(shared);
        row.update(conn)
            .await
            .map_err(|e| InternalError::database("update_employee_shared", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{new_employee, setup_test_db};

    #[tokio::test]
    async fn test_create_defaults_joining_date() {
        let db = setup_test_db().await;
        let store = EmployeeStore::new();

        let created = store.create(&db, new_employee("e1@x.com", false), 1_700_000_000).await.unwrap();
        assert_eq!(created.joining_date, 1_700_000_000);

        let mut dated = new_employee("e2@x.com", true);
        dated.joining_date = Some(1_600_000_000);
        let created = store.create(&db, dated, 1_700_000_000).await.unwrap();
        assert_eq!(created.joining_date, 1_600_000_000);
        assert!(created.is_shared);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let db = setup_test_db().await;
        let store = EmployeeStore::new();
        store.create(&db, new_employee("e1@x.com", false), 0).await.unwrap();

        let err = store.create(&db, new_employee("e1@x.com", true), 0).await.unwrap_err();
        assert!(matches!(err, InternalError::Resource(ResourceError::DuplicateEmployeeEmail { .. })));
        assert_eq!(store.list_all(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_visible_includes_shared_and_granted() {
        let db = setup_test_db().await;
        let store = EmployeeStore::new();
        let shared = store.create(&db, new_employee("s@x.com", true), 0).await.unwrap();
        let private = store.create(&db, new_employee("p@x.com", false), 0).await.unwrap();
        let granted = store.create(&db, new_employee("g@x.com", false), 0).await.unwrap();

        let visible: Vec<_> = store
            .list_visible(&db, &BTreeSet::from([granted.id]))
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(visible, vec![shared.id, granted.id]);

        let visible = store.list_visible(&db, &BTreeSet::new()).await.unwrap();
        assert_eq!(visible.len(), 1);

        let updated = store.set_shared(&db, private, true).await.unwrap();
        assert!(updated.is_shared);
        assert_eq!(store.list_visible(&db, &BTreeSet::new()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_existing_ids_drops_unknown() {
        let db = setup_test_db().await;
        let store = EmployeeStore::new();
        let known = store.create(&db, new_employee("e1@x.com", false), 0).await.unwrap();

        let existing = store.existing_ids(&db, &BTreeSet::from([known.id, 999])).await.unwrap();
        assert_eq!(existing, BTreeSet::from([known.id]));
        assert!(matches!(
            store.get_by_id(&db, 999).await.unwrap_err(),
            InternalError::Resource(ResourceError::EmployeeNotFound { employee_id: 999 })
        ));
    }
}
