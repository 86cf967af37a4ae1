use std::collections::BTreeSet;

use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, TransactionTrait};

use crate::errors::InternalError;
use crate::types::db::{user_employee_access, user_tab_access};

/// Per-user set of granted resource ids.
///
/// Tab grants and employee grants share this shape; both are composite-key
/// join tables with no payload beyond the pair.
#[allow(async_fn_in_trait)]
pub trait GrantSet {
    /// Resource ids granted to `user_id`
    async fn members(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<BTreeSet<i32>, InternalError>;

    async fn contains(&self, conn: &impl ConnectionTrait, user_id: i32, resource_id: i32) -> Result<bool, InternalError>;

    /// Returns false when the grant already existed
    async fn add(&self, conn: &impl ConnectionTrait, user_id: i32, resource_id: i32) -> Result<bool, InternalError>;

    /// Returns false when there was nothing to remove
    async fn remove(&self, conn: &impl ConnectionTrait, user_id: i32, resource_id: i32) -> Result<bool, InternalError>;

    /// Make the user's grants exactly `resource_ids`. Runs in a nested
    /// transaction so a failure leaves the previous set untouched.
    async fn replace_all<C>(&self, conn: &C, user_id: i32, resource_ids: &BTreeSet<i32>) -> Result<(), InternalError>
    where
        C: ConnectionTrait + TransactionTrait;
}

/// Rows of `user_tab_access`
#[derive(Debug, Default)]
pub struct TabGrants {}

impl TabGrants {
    pub fn new() -> Self {
        Self {}
    }

    async fn insert(&self, conn: &impl ConnectionTrait, user_id: i32, tab_id: i32) -> Result<(), InternalError> {
        let row = user_tab_access::ActiveModel {
            user_id: Set(user_id),
            tab_id: Set(tab_id),
        };
        user_tab_access::Entity::insert(row)
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("insert_tab_grant", e))?;
        Ok(())
    }
}

impl GrantSet for TabGrants {
    async fn members(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<BTreeSet<i32>, InternalError> {
        let rows = user_tab_access::Entity::find()
            .filter(user_tab_access::Column::UserId.eq(user_id))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_tab_grants", e))?;
        Ok(rows.into_iter().map(|row| row.tab_id).collect())
    }

    async fn contains(&self, conn: &impl ConnectionTrait, user_id: i32, tab_id: i32) -> Result<bool, InternalError> {
        let row = user_tab_access::Entity::find_by_id((user_id, tab_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_tab_grant", e))?;
        Ok(row.is_some())
    }

    async fn add(&self, conn: &impl ConnectionTrait, user_id: i32, tab_id: i32) -> Result<bool, InternalError> {
        if self.contains(conn, user_id, tab_id).await? {
            return Ok(false);
        }
        self.insert(conn, user_id, tab_id).await?;
        Ok(true)
    }

    async fn remove(&self, conn: &impl ConnectionTrait, user_id: i32, tab_id: i32) -> Result<bool, InternalError> {
        let result = user_tab_access::Entity::delete_many()
            .filter(user_tab_access::Column::UserId.eq(user_id))
            .filter(user_tab_access::Column::TabId.eq(tab_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_tab_grant", e))?;
        Ok(result.rows_affected > 0)
    }

    async fn replace_all<C>(&self, conn: &C, user_id: i32, tab_ids: &BTreeSet<i32>) -> Result<(), InternalError>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = conn.begin().await.map_err(InternalError::transaction_begin)?;

        user_tab_access::Entity::delete_many()
            .filter(user_tab_access::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("clear_tab_grants", e))?;

        for tab_id in tab_ids {
            self.insert(&txn, user_id, *tab_id).await?;
        }

        txn.commit().await.map_err(InternalError::transaction_commit)
    }
}

/// Rows of `user_employee_access`
#[derive(Debug, Default)]
pub struct EmployeeGrants {}

impl EmployeeGrants {
    pub fn new() -> Self {
        Self {}
    }

    async fn insert(&self, conn: &impl ConnectionTrait, user_id: i32, employee_id: i32) -> Result<(), InternalError> {
        let row = user_employee_access::ActiveModel {
            user_id: Set(user_id),
            employee_id: Set(employee_id),
        };
        user_employee_access::Entity::insert(row)
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("insert_employee_grant", e))?;
        Ok(())
    }
}

impl GrantSet for EmployeeGrants {
    async fn members(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<BTreeSet<i32>, InternalError> {
        let rows = user_employee_access::Entity::find()
            .filter(user_employee_access::Column::UserId.eq(user_id))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_employee_grants", e))?;
        Ok(rows.into_iter().map(|row| row.employee_id).collect())
    }

    async fn contains(&self, conn: &impl ConnectionTrait, user_id: i32, employee_id: i32) -> Result<bool, InternalError> {
        let row = user_employee_access::Entity::find_by_id((user_id, employee_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_employee_grant", e))?;
        Ok(row.is_some())
    }

    async fn add(&self, conn: &impl ConnectionTrait, user_id: i32, employee_id: i32) -> Result<bool, InternalError> {
        if self.contains(conn, user_id, employee_id).await? {
            return Ok(false);
        }
        self.insert(conn, user_id, employee_id).await?;
        Ok(true)
    }

    async fn remove(&self, conn: &impl ConnectionTrait, user_id: i32, employee_id: i32) -> Result<bool, InternalError> {
        let result = user_employee_access::Entity::delete_many()
            .filter(user_employee_access::Column::UserId.eq(user_id))
            .filter(user_employee_access::Column::EmployeeId.eq(employee_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_employee_grant", e))?;
        Ok(result.rows_affected > 0)
    }

    async fn replace_all<C>(&self, conn: &C, user_id: i32, employee_ids: &BTreeSet<i32>) -> Result<(), InternalError>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = conn.begin().await.map_err(InternalError::transaction_begin)?;

        user_employee_access::Entity::delete_many()
            .filter(user_employee_access::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("clear_employee_grants", e))?;

        for employee_id in employee_ids {
            self.insert(&txn, user_id, *employee_id).await?;
        }

        txn.commit().await.map_err(InternalError::transaction_commit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{seed_employee, seed_viewer, setup_test_db};

    #[tokio::test]
    async fn test_tab_grants_add_remove() {
        let db = setup_test_db().await;
        let user = seed_viewer(&db, "alice").await;
        let grants = TabGrants::new();

        assert!(grants.add(&db, user.id, 1).await.unwrap());
        assert!(!grants.add(&db, user.id, 1).await.unwrap());
        assert!(grants.contains(&db, user.id, 1).await.unwrap());

        assert!(grants.remove(&db, user.id, 1).await.unwrap());
        assert!(!grants.remove(&db, user.id, 1).await.unwrap());
        assert!(grants.members(&db, user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tab_grants_replace_all_is_full_replace() {
        let db = setup_test_db().await;
        let user = seed_viewer(&db, "alice").await;
        let grants = TabGrants::new();
        grants.add(&db, user.id, 1).await.unwrap();
        grants.add(&db, user.id, 2).await.unwrap();

        grants.replace_all(&db, user.id, &BTreeSet::from([2, 3])).await.unwrap();
        assert_eq!(grants.members(&db, user.id).await.unwrap(), BTreeSet::from([2, 3]));

        grants.replace_all(&db, user.id, &BTreeSet::new()).await.unwrap();
        assert!(grants.members(&db, user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tab_grants_replace_all_failure_keeps_previous_set() {
        let db = setup_test_db().await;
        let user = seed_viewer(&db, "alice").await;
        let grants = TabGrants::new();
        grants.add(&db, user.id, 1).await.unwrap();
        grants.add(&db, user.id, 2).await.unwrap();

        // Tab 999 does not exist, so its insert fails after the clear and tab 3 went in
        let err = grants
            .replace_all(&db, user.id, &BTreeSet::from([3, 999]))
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Database(_)));
        assert_eq!(grants.members(&db, user.id).await.unwrap(), BTreeSet::from([1, 2]));
    }

    #[tokio::test]
    async fn test_employee_grants_replace_all_failure_keeps_previous_set() {
        let db = setup_test_db().await;
        let user = seed_viewer(&db, "alice").await;
        let first = seed_employee(&db, "e1@x.com", false).await;
        let second = seed_employee(&db, "e2@x.com", false).await;
        let grants = EmployeeGrants::new();
        grants.add(&db, user.id, first.id).await.unwrap();

        let missing = second.id + 100;
        let err = grants
            .replace_all(&db, user.id, &BTreeSet::from([second.id, missing]))
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Database(_)));
        assert_eq!(grants.members(&db, user.id).await.unwrap(), BTreeSet::from([first.id]));
    }

    #[tokio::test]
    async fn test_employee_grants_replace_all() {
        let db = setup_test_db().await;
        let user = seed_viewer(&db, "alice").await;
        let first = seed_employee(&db, "e1@x.com", false).await;
        let second = seed_employee(&db, "e2@x.com", false).await;
        let grants = EmployeeGrants::new();

        assert!(grants.add(&db, user.id, first.id).await.unwrap());
        grants.replace_all(&db, user.id, &BTreeSet::from([second.id])).await.unwrap();

        assert!(!grants.contains(&db, user.id, first.id).await.unwrap());
        assert!(grants.contains(&db, user.id, second.id).await.unwrap());
    }
}
