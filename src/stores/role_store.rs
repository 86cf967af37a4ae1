use std::collections::BTreeSet;

use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use crate::errors::InternalError;
use crate::types::db::{role, role_permission};
use crate::types::internal::{Permission, RoleName};

/// Role registry and permission matrix
#[derive(Debug, Default)]
pub struct RoleStore {}

impl RoleStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn count(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        role::Entity::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_roles", e))
    }

    /// Seed the fixed role set when the registry is empty. Returns how many roles were written.
    pub async fn ensure_roles(&self, conn: &impl ConnectionTrait) -> Result<usize, InternalError> {
        if self.count(conn).await? > 0 {
            return Ok(0);
        }

        for role_name in RoleName::ALL {
            let row = role::ActiveModel {
                name: Set(role_name.as_str().to_string()),
                description: Set(role_name.description().to_string()),
            };
            role::Entity::insert(row)
                .exec_without_returning(conn)
                .await
                .map_err(|e| InternalError::database("insert_role", e))?;
        }

        tracing::info!(count = RoleName::ALL.len(), "Seeded role registry");
        Ok(RoleName::ALL.len())
    }

    pub async fn list(&self, conn: &impl ConnectionTrait) -> Result<Vec<RoleName>, InternalError> {
        role::Entity::find()
            .order_by_asc(role::Column::Name)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_roles", e))?
            .into_iter()
            .map(|row| row.name.parse::<RoleName>())
            .collect()
    }

    /// Permissions stored for `role`. Reads rows only; the super-admin
    /// short-circuit lives in the authorization provider.
    pub async fn permissions_for(
        &self,
        conn: &impl ConnectionTrait,
        role: RoleName,
    ) -> Result<BTreeSet<Permission>, InternalError> {
        role_permission::Entity::find()
            .filter(role_permission::Column::RoleName.eq(role.as_str()))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_role_permissions", e))?
            .into_iter()
            .map(|row| row.permission.parse::<Permission>())
            .collect()
    }

    pub async fn has_permission(
        &self,
        conn: &impl ConnectionTrait,
        role: RoleName,
        permission: Permission,
    ) -> Result<bool, InternalError> {
        let row = role_permission::Entity::find_by_id((role.as_str().to_string(), permission.as_str().to_string()))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_role_permission", e))?;
        Ok(row.is_some())
    }

    /// Add a (role, permission) row unless it already exists. Returns whether a row was written.
    pub async fn grant_permission(
        &self,
        conn: &impl ConnectionTrait,
        role: RoleName,
        permission: Permission,
    ) -> Result<bool, InternalError> {
        if self.has_permission(conn, role, permission).await? {
            return Ok(false);
        }

        let row = role_permission::ActiveModel {
            role_name: Set(role.as_str().to_string()),
            permission: Set(permission.as_str().to_string()),
        };
        role_permission::Entity::insert(row)
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("insert_role_permission", e))?;
        Ok(true)
    }

    pub async fn revoke_permission(
        &self,
        conn: &impl ConnectionTrait,
        role: RoleName,
        permission: Permission,
    ) -> Result<bool, InternalError> {
        let result = role_permission::Entity::delete_many()
            .filter(role_permission::Column::RoleName.eq(role.as_str()))
            .filter(role_permission::Column::Permission.eq(permission.as_str()))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_role_permission", e))?;
        Ok(result.rows_affected > 0)
    }

    pub async fn permission_row_count(&self, conn: &impl ConnectionTrait, role: RoleName) -> Result<u64, InternalError> {
        role_permission::Entity::find()
            .filter(role_permission::Column::RoleName.eq(role.as_str()))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_role_permissions", e))
    }
}
