use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, SqlErr,
};

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::db::user;
use crate::types::internal::{NewUser, RoleName};

/// Which accounts a username-or-email lookup may return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupScope {
    /// Any account, approved or not
    Any,
    /// Only accounts with `is_active` and `is_approved` set
    SignInEligible,
}

/// Durable user records (the identity half of the store)
#[derive(Debug, Default)]
pub struct UserStore {}

impl UserStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(user_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// Like `find_by_id` but a missing user is an error
    pub async fn get_by_id(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<user::Model, InternalError> {
        self.find_by_id(conn, user_id)
            .await?
            .ok_or_else(|| CredentialError::user_id_not_found(user_id))
    }

    pub async fn find_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))
    }

    pub async fn get_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<user::Model, InternalError> {
        self.find_by_username(conn, username)
            .await?
            .ok_or_else(|| CredentialError::username_not_found(username))
    }

    pub async fn find_by_email(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    /// Match `identifier` against username or email
    pub async fn find_by_username_or_email(
        &self,
        conn: &impl ConnectionTrait,
        identifier: &str,
        scope: LookupScope,
    ) -> Result<Option<user::Model>, InternalError> {
        let mut query = user::Entity::find().filter(
            Condition::any()
                .add(user::Column::Username.eq(identifier))
                .add(user::Column::Email.eq(identifier)),
        );

        if scope == LookupScope::SignInEligible {
            query = query
                .filter(user::Column::IsActive.eq(true))
                .filter(user::Column::IsApproved.eq(true));
        }

        query
            .order_by_asc(user::Column::Id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_username_or_email", e))
    }

    /// Insert a user. Super-admins start active and approved, everyone else pending.
    ///
    /// Username and email uniqueness is checked before the insert; a unique
    /// violation from a concurrent insert is mapped to the same errors.
    pub async fn create(&self, conn: &impl ConnectionTrait, new_user: NewUser) -> Result<user::Model, InternalError> {
        if self.find_by_username(conn, &new_user.username).await?.is_some() {
            return Err(CredentialError::duplicate_username(&new_user.username));
        }
        if self.find_by_email(conn, &new_user.email).await?.is_some() {
            return Err(CredentialError::duplicate_email(&new_user.email));
        }

        let approved = new_user.starts_approved();
        let new_row = user::ActiveModel {
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            username: Set(new_user.username.clone()),
            email: Set(new_user.email.clone()),
            password_digest: Set(new_user.password_digest),
            role_name: Set(new_user.role.as_str().to_string()),
            is_active: Set(approved),
            is_approved: Set(approved),
            created_at: Set(chrono::Utc::now().timestamp()),
            last_login: Set(None),
            ..Default::default()
        };

        new_row.insert(conn).await.map_err(|e| match unique_violation(&e) {
            Some(message) if message.contains("email") => CredentialError::duplicate_email(&new_user.email),
            Some(_) => CredentialError::duplicate_username(&new_user.username),
            None => InternalError::database("insert_user", e),
        })
    }

    /// Stamp a successful sign-in. `last_login` strictly increases across
    /// calls, so a second sign-in within the same second lands one tick later.
    pub async fn record_login(
        &self,
        conn: &impl ConnectionTrait,
        user: user::Model,
        at: i64,
    ) -> Result<user::Model, InternalError> {
        let stamp = match user.last_login {
            Some(previous) if previous >= at => previous + 1,
            _ => at,
        };
        let mut row: user::ActiveModel = user.into();
        row.last_login = Set(Some(stamp));
        row.update(conn)
            .await
            .map_err(|e| InternalError::database("record_login", e))
    }

    /// Open the approval gate: `is_approved` and `is_active` both true
    pub async fn set_approved(&self, conn: &impl ConnectionTrait, user: user::Model) -> Result<user::Model, InternalError> {
        let mut row: user::ActiveModel = user.into();
        row.is_approved = Set(true);
        row.is_active = Set(true);
        row.update(conn)
            .await
            .map_err(|e| InternalError::database("approve_user", e))
    }

    /// Accounts awaiting approval. The super-admin is never pending.
    pub async fn list_pending(&self, conn: &impl ConnectionTrait) -> Result<Vec<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::IsApproved.eq(false))
            .filter(user::Column::RoleName.ne(RoleName::SuperAdmin.as_str()))
            .order_by_asc(user::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_pending_users", e))
    }

    pub async fn list_by_role_excluding(
        &self,
        conn: &impl ConnectionTrait,
        excluded: RoleName,
    ) -> Result<Vec<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::RoleName.ne(excluded.as_str()))
            .order_by_asc(user::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_users_by_role_excluding", e))
    }

    pub async fn find_first_with_role(
        &self,
        conn: &impl ConnectionTrait,
        role: RoleName,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::RoleName.eq(role.as_str()))
            .order_by_asc(user::Column::Id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_with_role", e))
    }

    pub async fn count_with_role(&self, conn: &impl ConnectionTrait, role: RoleName) -> Result<u64, InternalError> {
        user::Entity::find()
            .filter(user::Column::RoleName.eq(role.as_str()))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_users_with_role", e))
    }

    /// Hard delete; grants cascade. Only bootstrap uses this, to replace a stale root record.
    pub async fn delete(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<u64, InternalError> {
        let result = user::Entity::delete_by_id(user_id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;
        Ok(result.rows_affected)
    }
}

fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => Some(message),
        _ => None,
    }
}
