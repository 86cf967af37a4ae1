use serde::Serialize;

use crate::errors::InternalError;
use crate::types::db::user;
use crate::types::internal::RoleName;

/// Identity as seen by callers. The password digest never leaves the store layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub role: RoleName,
    pub is_active: bool,
    pub is_approved: bool,
    pub created_at: i64,
    pub last_login: Option<i64>,
}

impl UserRecord {
    /// Active and approved: the approval gate is open
    pub fn can_sign_in(&self) -> bool {
        self.is_active && self.is_approved
    }
}

impl TryFrom<user::Model> for UserRecord {
    type Error = InternalError;

    fn try_from(model: user::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            role: model.role_name.parse()?,
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            username: model.username,
            email: model.email,
            is_active: model.is_active,
            is_approved: model.is_approved,
            created_at: model.created_at,
            last_login: model.last_login,
        })
    }
}

/// Insert request for the users table. `password_digest` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_digest: String,
    pub first_name: String,
    pub last_name: String,
    pub role: RoleName,
}

impl NewUser {
    /// Super-admins are active and approved on creation; everyone else waits
    pub fn starts_approved(&self) -> bool {
        self.role.is_super_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(role_name: &str) -> user::Model {
        user::Model {
            id: 7,
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password_digest: "secret-digest".to_string(),
            role_name: role_name.to_string(),
            is_active: true,
            is_approved: true,
            created_at: 100,
            last_login: Some(200),
        }
    }

    #[test]
    fn test_serialized_record_omits_digest() {
        let record = UserRecord::try_from(model("super_admin")).unwrap();
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["role"], "super_admin");
        assert_eq!(json["last_login"], 200);
        assert!(json.get("password_digest").is_none());
        assert!(!json.to_string().contains("secret-digest"));
    }

    #[test]
    fn test_unknown_role_name_is_rejected() {
        assert!(UserRecord::try_from(model("owner")).is_err());
    }
}
