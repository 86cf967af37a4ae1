use thiserror::Error;

use super::InternalError;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Username already exists: {username}")]
    DuplicateUsername { username: String },

    #[error("Email already exists: {email}")]
    DuplicateEmail { email: String },

    #[error("No sign-in candidate for identifier: {identifier}")]
    UnknownIdentifier { identifier: String },

    #[error("Password incorrect for user {username}")]
    IncorrectPassword { username: String },

    #[error("User not found: {username}")]
    UsernameNotFound { username: String },

    #[error("User ID not found: {user_id}")]
    UserIdNotFound { user_id: i32 },
}

impl CredentialError {
    pub fn duplicate_username(username: &str) -> InternalError {
        InternalError::Credential(Self::DuplicateUsername {
            username: username.to_owned(),
        })
    }

    pub fn duplicate_email(email: &str) -> InternalError {
        InternalError::Credential(Self::DuplicateEmail {
            email: email.to_owned(),
        })
    }

    pub fn username_not_found(username: &str) -> InternalError {
        InternalError::Credential(Self::UsernameNotFound {
            username: username.to_owned(),
        })
    }

    pub fn user_id_not_found(user_id: i32) -> InternalError {
        InternalError::Credential(Self::UserIdNotFound { user_id })
    }
}
