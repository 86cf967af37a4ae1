use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Setting '{setting_name}' must not be empty")]
    EmptySetting { setting_name: String },

    #[error("Setting '{setting_name}' has invalid value '{value}': expected {expected}")]
    InvalidValue {
        setting_name: String,
        value: String,
        expected: String,
    },
}

impl ConfigError {
    pub fn empty(setting_name: &str) -> Self {
        Self::EmptySetting {
            setting_name: setting_name.to_string(),
        }
    }

    pub fn invalid(setting_name: &str, value: &str, expected: &str) -> Self {
        Self::InvalidValue {
            setting_name: setting_name.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }
}
