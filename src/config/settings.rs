use std::fmt;
use std::str::FromStr;

use crate::config::EnvironmentProvider;
use crate::config::errors::ConfigError;

const DEFAULT_DATABASE_URL: &str = "sqlite://tabwarden.db?mode=rwc";
const DEFAULT_ROOT_USERNAME: &str = "root";
const DEFAULT_ROOT_EMAIL: &str = "root@tabwarden.local";
const DEFAULT_TABS: &str = "overview";

/// Which `PasswordHasher` implementation new digests are produced with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordScheme {
    /// Salted Argon2id PHC strings
    Argon2,
    /// Unsalted hex SHA-256, kept for digests written by the legacy system
    Sha256,
}

impl FromStr for PasswordScheme {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "argon2" | "argon2id" => Ok(PasswordScheme::Argon2),
            "sha256" => Ok(PasswordScheme::Sha256),
            _ => Err(ConfigError::invalid("PASSWORD_SCHEME", value, "argon2 or sha256")),
        }
    }
}

/// The reserved super-admin identity ensured at every start
#[derive(Clone)]
pub struct RootAccount {
    pub username: String,
    pub email: String,
    /// `None` asks bootstrap to generate one
    pub password: Option<String>,
}

impl fmt::Debug for RootAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootAccount")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Settings for the access-control core, read from the environment
#[derive(Clone)]
pub struct AccessSettings {
    database_url: String,
    root: RootAccount,
    password_scheme: PasswordScheme,
    password_pepper: String,
    default_tabs: Vec<String>,
}

impl AccessSettings {
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let database_url = required_or_default(env, "DATABASE_URL", DEFAULT_DATABASE_URL)?;
        let root_username = required_or_default(env, "ROOT_USERNAME", DEFAULT_ROOT_USERNAME)?;
        let root_email = required_or_default(env, "ROOT_EMAIL", DEFAULT_ROOT_EMAIL)?;

        let root_password = match env.get_var("ROOT_PASSWORD") {
            Some(password) if password.is_empty() => return Err(ConfigError::empty("ROOT_PASSWORD")),
            other => other,
        };

        let password_scheme = match env.get_var("PASSWORD_SCHEME") {
            Some(value) => value.parse()?,
            None => PasswordScheme::Argon2,
        };

        let password_pepper = env.get_var("PASSWORD_PEPPER").unwrap_or_default();

        let default_tabs = env
            .get_var("DEFAULT_TABS")
            .unwrap_or_else(|| DEFAULT_TABS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            database_url,
            root: RootAccount {
                username: root_username,
                email: root_email,
                password: root_password,
            },
            password_scheme,
            password_pepper,
            default_tabs,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_provider(&crate::config::SystemEnvironment)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn root(&self) -> &RootAccount {
        &self.root
    }

    pub fn root_username(&self) -> &str {
        &self.root.username
    }

    pub fn password_scheme(&self) -> PasswordScheme {
        self.password_scheme
    }

    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    /// Tabs granted to a user the first time they are approved
    pub fn default_tabs(&self) -> &[String] {
        &self.default_tabs
    }
}

impl fmt::Debug for AccessSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessSettings")
            .field("database_url", &self.database_url)
            .field("root", &self.root)
            .field("password_scheme", &self.password_scheme)
            .field("password_pepper", &"<redacted>")
            .field("default_tabs", &self.default_tabs)
            .finish()
    }
}

fn required_or_default(env: &dyn EnvironmentProvider, key: &str, default: &str) -> Result<String, ConfigError> {
    let value = env.get_var(key).unwrap_or_else(|| default.to_string());
    if value.trim().is_empty() {
        return Err(ConfigError::empty(key));
    }
    Ok(value)
}
