mod env_provider;
mod errors;
mod logging;
mod settings;

pub mod database;

pub use env_provider::{EnvironmentProvider, SystemEnvironment};
#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use errors::ConfigError;
pub use logging::{LoggingError, init_logging};
pub use settings::{AccessSettings, PasswordScheme, RootAccount};
