// Providers layer - Work performers and business logic
//
// Providers hold the rules (credential checks, access decisions,
// registration validation) and compose store calls. Coordinators own the
// transaction and pass the handle in.

pub mod authentication_provider;
pub mod authorization_provider;
pub mod crypto_provider;
pub mod user_provider;

pub use authentication_provider::{AuthenticationProvider, LoginRequest};
pub use authorization_provider::AuthorizationProvider;
pub use crypto_provider::{Argon2Hasher, PasswordHasher, Sha256Hasher};
pub use user_provider::{RegistrationRequest, UserProvider};
