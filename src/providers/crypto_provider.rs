use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::config::{AccessSettings, PasswordScheme};
use crate::errors::internal::{CryptoError, InternalError};

/// One-way transform of a credential secret into a stored digest
///
/// Callers compare through `verify`; salted schemes produce a different
/// digest on every `hash` call.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, secret: &str) -> Result<String, InternalError>;

    fn verify(&self, secret: &str, digest: &str) -> Result<bool, InternalError>;
}

/// Argon2id with a random salt and an optional pepper passed as the Argon2 secret
pub struct Argon2Hasher {
    pepper: Vec<u8>,
}

impl Argon2Hasher {
    pub fn new(pepper: impl Into<Vec<u8>>) -> Self {
        Self { pepper: pepper.into() }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        if self.pepper.is_empty() {
            return Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default()));
        }
        Argon2::new_with_secret(&self.pepper, Algorithm::Argon2id, Version::V0x13, Params::default())
            .map_err(|e| CryptoError::other_from_error("Argon2Hasher", "init", e).into())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, secret: &str) -> Result<String, InternalError> {
        use argon2::PasswordHasher as _;

        let salt = SaltString::generate(&mut rand_core::OsRng);
        let digest = self
            .argon2()?
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| CryptoError::other_from_error("Argon2Hasher", "hash", e))?;

        Ok(digest.to_string())
    }

    fn verify(&self, secret: &str, digest: &str) -> Result<bool, InternalError> {
        // A digest we cannot parse (e.g. a legacy hex digest) never matches
        let Ok(parsed) = PasswordHash::new(digest) else {
            return Ok(false);
        };
        Ok(self.argon2()?.verify_password(secret.as_bytes(), &parsed).is_ok())
    }
}

/// Unsalted single-round SHA-256, hex encoded
///
/// Deterministic: `hash(x) == hash(x)`. Only for digests carried over from
/// the legacy store; prefer `Argon2Hasher`.
pub struct Sha256Hasher;

impl PasswordHasher for Sha256Hasher {
    fn hash(&self, secret: &str) -> Result<String, InternalError> {
        Ok(format!("{:x}", Sha256::digest(secret.as_bytes())))
    }

    fn verify(&self, secret: &str, digest: &str) -> Result<bool, InternalError> {
        Ok(self.hash(secret)? == digest)
    }
}

/// Build the hasher selected by `PASSWORD_SCHEME`
pub fn hasher_for(settings: &AccessSettings) -> Box<dyn PasswordHasher> {
    match settings.password_scheme() {
        PasswordScheme::Argon2 => Box::new(Argon2Hasher::new(settings.password_pepper())),
        PasswordScheme::Sha256 => Box::new(Sha256Hasher),
    }
}

/// Generate a 20-character random password for the bootstrap root account
pub fn generate_secure_password() -> String {
    const PASSWORD_LENGTH: usize = 20;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                             abcdefghijklmnopqrstuvwxyz\
                             0123456789\
                             !@#$%^&*()_+-=[]{}|;:,.<>?";

    let mut rng = rand::rng();
    (0..PASSWORD_LENGTH)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_is_deterministic_hex() {
        let hasher = Sha256Hasher;
        let digest = hasher.hash("pw123").unwrap();

        assert_eq!(digest, hasher.hash("pw123").unwrap());
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        // sha256("abc")
        assert_eq!(
            hasher.hash("abc").unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_verify() {
        let hasher = Sha256Hasher;
        let digest = hasher.hash("pw123").unwrap();
        assert!(hasher.verify("pw123", &digest).unwrap());
        assert!(!hasher.verify("pw124", &digest).unwrap());
    }

    #[test]
    fn test_argon2_hash_is_salted_and_verifies() {
        let hasher = Argon2Hasher::new("test-pepper");
        let first = hasher.hash("correct horse").unwrap();
        let second = hasher.hash("correct horse").unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(hasher.verify("correct horse", &first).unwrap());
        assert!(!hasher.verify("battery staple", &first).unwrap());
    }

    #[test]
    fn test_argon2_pepper_is_part_of_the_digest() {
        let digest = Argon2Hasher::new("pepper-a").hash("pw").unwrap();
        assert!(!Argon2Hasher::new("pepper-b").verify("pw", &digest).unwrap());
        assert!(!Argon2Hasher::new("").verify("pw", &digest).unwrap());
    }

    #[test]
    fn test_argon2_rejects_unparseable_digest() {
        let legacy = Sha256Hasher.hash("pw").unwrap();
        assert!(!Argon2Hasher::new("").verify("pw", &legacy).unwrap());
    }

    #[test]
    fn test_generate_secure_password() {
        let password = generate_secure_password();
        assert_eq!(password.len(), 20);
        assert!(password.is_ascii());
        assert_ne!(password, generate_secure_password());
    }
}
