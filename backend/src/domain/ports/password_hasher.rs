//! Port for credential hashing.
//!
//! A synchronous interface is intentional: hashing is CPU-only and must
//! not perform I/O. The production adapter wraps bcrypt; tests use the
//! reversible fixture below.

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing or verification failed inside the backing primitive.
        Hashing { message: String } =>
            "credential hashing failed: {message}",
    }
}

/// Port for hashing and verifying account passwords.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, plain: &str) -> Result<String, PasswordHasherError>;

    /// Verify a plaintext password against a stored hash.
    fn verify(&self, plain: &str, hashed: &str) -> Result<bool, PasswordHasherError>;
}

/// Deterministic fixture hasher for tests.
///
/// Not a real hash; it tags the plaintext so `verify` can match without
/// any cryptographic work.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

const FIXTURE_PREFIX: &str = "fixture$";

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, plain: &str) -> Result<String, PasswordHasherError> {
        Ok(format!("{FIXTURE_PREFIX}{plain}"))
    }

    fn verify(&self, plain: &str, hashed: &str) -> Result<bool, PasswordHasherError> {
        Ok(hashed
            .strip_prefix(FIXTURE_PREFIX)
            .is_some_and(|stored| stored == plain))
    }
}
