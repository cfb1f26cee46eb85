//! bcrypt-backed implementation of the `PasswordHasher` port.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Production password hasher wrapping the bcrypt primitive.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher with an explicit work factor.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, plain: &str) -> Result<String, PasswordHasherError> {
        hash(plain, self.cost).map_err(|error| PasswordHasherError::hashing(error.to_string()))
    }

    fn verify(&self, plain: &str, hashed: &str) -> Result<bool, PasswordHasherError> {
        verify(plain, hashed).map_err(|error| PasswordHasherError::hashing(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    // Minimum cost keeps the test fast; production uses DEFAULT_COST.
    fn fast_hasher() -> BcryptPasswordHasher {
        BcryptPasswordHasher::with_cost(4)
    }

    #[rstest]
    fn hash_then_verify_round_trips() {
        let hasher = fast_hasher();
        let hashed = hasher.hash("correct horse").expect("hash");
        assert!(hasher.verify("correct horse", &hashed).expect("verify"));
        assert!(!hasher.verify("wrong", &hashed).expect("verify"));
    }

    #[rstest]
    fn malformed_stored_hash_is_an_error_not_a_match() {
        let hasher = fast_hasher();
        let result = hasher.verify("anything", "not-a-bcrypt-hash");
        assert!(result.is_err());
    }
}
