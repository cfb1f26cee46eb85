//! Port for user account persistence.
//!
//! Guest creation bootstraps default category preferences inside the
//! adapter; registration paths are transactional so a failed bootstrap
//! rolls the whole account creation back.

use async_trait::async_trait;

use crate::domain::{User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Store unreachable or schema not provisioned.
        Unavailable { message: String } =>
            "user store unavailable: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user store query failed: {message}",
    }
}

/// Credential payload for a registration or guest upgrade.
///
/// The password arrives already hashed; this port never sees plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegisteredAccount {
    pub username: Username,
    pub password_hash: String,
    pub email: String,
}

/// Stored credentials fetched for a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user_id: UserId,
    pub username: Username,
    pub password_hash: String,
}

/// Port for user account storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by id.
    async fn find(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Whether a guest-kind user with this id exists.
    async fn guest_exists(&self, id: &UserId) -> Result<bool, UserRepositoryError>;

    /// Insert a guest user and bootstrap default category preferences.
    ///
    /// Bootstrap failures are non-fatal: the guest row must survive even
    /// when no default categories exist or the preference write fails.
    async fn create_guest(
        &self,
        id: &UserId,
        username: &Username,
    ) -> Result<(), UserRepositoryError>;

    /// Insert a registered user and bootstrap default category
    /// preferences inside one transaction.
    async fn create_registered(
        &self,
        id: &UserId,
        account: &NewRegisteredAccount,
    ) -> Result<(), UserRepositoryError>;

    /// Upgrade a guest in place, preserving its id, history, and
    /// preferences. Returns `false` when the id no longer names a guest.
    async fn upgrade_guest(
        &self,
        id: &UserId,
        account: &NewRegisteredAccount,
    ) -> Result<bool, UserRepositoryError>;

    /// Fetch stored credentials by username or email, registered users
    /// only.
    async fn find_credentials(
        &self,
        login: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// Whether the username or email already belongs to any user.
    async fn login_taken(&self, username: &str, email: &str)
    -> Result<bool, UserRepositoryError>;

    /// Record a successful login time.
    async fn touch_last_login(&self, id: &UserId) -> Result<(), UserRepositoryError>;
}

/// Fixture implementation for running without a provisioned user store.
///
/// Guest identity degrades gracefully: any well-formed guest cookie is
/// honoured and newly minted guests are accepted without being stored.
/// Credentialed operations report the store as unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find(&self, _id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn guest_exists(&self, _id: &UserId) -> Result<bool, UserRepositoryError> {
        Ok(true)
    }

    async fn create_guest(
        &self,
        _id: &UserId,
        _username: &Username,
    ) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn create_registered(
        &self,
        _id: &UserId,
        _account: &NewRegisteredAccount,
    ) -> Result<(), UserRepositoryError> {
        Err(UserRepositoryError::unavailable("user store not provisioned"))
    }

    async fn upgrade_guest(
        &self,
        _id: &UserId,
        _account: &NewRegisteredAccount,
    ) -> Result<bool, UserRepositoryError> {
        Err(UserRepositoryError::unavailable("user store not provisioned"))
    }

    async fn find_credentials(
        &self,
        _login: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        Ok(None)
    }

    async fn login_taken(
        &self,
        _username: &str,
        _email: &str,
    ) -> Result<bool, UserRepositoryError> {
        Ok(false)
    }

    async fn touch_last_login(&self, _id: &UserId) -> Result<(), UserRepositoryError> {
        Ok(())
    }
}
