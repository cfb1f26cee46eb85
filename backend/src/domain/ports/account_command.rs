//! Driving port for registration and login.

use async_trait::async_trait;

use crate::domain::{Error, UserId, Username};

/// Registration input after HTTP-level extraction.
///
/// `guest_id` is the id carried by a live guest cookie, if any; its
/// presence selects the in-place upgrade path that preserves the guest's
/// history and preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub guest_id: Option<UserId>,
}

/// Successful registration outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterOutcome {
    pub user_id: UserId,
    pub username: Username,
    /// Whether an existing guest was upgraded rather than a fresh account
    /// created.
    pub upgraded: bool,
}

/// Successful login outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user_id: UserId,
    pub username: Username,
}

/// Driving port for account lifecycle operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register a new account or upgrade a live guest in place.
    ///
    /// The whole sequence is transactional: a mid-sequence failure rolls
    /// back every write and surfaces a single error.
    async fn register(&self, request: RegisterRequest) -> Result<RegisterOutcome, Error>;

    /// Authenticate a registered user by username or email.
    ///
    /// Credential mismatches are reported generically so callers cannot
    /// distinguish an unknown user from a wrong password.
    async fn login(&self, login: &str, password: &str) -> Result<LoginOutcome, Error>;
}
