//! Account registration and login service.
//!
//! Registration either upgrades a live guest in place (same id, history
//! and preferences preserved) or creates a fresh registered account with
//! bootstrapped default categories; both run inside one transaction in
//! the adapter. Login authenticates registered users only and reports
//! credential mismatches generically.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    AccountCommand, LoginOutcome, NewRegisteredAccount, PasswordHasher, PasswordHasherError,
    RegisterOutcome, RegisterRequest, UserRepository, UserRepositoryError,
};
use crate::domain::{Error, UserId, Username, email_has_valid_shape};

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 8;

const GENERIC_LOGIN_FAILURE: &str = "invalid username or password";

/// Account service implementing the [`AccountCommand`] driving port.
#[derive(Clone)]
pub struct AccountService<U, P> {
    users: Arc<U>,
    hasher: Arc<P>,
}

impl<U, P> AccountService<U, P> {
    /// Create a service over the user store and hashing primitive.
    pub fn new(users: Arc<U>, hasher: Arc<P>) -> Self {
        Self { users, hasher }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Unavailable { message } => Error::store_unavailable(message),
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user store query failed: {message}"))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    let PasswordHasherError::Hashing { message } = error;
    Error::internal(format!("credential hashing failed: {message}"))
}

fn validated_account(request: &RegisterRequest) -> Result<(Username, String), Error> {
    let username = request.username.trim();
    let email = request.email.trim();
    if username.is_empty() || request.password.is_empty() || email.is_empty() {
        return Err(Error::invalid_request(
            "username, password, and email are all required",
        ));
    }
    if request.password.chars().count() < PASSWORD_MIN {
        return Err(Error::invalid_request(format!(
            "password must be at least {PASSWORD_MIN} characters"
        )));
    }
    if !email_has_valid_shape(email) {
        return Err(Error::invalid_request("email address is not valid"));
    }
    let username = Username::new(username)
        .map_err(|error| Error::invalid_request(error.to_string()))?;
    Ok((username, email.to_owned()))
}

#[async_trait]
impl<U, P> AccountCommand for AccountService<U, P>
where
    U: UserRepository,
    P: PasswordHasher,
{
    async fn register(&self, request: RegisterRequest) -> Result<RegisterOutcome, Error> {
        let (username, email) = validated_account(&request)?;

        let taken = self
            .users
            .login_taken(username.as_ref(), &email)
            .await
            .map_err(map_user_error)?;
        if taken {
            return Err(Error::invalid_request(
                "username or email is already in use",
            ));
        }

        let password_hash = self
            .hasher
            .hash(&request.password)
            .map_err(map_hasher_error)?;
        let account = NewRegisteredAccount {
            username: username.clone(),
            password_hash,
            email,
        };

        if let Some(guest_id) = request.guest_id {
            let upgraded = self
                .users
                .upgrade_guest(&guest_id, &account)
                .await
                .map_err(map_user_error)?;
            if !upgraded {
                return Err(Error::not_found("no guest account to upgrade"));
            }
            info!(user = %guest_id, "upgraded guest to registered account");
            return Ok(RegisterOutcome {
                user_id: guest_id,
                username,
                upgraded: true,
            });
        }

        let user_id = UserId::random();
        self.users
            .create_registered(&user_id, &account)
            .await
            .map_err(map_user_error)?;
        info!(user = %user_id, "registered new account");
        Ok(RegisterOutcome {
            user_id,
            username,
            upgraded: false,
        })
    }

    async fn login(&self, login: &str, password: &str) -> Result<LoginOutcome, Error> {
        let login = login.trim();
        if login.is_empty() || password.is_empty() {
            return Err(Error::invalid_request(
                "username and password are required",
            ));
        }

        let credentials = self
            .users
            .find_credentials(login)
            .await
            .map_err(map_user_error)?;
        // One generic message for both misses: do not leak which accounts
        // exist.
        let Some(credentials) = credentials else {
            return Err(Error::unauthorized(GENERIC_LOGIN_FAILURE));
        };
        let verified = self
            .hasher
            .verify(password, &credentials.password_hash)
            .map_err(map_hasher_error)?;
        if !verified {
            return Err(Error::unauthorized(GENERIC_LOGIN_FAILURE));
        }

        self.users
            .touch_last_login(&credentials.user_id)
            .await
            .map_err(map_user_error)?;
        Ok(LoginOutcome {
            user_id: credentials.user_id,
            username: credentials.username,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        FixturePasswordHasher, MockUserRepository, StoredCredentials,
    };
    use rstest::rstest;

    fn request(guest_id: Option<UserId>) -> RegisterRequest {
        RegisterRequest {
            username: "ada".to_owned(),
            password: "correct horse".to_owned(),
            email: "ada@example.com".to_owned(),
            guest_id,
        }
    }

    fn service(
        users: MockUserRepository,
    ) -> AccountService<MockUserRepository, FixturePasswordHasher> {
        AccountService::new(Arc::new(users), Arc::new(FixturePasswordHasher))
    }

    #[rstest]
    #[case::missing_username("  ", "longenough", "a@b.co")]
    #[case::missing_password("ada", "", "a@b.co")]
    #[case::short_password("ada", "short", "a@b.co")]
    #[case::bad_email("ada", "longenough", "not-an-email")]
    #[tokio::test]
    async fn invalid_input_aborts_before_any_write(
        #[case] username: &str,
        #[case] password: &str,
        #[case] email: &str,
    ) {
        let mut users = MockUserRepository::new();
        users.expect_login_taken().times(0);
        users.expect_create_registered().times(0);

        let err = service(users)
            .register(RegisterRequest {
                username: username.to_owned(),
                password: password.to_owned(),
                email: email.to_owned(),
                guest_id: None,
            })
            .await
            .expect_err("validation failure");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn taken_login_is_rejected_before_hashing() {
        let mut users = MockUserRepository::new();
        users.expect_login_taken().return_once(|_, _| Ok(true));
        users.expect_create_registered().times(0);

        let err = service(users)
            .register(request(None))
            .await
            .expect_err("duplicate login");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn guest_upgrade_preserves_the_guest_id() {
        let guest = UserId::random();
        let mut users = MockUserRepository::new();
        users.expect_login_taken().return_once(|_, _| Ok(false));
        users
            .expect_upgrade_guest()
            .withf(move |id, account| *id == guest && account.username.as_ref() == "ada")
            .return_once(|_, _| Ok(true));
        users.expect_create_registered().times(0);

        let outcome = service(users)
            .register(request(Some(guest)))
            .await
            .expect("upgrade");
        assert_eq!(outcome.user_id, guest);
        assert!(outcome.upgraded);
    }

    #[rstest]
    #[tokio::test]
    async fn vanished_guest_fails_the_upgrade() {
        let mut users = MockUserRepository::new();
        users.expect_login_taken().return_once(|_, _| Ok(false));
        users.expect_upgrade_guest().return_once(|_, _| Ok(false));

        let err = service(users)
            .register(request(Some(UserId::random())))
            .await
            .expect_err("upgrade failure");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn fresh_registration_mints_a_new_id() {
        let mut users = MockUserRepository::new();
        users.expect_login_taken().return_once(|_, _| Ok(false));
        users
            .expect_create_registered()
            .return_once(|_, _| Ok(()));

        let outcome = service(users)
            .register(request(None))
            .await
            .expect("registration");
        assert!(!outcome.upgraded);
        assert_eq!(outcome.username.as_ref(), "ada");
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_user_and_wrong_password_report_the_same_message() {
        let hasher = FixturePasswordHasher;
        let stored = StoredCredentials {
            user_id: UserId::random(),
            username: Username::new("ada").expect("username"),
            password_hash: hasher.hash("hunter22").expect("hash"),
        };

        let mut unknown = MockUserRepository::new();
        unknown.expect_find_credentials().return_once(|_| Ok(None));
        let unknown_err = service(unknown)
            .login("ghost", "hunter22")
            .await
            .expect_err("unknown user");

        let mut wrong = MockUserRepository::new();
        wrong
            .expect_find_credentials()
            .return_once(move |_| Ok(Some(stored)));
        let wrong_err = service(wrong)
            .login("ada", "wrong")
            .await
            .expect_err("wrong password");

        assert_eq!(unknown_err.code(), ErrorCode::Unauthorized);
        assert_eq!(unknown_err.message(), wrong_err.message());
    }

    #[rstest]
    #[tokio::test]
    async fn successful_login_touches_last_login() {
        let hasher = FixturePasswordHasher;
        let user_id = UserId::random();
        let stored = StoredCredentials {
            user_id,
            username: Username::new("ada").expect("username"),
            password_hash: hasher.hash("hunter22").expect("hash"),
        };

        let mut users = MockUserRepository::new();
        users
            .expect_find_credentials()
            .return_once(move |_| Ok(Some(stored)));
        users
            .expect_touch_last_login()
            .withf(move |id| *id == user_id)
            .return_once(|_| Ok(()));

        let outcome = service(users)
            .login("ada", "hunter22")
            .await
            .expect("login");
        assert_eq!(outcome.user_id, user_id);
    }
}
