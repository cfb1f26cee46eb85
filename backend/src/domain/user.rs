//! User identity and account data model.
//!
//! Users are either guests (minted implicitly on first contact, tracked by
//! a long-lived cookie) or registered accounts. A guest upgrade keeps the
//! same [`UserId`] so view history and category preferences survive the
//! transition.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by the user value-object constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyUsername,
    UsernameTooLong { max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an already-validated UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 64;

/// Login name shown in the preferences overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`], trimming surrounding whitespace.
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let trimmed = username.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed))
    }

    /// Derive the auto-generated username for a freshly minted guest.
    ///
    /// The name is a pure function of the minted id so repeated resolution
    /// attempts cannot produce colliding guests from clock or RNG state.
    pub fn for_guest(id: &UserId) -> Self {
        Self(format!("guest_{}", id.as_uuid().simple()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Whether an account is an implicit guest or a credentialed registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserKind {
    Guest,
    Registered,
}

impl UserKind {
    /// Legacy flag form used by the preferences overview payload.
    pub fn is_guest(self) -> bool {
        matches!(self, Self::Guest)
    }
}

/// Application user.
///
/// ## Invariants
/// - Guests never carry an email address.
/// - `last_login` is only set by the login path, so guests keep `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub kind: UserKind,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only; deliverability is not this layer's concern.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Check that an email address has a plausible `local@domain.tld` shape.
pub fn email_has_valid_shape(email: &str) -> bool {
    email_regex().is_match(email)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn user_id_rejects_non_uuid_input() {
        assert_eq!(UserId::new(""), Err(UserValidationError::EmptyId));
        assert_eq!(UserId::new("not-a-uuid"), Err(UserValidationError::InvalidId));
        assert_eq!(
            UserId::new(" 3fa85f64-5717-4562-b3fc-2c963f66afa6"),
            Err(UserValidationError::InvalidId)
        );
    }

    #[rstest]
    fn user_id_round_trips_through_display() {
        let id = UserId::random();
        let reparsed = UserId::new(id.to_string()).expect("round trip");
        assert_eq!(id, reparsed);
    }

    #[rstest]
    fn username_trims_and_rejects_empty() {
        let name = Username::new("  ada  ").expect("valid username");
        assert_eq!(name.as_ref(), "ada");
        assert_eq!(Username::new("   "), Err(UserValidationError::EmptyUsername));
    }

    #[rstest]
    fn guest_username_is_deterministic_for_an_id() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id");
        let name = Username::for_guest(&id);
        assert_eq!(name.as_ref(), "guest_3fa85f6457174562b3fc2c963f66afa6");
        assert_eq!(name, Username::for_guest(&id));
    }

    #[rstest]
    #[case::plain("reader@example.com", true)]
    #[case::subdomain("a.b@news.example.co.jp", true)]
    #[case::missing_at("example.com", false)]
    #[case::missing_tld("reader@example", false)]
    #[case::spaces("rea der@example.com", false)]
    fn email_shape_check(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(email_has_valid_shape(input), expected);
    }
}
