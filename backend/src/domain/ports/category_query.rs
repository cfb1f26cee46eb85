//! Driving port for category listings and the preferences overview.

use async_trait::async_trait;

use crate::domain::{CategoryListing, Error, UserId, Username};

/// The preferences overview: the category lists plus a user block.
///
/// `username` is only disclosed for registered sessions; guests see an
/// empty string (legacy payload parity).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferencesOverview {
    pub is_guest: bool,
    pub username: String,
    pub listing: CategoryListing,
}

/// Driving port for per-user category reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryQuery: Send + Sync {
    /// All system categories joined with the user's preference rows, plus
    /// the user's custom categories.
    async fn listing(&self, user: &UserId) -> Result<CategoryListing, Error>;

    /// The listing together with the acting user's guest/registered state.
    ///
    /// `session_username` is the username persisted in a registered
    /// session, if any; it gates username disclosure.
    async fn overview(
        &self,
        user: &UserId,
        session_username: Option<Username>,
    ) -> Result<PreferencesOverview, Error>;
}
