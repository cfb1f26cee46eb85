//! Driving port for category preference mutations.

use async_trait::async_trait;

use crate::domain::{CategoryId, CustomCategory, Error, UserId};

/// One visibility/order upsert for a (user, category) pair.
///
/// `display_order` is applied verbatim when present; when omitted it
/// defaults to 0 on insert and is left untouched on update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetVisibilityRequest {
    pub category: CategoryId,
    pub is_visible: bool,
    pub display_order: Option<i32>,
}

/// Driving port for preference writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreferenceCommand: Send + Sync {
    /// Upsert one preference row. Last write wins under concurrency.
    async fn set_visibility(
        &self,
        user: &UserId,
        request: SetVisibilityRequest,
    ) -> Result<(), Error>;

    /// Create a user-private category, enforcing the per-user quota and
    /// exact-name uniqueness.
    async fn add_custom_category(
        &self,
        user: &UserId,
        name: &str,
    ) -> Result<CustomCategory, Error>;
}
