//! Category catalogue and per-user preference types.
//!
//! System categories are owned by the platform and immutable here; what
//! varies per user is visibility and display order, plus a small set of
//! user-private custom categories.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Maximum number of custom categories a single user may hold.
pub const CUSTOM_CATEGORY_LIMIT: usize = 10;

/// Identifier of a system category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct CategoryId(i64);

impl CategoryId {
    /// Wrap a raw store identifier.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw store identifier.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user-private custom category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CustomCategoryId(i64);

impl CustomCategoryId {
    /// Wrap a raw store identifier.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw store identifier.
    pub fn get(self) -> i64 {
        self.0
    }
}

/// System category record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    /// Default categories are copied into every new user's preferences.
    pub is_default: bool,
}

/// Per-user visibility and ordering for one system category.
///
/// `display_order` is a UI ordering hint only; it need not be contiguous
/// or unique across a user's preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPreference {
    pub is_visible: bool,
    pub display_order: i32,
}

/// A system category joined with the requesting user's preference row.
///
/// `preference` is `None` when the user has no row for this category yet
/// (the legacy LEFT JOIN shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWithPreference {
    pub category: Category,
    pub preference: Option<CategoryPreference>,
}

impl CategoryWithPreference {
    /// Legacy listing order: display_order ascending with missing
    /// preferences first, ties broken by category name.
    pub fn listing_order(&self, other: &Self) -> Ordering {
        let mine = self.preference.map(|p| p.display_order);
        let theirs = other.preference.map(|p| p.display_order);
        match (mine, theirs) {
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (lhs, rhs) => lhs
                .cmp(&rhs)
                .then_with(|| self.category.name.cmp(&other.category.name)),
        }
    }
}

/// User-private category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCategory {
    pub id: CustomCategoryId,
    pub user_id: UserId,
    pub name: String,
    pub display_order: i32,
}

/// The two category lists the preference endpoints return together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryListing {
    pub categories: Vec<CategoryWithPreference>,
    pub custom_categories: Vec<CustomCategory>,
}
