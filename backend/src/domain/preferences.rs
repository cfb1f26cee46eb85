//! Category preference service.
//!
//! Serves the per-user category listings and applies preference writes:
//! visibility/order upserts plus custom-category creation under the quota
//! and name-uniqueness rules.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{
    CategoryQuery, CategoryRepository, CategoryRepositoryError, PreferenceCommand,
    PreferencesOverview, SetVisibilityRequest, UserRepository, UserRepositoryError,
};
use crate::domain::{
    CUSTOM_CATEGORY_LIMIT, Category, CategoryId, CategoryListing, CategoryPreference,
    CategoryWithPreference, CustomCategory, Error, StoreAvailability, UserId, UserKind, Username,
};

/// Preference service implementing the category driving ports.
#[derive(Clone)]
pub struct PreferenceService<C, U> {
    categories: Arc<C>,
    users: Arc<U>,
}

impl<C, U> PreferenceService<C, U> {
    /// Create a service over the category and user stores.
    pub fn new(categories: Arc<C>, users: Arc<U>) -> Self {
        Self { categories, users }
    }
}

fn map_category_error(error: CategoryRepositoryError) -> Error {
    match error {
        CategoryRepositoryError::Unavailable { message } => Error::store_unavailable(message),
        CategoryRepositoryError::Query { message } => {
            Error::internal(format!("category query failed: {message}"))
        }
    }
}

/// Fixed two-row listing served while the category schema is absent.
fn placeholder_listing() -> CategoryListing {
    let rows = [(1, "General", "general"), (2, "Technology", "technology")];
    let categories = rows
        .into_iter()
        .enumerate()
        .map(|(index, (id, name, slug))| CategoryWithPreference {
            category: Category {
                id: CategoryId::new(id),
                name: name.to_owned(),
                slug: slug.to_owned(),
                is_default: true,
            },
            preference: Some(CategoryPreference {
                is_visible: true,
                display_order: index as i32 + 1,
            }),
        })
        .collect();
    CategoryListing {
        categories,
        custom_categories: Vec::new(),
    }
}

impl<C, U> PreferenceService<C, U>
where
    C: CategoryRepository,
    U: UserRepository,
{
    async fn provisioned(&self) -> Result<bool, Error> {
        match self.categories.availability().await {
            Ok(StoreAvailability::Provisioned) => Ok(true),
            // An unreachable store degrades the same way as an absent one.
            Ok(StoreAvailability::Unprovisioned)
            | Err(CategoryRepositoryError::Unavailable { .. }) => Ok(false),
            Err(error) => Err(map_category_error(error)),
        }
    }

    /// Whether the acting user is a registered account.
    ///
    /// An unreachable user store counts as "guest": the overview must keep
    /// rendering, and disclosing no username is the safe degradation.
    async fn is_registered(&self, user: &UserId) -> bool {
        match self.users.find(user).await {
            Ok(Some(user)) => user.kind == UserKind::Registered,
            Ok(None) => false,
            Err(UserRepositoryError::Unavailable { .. }) => false,
            Err(error) => {
                warn!(user = %user, %error, "user lookup failed, treating session as guest");
                false
            }
        }
    }
}

#[async_trait]
impl<C, U> CategoryQuery for PreferenceService<C, U>
where
    C: CategoryRepository,
    U: UserRepository,
{
    async fn listing(&self, user: &UserId) -> Result<CategoryListing, Error> {
        if !self.provisioned().await? {
            return Ok(placeholder_listing());
        }
        let categories = self
            .categories
            .categories_with_preferences(user)
            .await
            .map_err(map_category_error)?;
        let custom_categories = self
            .categories
            .custom_categories(user)
            .await
            .map_err(map_category_error)?;
        Ok(CategoryListing {
            categories,
            custom_categories,
        })
    }

    async fn overview(
        &self,
        user: &UserId,
        session_username: Option<Username>,
    ) -> Result<PreferencesOverview, Error> {
        let registered = match session_username {
            Some(_) => self.is_registered(user).await,
            None => false,
        };
        let username = if registered {
            session_username.map(String::from).unwrap_or_default()
        } else {
            String::new()
        };
        Ok(PreferencesOverview {
            is_guest: !registered,
            username,
            listing: self.listing(user).await?,
        })
    }
}

#[async_trait]
impl<C, U> PreferenceCommand for PreferenceService<C, U>
where
    C: CategoryRepository,
    U: UserRepository,
{
    async fn set_visibility(
        &self,
        user: &UserId,
        request: SetVisibilityRequest,
    ) -> Result<(), Error> {
        self.categories
            .upsert_preference(user, request.category, request.is_visible, request.display_order)
            .await
            .map_err(map_category_error)
    }

    async fn add_custom_category(
        &self,
        user: &UserId,
        name: &str,
    ) -> Result<CustomCategory, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::empty_name("category name must not be empty"));
        }

        let count = self
            .categories
            .count_custom(user)
            .await
            .map_err(map_category_error)?;
        if count >= CUSTOM_CATEGORY_LIMIT as i64 {
            return Err(Error::quota_exceeded(format!(
                "custom categories are limited to {CUSTOM_CATEGORY_LIMIT}"
            )));
        }

        // Exact-match comparison scoped to the user's own categories.
        let exists = self
            .categories
            .custom_name_exists(user, name)
            .await
            .map_err(map_category_error)?;
        if exists {
            return Err(Error::duplicate_name(format!(
                "a custom category named \"{name}\" already exists"
            )));
        }

        self.categories
            .insert_custom(user, name, count as i32 + 1)
            .await
            .map_err(map_category_error)
    }
}
