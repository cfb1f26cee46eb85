//! Port for category catalogue and per-user preference persistence.

use async_trait::async_trait;

use crate::domain::{
    CategoryId, CategoryWithPreference, CustomCategory, StoreAvailability, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by category repository adapters.
    pub enum CategoryRepositoryError {
        /// Store unreachable or schema not provisioned.
        Unavailable { message: String } =>
            "category store unavailable: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "category store query failed: {message}",
    }
}

/// Port for category catalogue reads and preference writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Whether the category schema is provisioned.
    async fn availability(&self) -> Result<StoreAvailability, CategoryRepositoryError>;

    /// All system categories LEFT JOINed with the user's preference rows,
    /// in legacy listing order (display_order ascending, missing rows
    /// first, name tie-break).
    async fn categories_with_preferences(
        &self,
        user: &UserId,
    ) -> Result<Vec<CategoryWithPreference>, CategoryRepositoryError>;

    /// The user's custom categories ordered by display_order ascending.
    async fn custom_categories(
        &self,
        user: &UserId,
    ) -> Result<Vec<CustomCategory>, CategoryRepositoryError>;

    /// Upsert one preference row as a single logical unit.
    ///
    /// On insert a missing `display_order` defaults to 0; on update it is
    /// only overwritten when explicitly provided. Concurrent writers for
    /// the same (user, category) resolve last-write-wins.
    async fn upsert_preference(
        &self,
        user: &UserId,
        category: CategoryId,
        is_visible: bool,
        display_order: Option<i32>,
    ) -> Result<(), CategoryRepositoryError>;

    /// Number of custom categories the user currently holds.
    async fn count_custom(&self, user: &UserId) -> Result<i64, CategoryRepositoryError>;

    /// Whether the user already has a custom category with this exact
    /// name (case-sensitive).
    async fn custom_name_exists(
        &self,
        user: &UserId,
        name: &str,
    ) -> Result<bool, CategoryRepositoryError>;

    /// Insert a custom category and return the stored record.
    async fn insert_custom(
        &self,
        user: &UserId,
        name: &str,
        display_order: i32,
    ) -> Result<CustomCategory, CategoryRepositoryError>;
}

/// Fixture implementation representing an unprovisioned category store.
///
/// Reads report [`StoreAvailability::Unprovisioned`] so callers fall back
/// to placeholder listings; writes fail as unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCategoryRepository;

#[async_trait]
impl CategoryRepository for FixtureCategoryRepository {
    async fn availability(&self) -> Result<StoreAvailability, CategoryRepositoryError> {
        Ok(StoreAvailability::Unprovisioned)
    }

    async fn categories_with_preferences(
        &self,
        _user: &UserId,
    ) -> Result<Vec<CategoryWithPreference>, CategoryRepositoryError> {
        Ok(Vec::new())
    }

    async fn custom_categories(
        &self,
        _user: &UserId,
    ) -> Result<Vec<CustomCategory>, CategoryRepositoryError> {
        Ok(Vec::new())
    }

    async fn upsert_preference(
        &self,
        _user: &UserId,
        _category: CategoryId,
        _is_visible: bool,
        _display_order: Option<i32>,
    ) -> Result<(), CategoryRepositoryError> {
        Err(CategoryRepositoryError::unavailable(
            "category store not provisioned",
        ))
    }

    async fn count_custom(&self, _user: &UserId) -> Result<i64, CategoryRepositoryError> {
        Ok(0)
    }

    async fn custom_name_exists(
        &self,
        _user: &UserId,
        _name: &str,
    ) -> Result<bool, CategoryRepositoryError> {
        Ok(false)
    }

    async fn insert_custom(
        &self,
        _user: &UserId,
        _name: &str,
        _display_order: i32,
    ) -> Result<CustomCategory, CategoryRepositoryError> {
        Err(CategoryRepositoryError::unavailable(
            "category store not provisioned",
        ))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_reports_unprovisioned_reads_and_failing_writes() {
        let repo = FixtureCategoryRepository;
        let user = UserId::random();

        let availability = repo.availability().await.expect("availability");
        assert_eq!(availability, StoreAvailability::Unprovisioned);

        let err = repo
            .upsert_preference(&user, CategoryId::new(1), true, None)
            .await
            .expect_err("writes need a provisioned store");
        assert!(matches!(err, CategoryRepositoryError::Unavailable { .. }));
    }
}
