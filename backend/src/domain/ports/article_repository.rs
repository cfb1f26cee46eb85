//! Port for article catalogue reads.
//!
//! The feed planner hands adapters an [`ArticleFilter`] value; compiling
//! it into a parameterized query is the adapter's job. Caller-controlled
//! input never reaches query text directly.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{Article, ArticleFilter, ArticleId, CategoryRef, PageWindow, StoreAvailability};

use super::define_port_error;

define_port_error! {
    /// Errors raised by article repository adapters.
    pub enum ArticleRepositoryError {
        /// Store unreachable or schema not provisioned.
        Unavailable { message: String } =>
            "article store unavailable: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "article store query failed: {message}",
    }
}

/// Port for article catalogue reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Whether the article schema is provisioned.
    async fn availability(&self) -> Result<StoreAvailability, ArticleRepositoryError>;

    /// Count articles matching the filter.
    async fn count_matching(&self, filter: &ArticleFilter)
    -> Result<i64, ArticleRepositoryError>;

    /// Fetch one page of matching articles ordered by the fixed ranking
    /// rule (`bookmark_count DESC, published_at DESC`), without category
    /// lists attached.
    async fn page_matching(
        &self,
        filter: &ArticleFilter,
        window: PageWindow,
    ) -> Result<Vec<Article>, ArticleRepositoryError>;

    /// Resolve the full category list for each listed article.
    async fn categories_for(
        &self,
        articles: &[ArticleId],
    ) -> Result<HashMap<ArticleId, Vec<CategoryRef>>, ArticleRepositoryError>;
}

/// Fixture implementation representing an unprovisioned article store.
///
/// The feed planner reacts to [`StoreAvailability::Unprovisioned`] by
/// serving the deterministic placeholder batch, so the data methods here
/// are never reached in that flow and return empty results.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureArticleRepository;

#[async_trait]
impl ArticleRepository for FixtureArticleRepository {
    async fn availability(&self) -> Result<StoreAvailability, ArticleRepositoryError> {
        Ok(StoreAvailability::Unprovisioned)
    }

    async fn count_matching(
        &self,
        _filter: &ArticleFilter,
    ) -> Result<i64, ArticleRepositoryError> {
        Ok(0)
    }

    async fn page_matching(
        &self,
        _filter: &ArticleFilter,
        _window: PageWindow,
    ) -> Result<Vec<Article>, ArticleRepositoryError> {
        Ok(Vec::new())
    }

    async fn categories_for(
        &self,
        _articles: &[ArticleId],
    ) -> Result<HashMap<ArticleId, Vec<CategoryRef>>, ArticleRepositoryError> {
        Ok(HashMap::new())
    }
}
