//! Port for view-history persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ArticleId, CategoryId, HistoryEntry, StoreAvailability, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by history repository adapters.
    pub enum HistoryRepositoryError {
        /// Store unreachable or schema not provisioned.
        Unavailable { message: String } =>
            "history store unavailable: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "history store query failed: {message}",
    }
}

/// Port for view-history storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Whether the history schema is provisioned.
    async fn availability(&self) -> Result<StoreAvailability, HistoryRepositoryError>;

    /// Upsert a (user, article) view at the given instant. Repeat views
    /// refresh the timestamp instead of inserting a second row.
    async fn upsert_view(
        &self,
        user: &UserId,
        article: ArticleId,
        at: DateTime<Utc>,
    ) -> Result<(), HistoryRepositoryError>;

    /// Category ids attached to the user's most recent views, most recent
    /// first, bounded by `scan_limit` view rows. Duplicates are preserved;
    /// the interest inferencer dedups.
    async fn recent_category_views(
        &self,
        user: &UserId,
        scan_limit: i64,
    ) -> Result<Vec<CategoryId>, HistoryRepositoryError>;

    /// The user's most recent views joined against current article data,
    /// `viewed_at` descending. Views of deleted articles drop out of the
    /// join.
    async fn recent_views(
        &self,
        user: &UserId,
        limit: i64,
    ) -> Result<Vec<HistoryEntry>, HistoryRepositoryError>;
}

/// Fixture implementation representing an unprovisioned history store.
///
/// Recording degrades to a successful no-op (article browsing must not
/// fail over missing optional infrastructure); reads come back empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureHistoryRepository;

#[async_trait]
impl HistoryRepository for FixtureHistoryRepository {
    async fn availability(&self) -> Result<StoreAvailability, HistoryRepositoryError> {
        Ok(StoreAvailability::Unprovisioned)
    }

    async fn upsert_view(
        &self,
        _user: &UserId,
        _article: ArticleId,
        _at: DateTime<Utc>,
    ) -> Result<(), HistoryRepositoryError> {
        Ok(())
    }

    async fn recent_category_views(
        &self,
        _user: &UserId,
        _scan_limit: i64,
    ) -> Result<Vec<CategoryId>, HistoryRepositoryError> {
        Ok(Vec::new())
    }

    async fn recent_views(
        &self,
        _user: &UserId,
        _limit: i64,
    ) -> Result<Vec<HistoryEntry>, HistoryRepositoryError> {
        Ok(Vec::new())
    }
}
