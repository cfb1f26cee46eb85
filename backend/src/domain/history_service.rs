//! View-history recording and retrieval service.
//!
//! Recording is an upsert keyed on (user, article): repeat views refresh
//! the timestamp instead of duplicating rows. When the history store is
//! not provisioned, recording succeeds as a no-op so article browsing
//! never fails over missing optional infrastructure.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    HistoryCommand, HistoryQuery, HistoryRepository, HistoryRepositoryError,
};
use crate::domain::{ArticleId, DEFAULT_HISTORY_LIMIT, Error, HistoryEntry, StoreAvailability, UserId};

/// History service implementing the command and query driving ports.
#[derive(Clone)]
pub struct HistoryService<H> {
    history: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<H> HistoryService<H> {
    /// Create a service over the given store, stamping views with `clock`.
    pub fn new(history: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self { history, clock }
    }
}

fn map_history_error(error: HistoryRepositoryError) -> Error {
    match error {
        HistoryRepositoryError::Unavailable { message } => Error::store_unavailable(message),
        HistoryRepositoryError::Query { message } => {
            Error::internal(format!("history query failed: {message}"))
        }
    }
}

fn clamp_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(limit) if limit > 0 => limit,
        _ => DEFAULT_HISTORY_LIMIT,
    }
}

impl<H> HistoryService<H>
where
    H: HistoryRepository,
{
    async fn provisioned(&self) -> Result<bool, Error> {
        match self.history.availability().await {
            Ok(StoreAvailability::Provisioned) => Ok(true),
            // An unreachable store degrades the same way as an absent one.
            Ok(StoreAvailability::Unprovisioned)
            | Err(HistoryRepositoryError::Unavailable { .. }) => Ok(false),
            Err(error) => Err(map_history_error(error)),
        }
    }
}

#[async_trait]
impl<H> HistoryCommand for HistoryService<H>
where
    H: HistoryRepository,
{
    async fn record_view(&self, user: &UserId, article: ArticleId) -> Result<(), Error> {
        if !self.provisioned().await? {
            debug!(user = %user, article = %article, "history store absent, view not persisted");
            return Ok(());
        }
        self.history
            .upsert_view(user, article, self.clock.utc())
            .await
            .map_err(map_history_error)
    }
}

#[async_trait]
impl<H> HistoryQuery for HistoryService<H>
where
    H: HistoryRepository,
{
    async fn history(
        &self,
        user: &UserId,
        limit: Option<i64>,
    ) -> Result<Vec<HistoryEntry>, Error> {
        if !self.provisioned().await? {
            return Ok(Vec::new());
        }
        self.history
            .recent_views(user, clamp_limit(limit))
            .await
            .map_err(map_history_error)
    }
}
