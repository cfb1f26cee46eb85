//! Driving ports for view-history writes and reads.

use async_trait::async_trait;

use crate::domain::{ArticleId, Error, HistoryEntry, UserId};

/// Driving port recording article views.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryCommand: Send + Sync {
    /// Upsert the (user, article) view timestamp. Safe to repeat; the end
    /// state is one row carrying the freshest time. Succeeds as a no-op
    /// when the history store is not provisioned.
    async fn record_view(&self, user: &UserId, article: ArticleId) -> Result<(), Error>;
}

/// Driving port listing a user's recent views.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryQuery: Send + Sync {
    /// Most recent views joined against current article data, newest
    /// first. Entries whose article has been deleted are absent.
    async fn history(&self, user: &UserId, limit: Option<i64>)
    -> Result<Vec<HistoryEntry>, Error>;
}
