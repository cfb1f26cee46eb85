//! Driving port for paginated feed reads.

use async_trait::async_trait;

use crate::domain::{Error, FeedPage, FeedRequest, UserId};

/// Driving port the HTTP adapter calls for article listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedQuery: Send + Sync {
    /// Compose filter predicates for the request, count the matches, and
    /// return one page ordered by the fixed popularity-then-recency rule.
    async fn feed(&self, user: &UserId, request: FeedRequest) -> Result<FeedPage, Error>;
}
