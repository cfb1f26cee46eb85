//! View-history data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ArticleId;

/// Default number of entries returned by the history listing.
pub const DEFAULT_HISTORY_LIMIT: i64 = 10;

/// One view-history entry joined against current article data.
///
/// Entries whose article has since been deleted are simply absent from
/// the join, never reported as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub article_id: ArticleId,
    pub title: String,
    pub url: String,
    pub source_site: String,
    pub thumbnail_url: String,
    pub viewed_at: DateTime<Utc>,
}
