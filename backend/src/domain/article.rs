//! Article data model.
//!
//! Articles are ingested elsewhere; this core treats the article store as
//! pre-populated and immutable, reading popularity (`bookmark_count`) and
//! recency (`published_at`) for the fixed feed ranking rule.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::CategoryId;

/// Identifier of an article in the persistence store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ArticleId(i64);

impl ArticleId {
    /// Wrap a raw store identifier.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw store identifier.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lightweight category reference attached to feed articles (id + name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
}

/// Article record as served in a feed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub url: String,
    pub description: String,
    pub thumbnail_url: String,
    pub source_site: String,
    pub bookmark_count: i64,
    pub published_at: DateTime<Utc>,
    /// Full category list for the article, unordered.
    pub categories: Vec<CategoryRef>,
}

impl Article {
    /// Fixed feed ranking key: popularity first, then recency.
    ///
    /// Sorting by this key descending yields the feed order
    /// (`bookmark_count DESC, published_at DESC`).
    pub fn ranking_key(&self) -> (i64, DateTime<Utc>) {
        (self.bookmark_count, self.published_at)
    }
}
