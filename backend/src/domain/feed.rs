//! Feed request and pagination primitives.
//!
//! The feed is paginated with a plain limit/offset window and filtered by
//! a composable predicate value. Storage adapters compile
//! [`ArticleFilter`] into parameterized queries; the domain never builds
//! query text.

use serde::{Deserialize, Serialize};

use super::{Article, CategoryId};

/// Default page size when the caller does not supply a limit.
pub const DEFAULT_PAGE_LIMIT: i64 = 60;

/// A clamped limit/offset pagination window.
///
/// ## Invariants
/// - `limit` and `offset` are never negative.
///
/// Legacy parity: malformed or negative input coerces to zero rather than
/// rejecting the request; a missing limit falls back to
/// [`DEFAULT_PAGE_LIMIT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    limit: i64,
    offset: i64,
}

impl PageWindow {
    /// Build a window from raw caller input, clamping negatives to zero.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).max(0),
            offset: offset.unwrap_or(0).max(0),
        }
    }

    /// Page size.
    pub fn limit(self) -> i64 {
        self.limit
    }

    /// Number of leading rows to skip.
    pub fn offset(self) -> i64 {
        self.offset
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Composable article predicate compiled by storage adapters.
///
/// `ByAnyCategory` matches articles carrying an edge to any listed
/// category (an OR across the ids); `And` narrows by requiring every
/// inner predicate. An empty `And` matches everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleFilter {
    /// Article has an edge to exactly this category.
    ByCategory(CategoryId),
    /// Article has an edge to at least one of these categories.
    ByAnyCategory(Vec<CategoryId>),
    /// All inner predicates hold.
    And(Vec<ArticleFilter>),
}

impl ArticleFilter {
    /// The unrestricted filter matching every article.
    pub fn all() -> Self {
        Self::And(Vec::new())
    }

    /// Combine predicates, collapsing the trivial cases.
    pub fn and(mut predicates: Vec<ArticleFilter>) -> Self {
        match predicates.len() {
            1 => predicates.remove(0),
            _ => Self::And(predicates),
        }
    }

    /// Whether the filter matches every article.
    pub fn is_unrestricted(&self) -> bool {
        match self {
            Self::ByCategory(_) => false,
            Self::ByAnyCategory(ids) => ids.is_empty(),
            Self::And(inner) => inner.iter().all(Self::is_unrestricted),
        }
    }
}

/// Parameters of one feed request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedRequest {
    /// Explicit category filter, if any.
    pub category: Option<CategoryId>,
    /// Whether this request renders the top page and should be biased by
    /// inferred interests.
    pub for_top_page: bool,
    /// Pagination window.
    pub window: PageWindow,
}

/// One page of feed results.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage {
    pub articles: Vec<Article>,
    pub total_count: i64,
    pub has_more: bool,
}

impl FeedPage {
    /// Compute `has_more` from the window and the total match count.
    pub fn close(articles: Vec<Article>, total_count: i64, window: PageWindow) -> Self {
        let returned = articles.len() as i64;
        Self {
            articles,
            total_count,
            has_more: window.offset() + returned < total_count,
        }
    }
}
