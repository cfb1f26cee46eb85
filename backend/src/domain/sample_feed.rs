//! Deterministic placeholder feed for unprovisioned article stores.
//!
//! Client integration must be exercisable before the article schema is
//! provisioned, so the feed planner serves this synthetic batch whenever
//! the store reports [`StoreAvailability::Unprovisioned`]. The batch is a
//! pure function of the requested offset; its response shape matches the
//! real path exactly.
//!
//! The page always reports `has_more = true` and a fixed total. That is
//! legacy fixture behaviour kept on purpose (it keeps infinite-scroll
//! clients paging), not a general contract of [`FeedPage`].
//!
//! [`StoreAvailability::Unprovisioned`]: crate::domain::StoreAvailability::Unprovisioned

use chrono::{Duration, TimeZone, Utc};

use super::{Article, ArticleId, CategoryId, CategoryRef, FeedPage, PageWindow};

/// Number of synthetic articles per placeholder page.
pub const PLACEHOLDER_BATCH: i64 = 20;

/// Fixed sentinel total reported by the placeholder page.
pub const PLACEHOLDER_TOTAL: i64 = 100;

const SOURCES: [&str; 6] = [
    "Daily Wire",
    "Metro Times",
    "The Courier",
    "Signal Post",
    "TechReport",
    "Newsline",
];

const CATEGORIES: [(i64, &str); 5] = [
    (1, "General"),
    (2, "Technology"),
    (3, "Entertainment"),
    (4, "Business"),
    (5, "Sports"),
];

fn category_ref(index: usize) -> CategoryRef {
    let (id, name) = CATEGORIES[index % CATEGORIES.len()];
    CategoryRef {
        id: CategoryId::new(id),
        name: name.to_owned(),
    }
}

fn synthetic_article(id: i64) -> Article {
    // Fixed epoch keeps the batch reproducible across requests and tests.
    let base = Utc
        .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("placeholder epoch is a valid timestamp"));
    let index = id.unsigned_abs() as usize;
    let mut categories = vec![category_ref(index)];
    if id % 3 == 0 {
        categories.push(category_ref(index + 1));
    }
    Article {
        id: ArticleId::new(id),
        title: format!("Sample article #{id}"),
        url: format!("https://example.com/article/{id}"),
        description: format!("Placeholder copy for sample article #{id}."),
        thumbnail_url: String::new(),
        source_site: SOURCES[index % SOURCES.len()].to_owned(),
        bookmark_count: 5 + (id * 37) % 196,
        published_at: base - Duration::hours(id),
        categories,
    }
}

/// Build the placeholder page for a request window.
///
/// Ids shift with the offset so successive pages look like fresh rows.
pub fn placeholder_page(window: PageWindow) -> FeedPage {
    let offset = window.offset();
    let articles = (1..=PLACEHOLDER_BATCH)
        .map(|n| synthetic_article(offset + n))
        .collect();
    FeedPage {
        articles,
        total_count: PLACEHOLDER_TOTAL,
        has_more: true,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn placeholder_page_is_deterministic() {
        let window = PageWindow::new(Some(20), Some(40));
        let first = placeholder_page(window);
        let second = placeholder_page(window);
        assert_eq!(first, second);
    }

    #[rstest]
    fn placeholder_ids_shift_with_the_offset() {
        let page = placeholder_page(PageWindow::new(None, Some(40)));
        assert_eq!(page.articles.len(), PLACEHOLDER_BATCH as usize);
        assert_eq!(page.articles[0].id, ArticleId::new(41));
        assert_eq!(page.articles[19].id, ArticleId::new(60));
    }

    #[rstest]
    fn placeholder_page_always_reports_more() {
        let beyond_total = placeholder_page(PageWindow::new(None, Some(PLACEHOLDER_TOTAL + 1)));
        assert!(beyond_total.has_more);
        assert_eq!(beyond_total.total_count, PLACEHOLDER_TOTAL);
    }

    #[rstest]
    fn every_article_carries_at_least_one_category() {
        let page = placeholder_page(PageWindow::default());
        assert!(page.articles.iter().all(|a| !a.categories.is_empty()));
    }
}
