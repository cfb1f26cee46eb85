//! Feed query planning service.
//!
//! Composes filter predicates from the explicit category filter and the
//! inferred-interest bias, computes the total match count, and fetches one
//! page in the fixed ranking order. Storage adapters compile the predicate
//! value into parameterized queries; this service never sees query text.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{
    ArticleRepository, ArticleRepositoryError, FeedQuery, HistoryRepository,
};
use crate::domain::{
    ArticleFilter, Error, FeedPage, FeedRequest, InterestInferencer, StoreAvailability, UserId,
    sample_feed,
};

/// Feed planner implementing the [`FeedQuery`] driving port.
#[derive(Clone)]
pub struct FeedService<A, H> {
    articles: Arc<A>,
    interests: InterestInferencer<H>,
}

impl<A, H> FeedService<A, H> {
    /// Create a planner over the given article store and interest source.
    pub fn new(articles: Arc<A>, interests: InterestInferencer<H>) -> Self {
        Self {
            articles,
            interests,
        }
    }
}

fn map_article_error(error: ArticleRepositoryError) -> Error {
    match error {
        ArticleRepositoryError::Unavailable { message } => Error::store_unavailable(message),
        ArticleRepositoryError::Query { message } => {
            Error::internal(format!("article query failed: {message}"))
        }
    }
}

impl<A, H> FeedService<A, H>
where
    A: ArticleRepository,
    H: HistoryRepository,
{
    async fn build_filter(&self, user: &UserId, request: &FeedRequest) -> ArticleFilter {
        let mut predicates = Vec::new();
        if let Some(category) = request.category {
            predicates.push(ArticleFilter::ByCategory(category));
        }
        if request.for_top_page {
            let interests = self.interests.infer(user).await;
            if !interests.is_empty() {
                debug!(user = %user, count = interests.len(), "biasing top feed by inferred interests");
                predicates.push(ArticleFilter::ByAnyCategory(interests));
            }
        }
        ArticleFilter::and(predicates)
    }

    async fn fetch_page(
        &self,
        filter: &ArticleFilter,
        request: &FeedRequest,
    ) -> Result<FeedPage, Error> {
        let total_count = self
            .articles
            .count_matching(filter)
            .await
            .map_err(map_article_error)?;
        let mut articles = self
            .articles
            .page_matching(filter, request.window)
            .await
            .map_err(map_article_error)?;

        let ids: Vec<_> = articles.iter().map(|article| article.id).collect();
        let mut categories = self
            .articles
            .categories_for(&ids)
            .await
            .map_err(map_article_error)?;
        for article in &mut articles {
            article.categories = categories.remove(&article.id).unwrap_or_default();
        }

        Ok(FeedPage::close(articles, total_count, request.window))
    }
}

#[async_trait]
impl<A, H> FeedQuery for FeedService<A, H>
where
    A: ArticleRepository,
    H: HistoryRepository,
{
    async fn feed(&self, user: &UserId, request: FeedRequest) -> Result<FeedPage, Error> {
        // One availability probe per request; the placeholder keeps read
        // paths serving when the schema is absent or unreachable.
        match self.articles.availability().await {
            Ok(StoreAvailability::Provisioned) => {}
            Ok(StoreAvailability::Unprovisioned) => {
                return Ok(sample_feed::placeholder_page(request.window));
            }
            Err(error) => {
                warn!(%error, "article store unreachable, serving placeholder feed");
                return Ok(sample_feed::placeholder_page(request.window));
            }
        }

        let filter = self.build_filter(user, &request).await;
        self.fetch_page(&filter, &request).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{FixtureHistoryRepository, MockArticleRepository};
    use crate::domain::{Article, ArticleId, CategoryId, PageWindow, sample_feed::PLACEHOLDER_TOTAL};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use std::collections::HashMap;

    fn article(id: i64, bookmark_count: i64) -> Article {
        Article {
            id: ArticleId::new(id),
            title: format!("Article {id}"),
            url: format!("https://news.example.com/articles/{id}"),
            description: String::new(),
            thumbnail_url: String::new(),
            source_site: "Example Wire".to_owned(),
            bookmark_count,
            published_at: Utc
                .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
                .single()
                .expect("valid timestamp"),
            categories: Vec::new(),
        }
    }

    fn service(
        articles: MockArticleRepository,
    ) -> FeedService<MockArticleRepository, FixtureHistoryRepository> {
        FeedService::new(
            Arc::new(articles),
            InterestInferencer::new(Arc::new(FixtureHistoryRepository)),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn unprovisioned_store_serves_the_placeholder_batch() {
        let mut articles = MockArticleRepository::new();
        articles
            .expect_availability()
            .return_once(|| Ok(StoreAvailability::Unprovisioned));
        articles.expect_count_matching().times(0);

        let request = FeedRequest {
            window: PageWindow::new(Some(60), Some(0)),
            ..FeedRequest::default()
        };
        let page = service(articles)
            .feed(&UserId::random(), request)
            .await
            .expect("placeholder page");
        assert_eq!(page.total_count, PLACEHOLDER_TOTAL);
        assert!(page.has_more);
        assert_eq!(page.articles.len(), 20);
    }

    #[rstest]
    #[tokio::test]
    async fn explicit_category_becomes_a_single_predicate() {
        let mut articles = MockArticleRepository::new();
        articles
            .expect_availability()
            .return_once(|| Ok(StoreAvailability::Provisioned));
        articles
            .expect_count_matching()
            .withf(|filter| *filter == ArticleFilter::ByCategory(CategoryId::new(3)))
            .return_once(|_| Ok(1));
        articles
            .expect_page_matching()
            .return_once(|_, _| Ok(vec![article(7, 10)]));
        articles
            .expect_categories_for()
            .return_once(|_| Ok(HashMap::new()));

        let request = FeedRequest {
            category: Some(CategoryId::new(3)),
            ..FeedRequest::default()
        };
        let page = service(articles)
            .feed(&UserId::random(), request)
            .await
            .expect("feed page");
        assert_eq!(page.total_count, 1);
        assert!(!page.has_more);
    }

    #[rstest]
    #[tokio::test]
    async fn has_more_reflects_the_window_and_total() {
        let mut articles = MockArticleRepository::new();
        articles
            .expect_availability()
            .return_once(|| Ok(StoreAvailability::Provisioned));
        articles.expect_count_matching().return_once(|_| Ok(5));
        articles
            .expect_page_matching()
            .return_once(|_, _| Ok(vec![article(1, 3), article(2, 2)]));
        articles
            .expect_categories_for()
            .return_once(|_| Ok(HashMap::new()));

        let request = FeedRequest {
            window: PageWindow::new(Some(2), Some(0)),
            ..FeedRequest::default()
        };
        let page = service(articles)
            .feed(&UserId::random(), request)
            .await
            .expect("feed page");
        assert!(page.has_more);
        assert_eq!(page.total_count, 5);
    }

    #[rstest]
    #[tokio::test]
    async fn category_lists_are_attached_to_returned_articles() {
        let mut articles = MockArticleRepository::new();
        articles
            .expect_availability()
            .return_once(|| Ok(StoreAvailability::Provisioned));
        articles.expect_count_matching().return_once(|_| Ok(1));
        articles
            .expect_page_matching()
            .return_once(|_, _| Ok(vec![article(7, 10)]));
        articles.expect_categories_for().return_once(|_| {
            let mut map = HashMap::new();
            map.insert(
                ArticleId::new(7),
                vec![crate::domain::CategoryRef {
                    id: CategoryId::new(2),
                    name: "Technology".to_owned(),
                }],
            );
            Ok(map)
        });

        let page = service(articles)
            .feed(&UserId::random(), FeedRequest::default())
            .await
            .expect("feed page");
        assert_eq!(page.articles[0].categories.len(), 1);
        assert_eq!(page.articles[0].categories[0].name, "Technology");
    }
}
