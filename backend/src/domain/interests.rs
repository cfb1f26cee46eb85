//! Interest inference from the view-history tail.
//!
//! The top feed is biased toward categories the user viewed recently. The
//! signal is deliberately small: a handful of distinct category ids, most
//! recent first, derived purely from view history. An empty result means
//! "no bias" and callers fall back to the unfiltered feed.

use std::sync::Arc;

use tracing::warn;

use crate::domain::ports::{HistoryRepository, HistoryRepositoryError};
use crate::domain::{CategoryId, UserId};

/// Maximum number of inferred interest categories.
pub const INTEREST_LIMIT: usize = 5;

/// Number of view rows scanned when deriving interests.
const INTEREST_SCAN_LIMIT: i64 = 50;

/// Derives recently-relevant categories from a user's view history.
#[derive(Clone)]
pub struct InterestInferencer<H> {
    history: Arc<H>,
}

impl<H> InterestInferencer<H> {
    /// Create an inferencer over the given history store.
    pub fn new(history: Arc<H>) -> Self {
        Self { history }
    }
}

impl<H> InterestInferencer<H>
where
    H: HistoryRepository,
{
    /// Up to [`INTEREST_LIMIT`] distinct category ids, ordered by most
    /// recent view first.
    ///
    /// Inference is a best-effort read bias: store failures degrade to an
    /// empty list rather than failing the feed request.
    pub async fn infer(&self, user: &UserId) -> Vec<CategoryId> {
        let recent = match self
            .history
            .recent_category_views(user, INTEREST_SCAN_LIMIT)
            .await
        {
            Ok(recent) => recent,
            Err(HistoryRepositoryError::Unavailable { .. }) => return Vec::new(),
            Err(error) => {
                warn!(user = %user, %error, "interest inference failed, serving unbiased feed");
                return Vec::new();
            }
        };

        let mut interests: Vec<CategoryId> = Vec::with_capacity(INTEREST_LIMIT);
        for category in recent {
            if !interests.contains(&category) {
                interests.push(category);
                if interests.len() == INTEREST_LIMIT {
                    break;
                }
            }
        }
        interests
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{FixtureHistoryRepository, MockHistoryRepository};
    use rstest::rstest;

    fn ids(raw: &[i64]) -> Vec<CategoryId> {
        raw.iter().copied().map(CategoryId::new).collect()
    }

    #[rstest]
    #[tokio::test]
    async fn dedups_preserving_most_recent_first_order() {
        let mut history = MockHistoryRepository::new();
        // Three views of A then one of B arrive newest-first as [B, A, A, A].
        history
            .expect_recent_category_views()
            .return_once(|_, _| Ok(ids(&[2, 1, 1, 1])));

        let inferencer = InterestInferencer::new(Arc::new(history));
        let interests = inferencer.infer(&UserId::random()).await;
        assert_eq!(interests, ids(&[2, 1]));
    }

    #[rstest]
    #[tokio::test]
    async fn truncates_to_the_interest_limit() {
        let mut history = MockHistoryRepository::new();
        history
            .expect_recent_category_views()
            .return_once(|_, _| Ok(ids(&[9, 8, 7, 6, 5, 4, 3])));

        let inferencer = InterestInferencer::new(Arc::new(history));
        let interests = inferencer.infer(&UserId::random()).await;
        assert_eq!(interests.len(), INTEREST_LIMIT);
        assert_eq!(interests, ids(&[9, 8, 7, 6, 5]));
    }

    #[rstest]
    #[tokio::test]
    async fn empty_history_means_no_bias() {
        let inferencer = InterestInferencer::new(Arc::new(FixtureHistoryRepository));
        assert!(inferencer.infer(&UserId::random()).await.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn store_failures_degrade_to_no_bias() {
        let mut history = MockHistoryRepository::new();
        history
            .expect_recent_category_views()
            .return_once(|_, _| Err(HistoryRepositoryError::query("join exploded")));

        let inferencer = InterestInferencer::new(Arc::new(history));
        assert!(inferencer.infer(&UserId::random()).await.is_empty());
    }
}
