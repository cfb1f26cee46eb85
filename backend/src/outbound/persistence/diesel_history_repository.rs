//! PostgreSQL-backed `HistoryRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{HistoryRepository, HistoryRepositoryError};
use crate::domain::{ArticleId, CategoryId, HistoryEntry, StoreAvailability, UserId};

use super::diesel_helpers::{describe_diesel_error, table_present};
use super::models::NewHistoryRow;
use super::pool::{DbPool, PoolError};
use super::schema::{article_categories, articles, user_article_history};

/// Diesel-backed implementation of the `HistoryRepository` port.
#[derive(Clone)]
pub struct DieselHistoryRepository {
    pool: DbPool,
}

impl DieselHistoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> HistoryRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            HistoryRepositoryError::unavailable(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> HistoryRepositoryError {
    HistoryRepositoryError::query(describe_diesel_error(&error))
}

#[async_trait]
impl HistoryRepository for DieselHistoryRepository {
    async fn availability(&self) -> Result<StoreAvailability, HistoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let present = table_present(&mut conn, "user_article_history")
            .await
            .map_err(map_diesel_error)?;
        Ok(if present {
            StoreAvailability::Provisioned
        } else {
            StoreAvailability::Unprovisioned
        })
    }

    async fn upsert_view(
        &self,
        user: &UserId,
        article: ArticleId,
        at: DateTime<Utc>,
    ) -> Result<(), HistoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // One statement keeps rapid repeat views idempotent: the unique
        // (user, article) pair ends with the freshest timestamp.
        diesel::insert_into(user_article_history::table)
            .values(&NewHistoryRow {
                user_id: *user.as_uuid(),
                article_id: article.get(),
                viewed_at: at,
            })
            .on_conflict((
                user_article_history::user_id,
                user_article_history::article_id,
            ))
            .do_update()
            .set(user_article_history::viewed_at.eq(at))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn recent_category_views(
        &self,
        user: &UserId,
        scan_limit: i64,
    ) -> Result<Vec<CategoryId>, HistoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<i64> = user_article_history::table
            .inner_join(
                article_categories::table
                    .on(article_categories::article_id.eq(user_article_history::article_id)),
            )
            .filter(user_article_history::user_id.eq(user.as_uuid()))
            .order(user_article_history::viewed_at.desc())
            .limit(scan_limit)
            .select(article_categories::category_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(CategoryId::new).collect())
    }

    async fn recent_views(
        &self,
        user: &UserId,
        limit: i64,
    ) -> Result<Vec<HistoryEntry>, HistoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Inner join drops entries whose article has been deleted.
        let rows: Vec<(i64, String, String, String, String, DateTime<Utc>)> =
            user_article_history::table
                .inner_join(articles::table)
                .filter(user_article_history::user_id.eq(user.as_uuid()))
                .order(user_article_history::viewed_at.desc())
                .limit(limit)
                .select((
                    articles::id,
                    articles::title,
                    articles::url,
                    articles::source_site,
                    articles::thumbnail_url,
                    user_article_history::viewed_at,
                ))
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(
                |(id, title, url, source_site, thumbnail_url, viewed_at)| HistoryEntry {
                    article_id: ArticleId::new(id),
                    title,
                    url,
                    source_site,
                    thumbnail_url,
                    viewed_at,
                },
            )
            .collect())
    }
}
