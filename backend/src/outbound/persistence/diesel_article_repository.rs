//! PostgreSQL-backed `ArticleRepository` implementation using Diesel ORM.
//!
//! Compiles the domain's composable [`ArticleFilter`] into parameterized
//! Diesel expressions. Caller-controlled values only ever appear as bind
//! parameters, never in query text.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ArticleRepository, ArticleRepositoryError};
use crate::domain::{
    Article, ArticleFilter, ArticleId, CategoryId, CategoryRef, PageWindow, StoreAvailability,
};

use super::diesel_helpers::{describe_diesel_error, table_present};
use super::models::ArticleRow;
use super::pool::{DbPool, PoolError};
use super::schema::{article_categories, articles, categories};

/// Diesel-backed implementation of the `ArticleRepository` port.
#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
}

impl DieselArticleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ArticleRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ArticleRepositoryError::unavailable(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ArticleRepositoryError {
    ArticleRepositoryError::query(describe_diesel_error(&error))
}

type BoxedCondition = Box<dyn BoxableExpression<articles::table, Pg, SqlType = Bool>>;

fn category_edge(ids: Vec<i64>) -> BoxedCondition {
    let edge = article_categories::table
        .filter(article_categories::category_id.eq_any(ids))
        .select(article_categories::article_id);
    Box::new(articles::id.eq_any(edge))
}

/// Compile a filter into a boxed Diesel condition.
///
/// `None` means unrestricted: the caller omits the WHERE clause entirely.
fn compile_filter(filter: &ArticleFilter) -> Option<BoxedCondition> {
    match filter {
        ArticleFilter::ByCategory(id) => Some(category_edge(vec![id.get()])),
        ArticleFilter::ByAnyCategory(ids) if ids.is_empty() => None,
        // One membership subquery covers the OR across the listed ids.
        ArticleFilter::ByAnyCategory(ids) => {
            Some(category_edge(ids.iter().map(|id| id.get()).collect()))
        }
        ArticleFilter::And(inner) => inner
            .iter()
            .filter_map(compile_filter)
            .reduce(|lhs, rhs| Box::new(lhs.and(rhs)) as BoxedCondition),
    }
}

fn row_to_article(row: ArticleRow) -> Article {
    Article {
        id: ArticleId::new(row.id),
        title: row.title,
        url: row.url,
        description: row.description,
        thumbnail_url: row.thumbnail_url,
        source_site: row.source_site,
        bookmark_count: row.bookmark_count,
        published_at: row.published_at,
        // Category lists are resolved in bulk by `categories_for`.
        categories: Vec::new(),
    }
}

#[async_trait]
impl ArticleRepository for DieselArticleRepository {
    async fn availability(&self) -> Result<StoreAvailability, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let present = table_present(&mut conn, "articles")
            .await
            .map_err(map_diesel_error)?;
        Ok(if present {
            StoreAvailability::Provisioned
        } else {
            StoreAvailability::Unprovisioned
        })
    }

    async fn count_matching(
        &self,
        filter: &ArticleFilter,
    ) -> Result<i64, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = articles::table
            .select(diesel::dsl::count_star())
            .into_boxed();
        if let Some(condition) = compile_filter(filter) {
            query = query.filter(condition);
        }
        query.first(&mut conn).await.map_err(map_diesel_error)
    }

    async fn page_matching(
        &self,
        filter: &ArticleFilter,
        window: PageWindow,
    ) -> Result<Vec<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = articles::table.select(ArticleRow::as_select()).into_boxed();
        if let Some(condition) = compile_filter(filter) {
            query = query.filter(condition);
        }
        let rows: Vec<ArticleRow> = query
            .order((
                articles::bookmark_count.desc(),
                articles::published_at.desc(),
            ))
            .limit(window.limit())
            .offset(window.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_article).collect())
    }

    async fn categories_for(
        &self,
        article_ids: &[ArticleId],
    ) -> Result<HashMap<ArticleId, Vec<CategoryRef>>, ArticleRepositoryError> {
        if article_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let ids: Vec<i64> = article_ids.iter().map(|id| id.get()).collect();
        let rows: Vec<(i64, i64, String)> = article_categories::table
            .inner_join(categories::table)
            .filter(article_categories::article_id.eq_any(ids))
            .select((
                article_categories::article_id,
                categories::id,
                categories::name,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut grouped: HashMap<ArticleId, Vec<CategoryRef>> = HashMap::new();
        for (article_id, category_id, name) in rows {
            grouped
                .entry(ArticleId::new(article_id))
                .or_default()
                .push(CategoryRef {
                    id: CategoryId::new(category_id),
                    name,
                });
        }
        Ok(grouped)
    }
}
