//! Article feed HTTP handler.
//!
//! ```text
//! GET /api/v1/articles?category_id=3&for_top_page=1&limit=60&offset=0
//! ```

use actix_web::{HttpRequest, HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Article, CategoryId, FeedRequest, PageWindow};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guest::apply_directive;
use crate::inbound::http::identity::resolve_identity;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{coerced_i64, lenient_flag, lenient_i64};

/// Raw query parameters for the feed listing.
///
/// Every field deserializes as a string so malformed input coerces to an
/// absent value instead of rejecting the request (legacy parity).
#[derive(Debug, Deserialize)]
pub struct ArticlesQuery {
    category_id: Option<String>,
    for_top_page: Option<String>,
    limit: Option<String>,
    offset: Option<String>,
}

/// One article as served in a feed page.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ArticleDto {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: String,
    pub thumbnail_url: String,
    pub source_site: String,
    pub bookmark_count: i64,
    pub published_at: String,
    pub categories: Vec<ArticleCategoryDto>,
}

/// Category reference attached to a feed article.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ArticleCategoryDto {
    pub id: i64,
    pub name: String,
}

impl From<Article> for ArticleDto {
    fn from(article: Article) -> Self {
        Self {
            id: article.id.get(),
            title: article.title,
            url: article.url,
            description: article.description,
            thumbnail_url: article.thumbnail_url,
            source_site: article.source_site,
            bookmark_count: article.bookmark_count,
            published_at: article.published_at.to_rfc3339(),
            categories: article
                .categories
                .into_iter()
                .map(|category| ArticleCategoryDto {
                    id: category.id.get(),
                    name: category.name,
                })
                .collect(),
        }
    }
}

/// Feed page response envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedResponse {
    pub success: bool,
    pub articles: Vec<ArticleDto>,
    pub total_count: i64,
    pub has_more: bool,
}

fn parse_feed_request(query: &ArticlesQuery) -> FeedRequest {
    // A zero category id is falsy in the legacy dispatcher: no filter.
    let category = lenient_i64(query.category_id.as_deref())
        .filter(|id| *id != 0)
        .map(CategoryId::new);
    FeedRequest {
        category,
        for_top_page: lenient_flag(query.for_top_page.as_deref()),
        // Supplied-but-malformed limit/offset coerce to 0; only absence
        // falls back to the defaults.
        window: PageWindow::new(
            coerced_i64(query.limit.as_deref()),
            coerced_i64(query.offset.as_deref()),
        ),
    }
}

/// Fetch one page of the article feed.
#[utoipa::path(
    get,
    path = "/api/v1/articles",
    params(
        ("category_id" = Option<i64>, Query, description = "Restrict to one category"),
        ("for_top_page" = Option<bool>, Query, description = "Bias by inferred interests"),
        ("limit" = Option<i64>, Query, description = "Page size, default 60"),
        ("offset" = Option<i64>, Query, description = "Leading rows to skip")
    ),
    responses(
        (status = 200, description = "Feed page", body = FeedResponse),
        (status = 500, description = "Internal server error")
    ),
    tags = ["articles"],
    operation_id = "getArticles"
)]
#[get("/articles")]
pub async fn get_articles(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    query: web::Query<ArticlesQuery>,
) -> ApiResult<HttpResponse> {
    let resolution = resolve_identity(&state, &session, &request).await?;
    let feed_request = parse_feed_request(&query);
    let page = state.feed.feed(&resolution.user_id, feed_request).await?;

    let mut builder = HttpResponse::Ok();
    apply_directive(&mut builder, resolution.cookie);
    Ok(builder.json(FeedResponse {
        success: true,
        articles: page.articles.into_iter().map(ArticleDto::from).collect(),
        total_count: page.total_count,
        has_more: page.has_more,
    }))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn query(
        category_id: Option<&str>,
        for_top_page: Option<&str>,
        limit: Option<&str>,
        offset: Option<&str>,
    ) -> ArticlesQuery {
        ArticlesQuery {
            category_id: category_id.map(str::to_owned),
            for_top_page: for_top_page.map(str::to_owned),
            limit: limit.map(str::to_owned),
            offset: offset.map(str::to_owned),
        }
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_supplied() {
        let request = parse_feed_request(&query(None, None, None, None));
        assert_eq!(request.category, None);
        assert!(!request.for_top_page);
        assert_eq!(request.window.limit(), 60);
        assert_eq!(request.window.offset(), 0);
    }

    #[rstest]
    fn malformed_numbers_coerce_instead_of_failing() {
        let request = parse_feed_request(&query(Some("abc"), Some("1"), Some("-5"), Some("x")));
        assert_eq!(request.category, None);
        assert!(request.for_top_page);
        assert_eq!(request.window.limit(), 0);
        assert_eq!(request.window.offset(), 0);
    }

    #[rstest]
    fn zero_category_means_no_filter() {
        let request = parse_feed_request(&query(Some("0"), None, None, None));
        assert_eq!(request.category, None);
        let request = parse_feed_request(&query(Some("3"), None, None, None));
        assert_eq!(request.category, Some(CategoryId::new(3)));
    }
}
