//! View-history HTTP handlers.
//!
//! ```text
//! POST /api/v1/history {"article_id": 42}
//! GET  /api/v1/history?limit=10
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ArticleId, HistoryEntry};
use crate::inbound::http::ApiResult;
use crate::inbound::http::categories::AckResponse;
use crate::inbound::http::guest::apply_directive;
use crate::inbound::http::identity::resolve_identity;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{lenient_i64, missing_field_error};

/// Request payload recording a view.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SaveHistoryRequest {
    pub article_id: Option<i64>,
}

/// Record that the acting user viewed an article.
#[utoipa::path(
    post,
    path = "/api/v1/history",
    request_body = SaveHistoryRequest,
    responses(
        (status = 200, description = "View recorded", body = AckResponse),
        (status = 400, description = "Missing article id")
    ),
    tags = ["history"],
    operation_id = "saveArticleHistory"
)]
#[post("/history")]
pub async fn save_article_history(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    payload: web::Json<SaveHistoryRequest>,
) -> ApiResult<HttpResponse> {
    let resolution = resolve_identity(&state, &session, &request).await?;
    let article_id = payload
        .into_inner()
        .article_id
        .ok_or_else(|| missing_field_error("article_id"))?;

    state
        .history
        .record_view(&resolution.user_id, ArticleId::new(article_id))
        .await?;

    let mut builder = HttpResponse::Ok();
    apply_directive(&mut builder, resolution.cookie);
    Ok(builder.json(AckResponse { success: true }))
}

/// Raw query parameters for the history listing.
#[derive(Debug, Deserialize)]
pub struct HistoryListQuery {
    limit: Option<String>,
}

/// One history entry joined against current article data.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntryDto {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub source_site: String,
    pub thumbnail_url: String,
    pub viewed_at: String,
}

impl From<HistoryEntry> for HistoryEntryDto {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: entry.article_id.get(),
            title: entry.title,
            url: entry.url,
            source_site: entry.source_site,
            thumbnail_url: entry.thumbnail_url,
            viewed_at: entry.viewed_at.to_rfc3339(),
        }
    }
}

/// History listing response envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub success: bool,
    pub history: Vec<HistoryEntryDto>,
}

/// List the acting user's most recent views, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/history",
    params(
        ("limit" = Option<i64>, Query, description = "Maximum entries, default 10")
    ),
    responses(
        (status = 200, description = "Recent views", body = HistoryResponse)
    ),
    tags = ["history"],
    operation_id = "getArticleHistory"
)]
#[get("/history")]
pub async fn get_article_history(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    query: web::Query<HistoryListQuery>,
) -> ApiResult<HttpResponse> {
    let resolution = resolve_identity(&state, &session, &request).await?;
    let entries = state
        .history_query
        .history(&resolution.user_id, lenient_i64(query.limit.as_deref()))
        .await?;

    let mut builder = HttpResponse::Ok();
    apply_directive(&mut builder, resolution.cookie);
    Ok(builder.json(HistoryResponse {
        success: true,
        history: entries.into_iter().map(HistoryEntryDto::from).collect(),
    }))
}
