//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: every endpoint from the inbound layer, the response
//! envelope schemas, and the session cookie security scheme. The document
//! backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::articles::{ArticleCategoryDto, ArticleDto, FeedResponse};
use crate::inbound::http::categories::{
    AckResponse, AddCustomCategoryRequest, CategoriesResponse, CategoryDto,
    CustomCategoryCreatedResponse, CustomCategoryDto, UpdatePreferenceRequest,
};
use crate::inbound::http::history::{HistoryEntryDto, HistoryResponse, SaveHistoryRequest};
use crate::inbound::http::users::{
    LoginBody, MessageResponse, RegisterBody, UserBlockDto, UserPreferencesResponse,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "News feed backend API",
        description = "Personalized article feed with per-user category preferences."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::articles::get_articles,
        crate::inbound::http::categories::get_categories,
        crate::inbound::http::categories::update_category_preferences,
        crate::inbound::http::categories::add_custom_category,
        crate::inbound::http::history::save_article_history,
        crate::inbound::http::history::get_article_history,
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::get_user_preferences,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        FeedResponse,
        ArticleDto,
        ArticleCategoryDto,
        CategoriesResponse,
        CategoryDto,
        CustomCategoryDto,
        CustomCategoryCreatedResponse,
        UpdatePreferenceRequest,
        AddCustomCategoryRequest,
        AckResponse,
        SaveHistoryRequest,
        HistoryResponse,
        HistoryEntryDto,
        RegisterBody,
        LoginBody,
        MessageResponse,
        UserBlockDto,
        UserPreferencesResponse,
    )),
    tags(
        (name = "articles", description = "Feed listings"),
        (name = "categories", description = "Category preferences"),
        (name = "history", description = "View history"),
        (name = "users", description = "Accounts and sessions"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;
