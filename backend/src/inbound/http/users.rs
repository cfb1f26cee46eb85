//! Account HTTP handlers.
//!
//! ```text
//! POST /api/v1/register {"username":"ada","password":"...","email":"..."}
//! POST /api/v1/login    {"username":"ada","password":"..."}
//! POST /api/v1/logout
//! GET  /api/v1/users/me/preferences
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::UserId;
use crate::domain::ports::{CookieDirective, RegisterRequest, RequestContext};
use crate::inbound::http::ApiResult;
use crate::inbound::http::categories::{CategoryDto, CustomCategoryDto};
use crate::inbound::http::guest::{apply_directive, guest_cookie_value};
use crate::inbound::http::identity::resolve_identity;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::missing_field_error;

/// Registration request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterBody {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

/// Success envelope with a human-readable message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// The guest id carried by a live guest cookie, if it parses.
fn cookie_guest_id(request: &HttpRequest) -> Option<UserId> {
    guest_cookie_value(request).and_then(|raw| UserId::new(raw).ok())
}

/// Register a new account, upgrading a live guest in place.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterBody,
    responses(
        (status = 200, description = "Account registered", body = MessageResponse),
        (status = 400, description = "Invalid registration input"),
        (status = 503, description = "Store unavailable")
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    payload: web::Json<RegisterBody>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let username = payload
        .username
        .ok_or_else(|| missing_field_error("username"))?;
    let password = payload
        .password
        .ok_or_else(|| missing_field_error("password"))?;
    let email = payload.email.ok_or_else(|| missing_field_error("email"))?;

    let outcome = state
        .accounts
        .register(RegisterRequest {
            username,
            password,
            email,
            guest_id: cookie_guest_id(&request),
        })
        .await?;

    session.persist_login(&outcome.user_id, &outcome.username)?;

    let message = if outcome.upgraded {
        "guest account upgraded"
    } else {
        "registration complete"
    };
    let mut builder = HttpResponse::Ok();
    apply_directive(&mut builder, CookieDirective::Clear);
    Ok(builder.json(MessageResponse {
        success: true,
        message: message.to_owned(),
    }))
}

/// Login request body. `username` also accepts an email address.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginBody {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Authenticate a registered user and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Login success", body = MessageResponse),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Invalid credentials")
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginBody>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let username = payload
        .username
        .ok_or_else(|| missing_field_error("username"))?;
    let password = payload
        .password
        .ok_or_else(|| missing_field_error("password"))?;

    let outcome = state.accounts.login(&username, &password).await?;
    session.persist_login(&outcome.user_id, &outcome.username)?;

    let mut builder = HttpResponse::Ok();
    apply_directive(&mut builder, CookieDirective::Clear);
    Ok(builder.json(MessageResponse {
        success: true,
        message: "logged in".to_owned(),
    }))
}

/// Destroy the session and mint a fresh guest identity.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    ),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.clear();

    // The legacy flow regenerates a guest immediately so the next request
    // keeps its identity stable.
    let resolution = state.identity.resolve(RequestContext::default()).await?;

    let mut builder = HttpResponse::Ok();
    apply_directive(&mut builder, resolution.cookie);
    Ok(builder.json(MessageResponse {
        success: true,
        message: "logged out".to_owned(),
    }))
}

/// User block of the preferences overview.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserBlockDto {
    pub is_guest: bool,
    pub username: String,
}

/// Preferences overview response envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserPreferencesResponse {
    pub success: bool,
    pub user: UserBlockDto,
    pub categories: Vec<CategoryDto>,
    pub custom_categories: Vec<CustomCategoryDto>,
}

/// Fetch the acting user's preferences overview.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/preferences",
    responses(
        (status = 200, description = "Preferences overview", body = UserPreferencesResponse)
    ),
    tags = ["users"],
    operation_id = "getUserPreferences"
)]
#[get("/users/me/preferences")]
pub async fn get_user_preferences(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
) -> ApiResult<HttpResponse> {
    let resolution = resolve_identity(&state, &session, &request).await?;
    let overview = state
        .categories
        .overview(&resolution.user_id, session.username()?)
        .await?;

    let mut builder = HttpResponse::Ok();
    apply_directive(&mut builder, resolution.cookie);
    Ok(builder.json(UserPreferencesResponse {
        success: true,
        user: UserBlockDto {
            is_guest: overview.is_guest,
            username: overview.username,
        },
        categories: overview
            .listing
            .categories
            .into_iter()
            .map(CategoryDto::from)
            .collect(),
        custom_categories: overview
            .listing
            .custom_categories
            .into_iter()
            .map(CustomCategoryDto::from)
            .collect(),
    }))
}
