//! Category listing and preference HTTP handlers.
//!
//! ```text
//! GET  /api/v1/categories
//! PUT  /api/v1/categories/preferences
//! POST /api/v1/categories/custom
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::SetVisibilityRequest;
use crate::domain::{CategoryId, CategoryWithPreference, CustomCategory};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guest::apply_directive;
use crate::inbound::http::identity::resolve_identity;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{Flag, missing_field_error};

/// One system category joined with the acting user's preference row.
///
/// `is_visible` serializes as 0/1 and both preference columns are null
/// when the user has no row yet (legacy LEFT JOIN shape).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub is_visible: Option<i32>,
    pub display_order: Option<i32>,
}

impl From<CategoryWithPreference> for CategoryDto {
    fn from(entry: CategoryWithPreference) -> Self {
        Self {
            id: entry.category.id.get(),
            name: entry.category.name,
            slug: entry.category.slug,
            is_visible: entry.preference.map(|p| i32::from(p.is_visible)),
            display_order: entry.preference.map(|p| p.display_order),
        }
    }
}

/// One user-private category.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomCategoryDto {
    pub id: i64,
    pub name: String,
    pub display_order: i32,
}

impl From<CustomCategory> for CustomCategoryDto {
    fn from(category: CustomCategory) -> Self {
        Self {
            id: category.id.get(),
            name: category.name,
            display_order: category.display_order,
        }
    }
}

/// Category listing response envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: Vec<CategoryDto>,
    pub custom_categories: Vec<CustomCategoryDto>,
}

/// Fetch the system categories with the user's visibility preferences.
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "Category listing", body = CategoriesResponse),
        (status = 500, description = "Internal server error")
    ),
    tags = ["categories"],
    operation_id = "getCategories"
)]
#[get("/categories")]
pub async fn get_categories(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
) -> ApiResult<HttpResponse> {
    let resolution = resolve_identity(&state, &session, &request).await?;
    let listing = state.categories.listing(&resolution.user_id).await?;

    let mut builder = HttpResponse::Ok();
    apply_directive(&mut builder, resolution.cookie);
    Ok(builder.json(CategoriesResponse {
        success: true,
        categories: listing.categories.into_iter().map(CategoryDto::from).collect(),
        custom_categories: listing
            .custom_categories
            .into_iter()
            .map(CustomCategoryDto::from)
            .collect(),
    }))
}

/// Request payload for a visibility/order upsert.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdatePreferenceRequest {
    pub category_id: Option<i64>,
    #[schema(value_type = Option<bool>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<Flag>,
    pub display_order: Option<i32>,
}

/// Bare success envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AckResponse {
    pub success: bool,
}

/// Upsert the acting user's visibility/order for one category.
#[utoipa::path(
    put,
    path = "/api/v1/categories/preferences",
    request_body = UpdatePreferenceRequest,
    responses(
        (status = 200, description = "Preference stored", body = AckResponse),
        (status = 400, description = "Missing field"),
        (status = 503, description = "Store unavailable")
    ),
    tags = ["categories"],
    operation_id = "updateCategoryPreferences"
)]
#[put("/categories/preferences")]
pub async fn update_category_preferences(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    payload: web::Json<UpdatePreferenceRequest>,
) -> ApiResult<HttpResponse> {
    let resolution = resolve_identity(&state, &session, &request).await?;
    let payload = payload.into_inner();
    let category_id = payload
        .category_id
        .ok_or_else(|| missing_field_error("category_id"))?;
    let is_visible = payload
        .is_visible
        .ok_or_else(|| missing_field_error("is_visible"))?;

    state
        .preferences
        .set_visibility(
            &resolution.user_id,
            SetVisibilityRequest {
                category: CategoryId::new(category_id),
                is_visible: is_visible.as_bool(),
                display_order: payload.display_order,
            },
        )
        .await?;

    let mut builder = HttpResponse::Ok();
    apply_directive(&mut builder, resolution.cookie);
    Ok(builder.json(AckResponse { success: true }))
}

/// Request payload for creating a custom category.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddCustomCategoryRequest {
    pub name: Option<String>,
}

/// Creation response envelope carrying the stored record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomCategoryCreatedResponse {
    pub success: bool,
    pub category: CustomCategoryDto,
}

/// Create a user-private category.
#[utoipa::path(
    post,
    path = "/api/v1/categories/custom",
    request_body = AddCustomCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = CustomCategoryCreatedResponse),
        (status = 400, description = "Missing or empty name"),
        (status = 409, description = "Quota exceeded or duplicate name")
    ),
    tags = ["categories"],
    operation_id = "addCustomCategory"
)]
#[post("/categories/custom")]
pub async fn add_custom_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    payload: web::Json<AddCustomCategoryRequest>,
) -> ApiResult<HttpResponse> {
    let resolution = resolve_identity(&state, &session, &request).await?;
    let name = payload
        .into_inner()
        .name
        .ok_or_else(|| missing_field_error("name"))?;

    let created = state
        .preferences
        .add_custom_category(&resolution.user_id, &name)
        .await?;

    let mut builder = HttpResponse::Ok();
    apply_directive(&mut builder, resolution.cookie);
    Ok(builder.json(CustomCategoryCreatedResponse {
        success: true,
        category: CustomCategoryDto::from(created),
    }))
}
