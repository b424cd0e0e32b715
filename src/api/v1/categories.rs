//! Category reference endpoints

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::{RequireStaff, RequireUser};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::Category;

/// Category response
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id().to_string(),
            name: category.name().to_string(),
            description: category.description().to_string(),
            created_at: category.created_at().to_rfc3339(),
        }
    }
}

/// List categories response
#[derive(Debug, Serialize)]
pub struct ListCategoriesResponse {
    pub categories: Vec<CategoryResponse>,
    pub total: usize,
}

/// Request to create a category
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// GET /v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
) -> Result<Json<ListCategoriesResponse>, ApiError> {
    let categories = state
        .post_service
        .list_categories()
        .await
        .map_err(ApiError::from)?;

    let responses: Vec<CategoryResponse> = categories.iter().map(CategoryResponse::from).collect();
    let total = responses.len();

    Ok(Json(ListCategoriesResponse {
        categories: responses,
        total,
    }))
}

/// POST /v1/categories
///
/// Staff only; categories are shared reference data.
pub async fn create_category(
    State(state): State<AppState>,
    RequireStaff(account): RequireStaff,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    debug!(account_id = %account.id(), name = %request.name, "Creating category");

    let category = state
        .post_service
        .create_category(request.name, request.description)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(CategoryResponse::from(&category)))
}
