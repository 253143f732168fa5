use super::common::{
    created_response, no_content_response, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{errors::ServiceError, AppState};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    /// Removes the existing description.
    #[serde(default)]
    pub clear_description: bool,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let category = state
        .services
        .categories
        .create_category(req.name, req.description)
        .await?;
    Ok(created_response(category))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let category = state.services.categories.get_category(id).await?;
    Ok(success_response(category))
}

async fn list_categories(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<CategoryQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination.normalized();
    let (items, total) = state
        .services
        .categories
        .list_categories(query.include_inactive, page, limit)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        items, page, limit, total,
    )))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let description = if req.clear_description {
        Some(None)
    } else {
        req.description.map(Some)
    };
    let category = state
        .services
        .categories
        .update_category(id, req.name, description)
        .await?;
    Ok(success_response(category))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.categories.deactivate_category(id).await?;
    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_category).get(list_categories))
        .route(
            "/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}
