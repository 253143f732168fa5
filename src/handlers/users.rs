use super::common::{
    created_response, no_content_response, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    entities::user::UserRole,
    errors::ServiceError,
    services::users::{UserInput, UserListFilter},
    AppState,
};
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
pub struct UserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub phone: Option<String>,
    #[schema(value_type = String)]
    pub role: UserRole,
}

impl From<UserRequest> for UserInput {
    fn from(req: UserRequest) -> Self {
        Self {
            email: req.email,
            name: req.name,
            phone: req.phone,
            role: req.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub role: Option<UserRole>,
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<UserRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let user = state.services.users.create_user(req.into()).await?;
    Ok(created_response(user))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state.services.users.get_user(id).await?;
    Ok(success_response(user))
}

async fn list_users(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination.normalized();
    let (items, total) = state
        .services
        .users
        .list_users(
            UserListFilter {
                role: query.role,
                search: query.search,
                include_inactive: query.include_inactive,
            },
            page,
            limit,
        )
        .await?;
    Ok(success_response(PaginatedResponse::new(
        items, page, limit, total,
    )))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UserRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let user = state.services.users.update_user(id, req.into()).await?;
    Ok(success_response(user))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.users.deactivate_user(id).await?;
    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}
