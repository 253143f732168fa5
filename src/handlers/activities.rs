use super::common::{
    created_response, no_content_response, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{errors::ServiceError, services::activities::ActivityInput, AppState};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ActivityRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub registration_deadline: DateTime<Utc>,
    pub capacity: i32,
    #[serde(default)]
    pub is_published: bool,
}

impl From<ActivityRequest> for ActivityInput {
    fn from(req: ActivityRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            location: req.location,
            starts_at: req.starts_at,
            registration_deadline: req.registration_deadline,
            capacity: req.capacity,
            is_published: req.is_published,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegistrationRequest {
    pub member_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    #[serde(default)]
    pub published_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct RegistrationQuery {
    #[serde(default)]
    pub include_cancelled: bool,
}

async fn create_activity(
    State(state): State<AppState>,
    Json(req): Json<ActivityRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let activity = state.services.activities.create_activity(req.into()).await?;
    Ok(created_response(activity))
}

async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let activity = state.services.activities.get_activity(id).await?;
    Ok(success_response(activity))
}

async fn list_activities(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<ActivityQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination.normalized();
    let (items, total) = state
        .services
        .activities
        .list_activities(query.published_only, page, limit)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        items, page, limit, total,
    )))
}

async fn update_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ActivityRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let activity = state
        .services
        .activities
        .update_activity(id, req.into())
        .await?;
    Ok(success_response(activity))
}

async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.activities.delete_activity(id).await?;
    Ok(no_content_response())
}

async fn register(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RegistrationRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let registration = state
        .services
        .activities
        .register(id, req.member_id)
        .await?;
    Ok(created_response(registration))
}

async fn cancel_registration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RegistrationRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let registration = state
        .services
        .activities
        .cancel_registration(id, req.member_id)
        .await?;
    Ok(success_response(registration))
}

async fn list_registrations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<RegistrationQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let registrations = state
        .services
        .activities
        .list_registrations(id, query.include_cancelled)
        .await?;
    Ok(success_response(registrations))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_activity).get(list_activities))
        .route(
            "/:id",
            get(get_activity).put(update_activity).delete(delete_activity),
        )
        .route("/:id/register", post(register))
        .route("/:id/cancel", post(cancel_registration))
        .route("/:id/registrations", get(list_registrations))
}
