use super::common::{
    created_response, no_content_response, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    entities::profit_sharing_project::ProjectStatus,
    errors::ServiceError,
    services::profit_sharing::{DistributionInput, ProjectInput},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub total_profit: Decimal,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DistributionRequest {
    pub member_id: Uuid,
    pub share_ratio: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct ProjectQuery {
    pub status: Option<ProjectStatus>,
}

async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<ProjectRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let project = state
        .services
        .profit_sharing
        .create_project(ProjectInput {
            name: req.name,
            total_profit: req.total_profit,
            period_start: req.period_start,
            period_end: req.period_end,
        })
        .await?;
    Ok(created_response(project))
}

async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let project = state.services.profit_sharing.get_project(id).await?;
    Ok(success_response(project))
}

async fn list_projects(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<ProjectQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination.normalized();
    let (items, total) = state
        .services
        .profit_sharing
        .list_projects(query.status, page, limit)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        items, page, limit, total,
    )))
}

async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.profit_sharing.delete_project(id).await?;
    Ok(no_content_response())
}

async fn add_distribution(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<DistributionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let distribution = state
        .services
        .profit_sharing
        .add_distribution(
            id,
            DistributionInput {
                member_id: req.member_id,
                share_ratio: req.share_ratio,
            },
        )
        .await?;
    Ok(created_response(distribution))
}

async fn list_distributions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let distributions = state.services.profit_sharing.list_distributions(id).await?;
    Ok(success_response(distributions))
}

async fn mark_paid(
    State(state): State<AppState>,
    Path(distribution_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let distribution = state
        .services
        .profit_sharing
        .mark_paid(distribution_id)
        .await?;
    Ok(success_response(distribution))
}

async fn remove_distribution(
    State(state): State<AppState>,
    Path(distribution_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .services
        .profit_sharing
        .remove_distribution(distribution_id)
        .await?;
    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_project).get(list_projects))
        .route("/:id", get(get_project).delete(delete_project))
        .route(
            "/:id/distributions",
            post(add_distribution).get(list_distributions),
        )
        .route("/distributions/:id/pay", post(mark_paid))
        .route("/distributions/:id", delete(remove_distribution))
}
