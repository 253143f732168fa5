use super::common::{
    created_response, no_content_response, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    entities::monthly_closing::ClosingStatus,
    errors::ServiceError,
    services::closings::ClosingListFilter,
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
pub struct CloseMonthRequest {
    pub closing_year: i32,
    #[validate(range(min = 1, max = 12))]
    pub closing_month: i32,
    #[validate(length(min = 1, max = 100))]
    pub closed_by: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateClosingRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClosingQuery {
    pub closing_year: Option<i32>,
    pub status: Option<ClosingStatus>,
}

async fn list_closings(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<ClosingQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination.normalized();
    let (items, total) = state
        .services
        .closings
        .list_closings(
            ClosingListFilter {
                closing_year: query.closing_year,
                status: query.status,
            },
            page,
            limit,
        )
        .await?;
    Ok(success_response(PaginatedResponse::new(
        items, page, limit, total,
    )))
}

async fn get_closing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let closing = state.services.closings.get_closing(id).await?;
    Ok(success_response(closing))
}

async fn close_month(
    State(state): State<AppState>,
    Json(req): Json<CloseMonthRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let closing = state
        .services
        .closings
        .close_month(req.closing_year, req.closing_month, req.closed_by, req.notes)
        .await?;
    Ok(created_response(closing))
}

async fn check_period(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, ServiceError> {
    let eligibility = state.services.closings.check_period(year, month).await?;
    Ok(success_response(eligibility))
}

async fn update_closing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateClosingRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let closing = state.services.closings.update_notes(id, req.notes).await?;
    Ok(success_response(closing))
}

async fn delete_closing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.closings.delete_closing(id).await?;
    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_closings))
        .route("/close", post(close_month))
        .route("/check/:year/:month", get(check_period))
        .route(
            "/:id",
            get(get_closing).put(update_closing).delete(delete_closing),
        )
}
