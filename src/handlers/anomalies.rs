use super::common::{
    created_response, success_response, validate_input, PaginatedResponse, PaginationParams,
};
use crate::{
    auth::AuthenticatedUser,
    entities::anomaly::{AnomalySeverity, AnomalyStatus},
    errors::ServiceError,
    services::anomalies::{AnomalyInput, AnomalyListFilter},
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
pub struct ReportAnomalyRequest {
    #[validate(length(min = 1, max = 50))]
    pub source: String,
    #[schema(value_type = String)]
    pub severity: AnomalySeverity,
    #[validate(length(min = 1, max = 1000))]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct AnomalyQuery {
    pub status: Option<AnomalyStatus>,
    pub severity: Option<AnomalySeverity>,
    pub source: Option<String>,
}

async fn report_anomaly(
    State(state): State<AppState>,
    Json(req): Json<ReportAnomalyRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let anomaly = state
        .services
        .anomalies
        .report_anomaly(AnomalyInput {
            source: req.source,
            severity: req.severity,
            description: req.description,
        })
        .await?;
    Ok(created_response(anomaly))
}

async fn get_anomaly(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let anomaly = state.services.anomalies.get_anomaly(id).await?;
    Ok(success_response(anomaly))
}

async fn list_anomalies(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<AnomalyQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination.normalized();
    let (items, total) = state
        .services
        .anomalies
        .list_anomalies(
            AnomalyListFilter {
                status: query.status,
                severity: query.severity,
                source: query.source,
            },
            page,
            limit,
        )
        .await?;
    Ok(success_response(PaginatedResponse::new(
        items, page, limit, total,
    )))
}

async fn resolve_anomaly(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let resolved_by = user.name.unwrap_or(user.user_id);
    let anomaly = state
        .services
        .anomalies
        .resolve_anomaly(id, resolved_by)
        .await?;
    Ok(success_response(anomaly))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(report_anomaly).get(list_anomalies))
        .route("/:id", get(get_anomaly))
        .route("/:id/resolve", post(resolve_anomaly))
}
