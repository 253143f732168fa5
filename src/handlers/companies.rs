use super::common::{
    created_response, no_content_response, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{errors::ServiceError, services::companies::CompanyInput, AppState};
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
pub struct CompanyRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub tax_id: String,
    pub contact_name: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
}

impl From<CompanyRequest> for CompanyInput {
    fn from(req: CompanyRequest) -> Self {
        Self {
            name: req.name,
            tax_id: req.tax_id,
            contact_name: req.contact_name,
            contact_email: req.contact_email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompanyQuery {
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

async fn create_company(
    State(state): State<AppState>,
    Json(req): Json<CompanyRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let company = state.services.companies.create_company(req.into()).await?;
    Ok(created_response(company))
}

async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let company = state.services.companies.get_company(id).await?;
    Ok(success_response(company))
}

async fn list_companies(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<CompanyQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination.normalized();
    let (items, total) = state
        .services
        .companies
        .list_companies(query.search, query.include_inactive, page, limit)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        items, page, limit, total,
    )))
}

async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CompanyRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let company = state.services.companies.update_company(id, req.into()).await?;
    Ok(success_response(company))
}

async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.companies.deactivate_company(id).await?;
    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_company).get(list_companies))
        .route(
            "/:id",
            get(get_company).put(update_company).delete(delete_company),
        )
}
