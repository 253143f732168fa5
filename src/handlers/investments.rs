use super::common::{
    created_response, no_content_response, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    entities::investment::InvestmentStatus,
    errors::ServiceError,
    services::investments::{InquiryInput, InvestmentInput, InvestmentListFilter},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InvestmentRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub min_amount: Decimal,
    pub expected_return_rate: Decimal,
    #[schema(value_type = String)]
    pub status: InvestmentStatus,
    #[serde(default)]
    pub is_public: bool,
}

impl From<InvestmentRequest> for InvestmentInput {
    fn from(req: InvestmentRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            min_amount: req.min_amount,
            expected_return_rate: req.expected_return_rate,
            status: req.status,
            is_public: req.is_public,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InquiryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InvestmentQuery {
    pub status: Option<InvestmentStatus>,
    pub is_public: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InquiryQuery {
    pub investment_id: Option<Uuid>,
}

async fn create_investment(
    State(state): State<AppState>,
    Json(req): Json<InvestmentRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let investment = state.services.investments.create_investment(req.into()).await?;
    Ok(created_response(investment))
}

async fn get_investment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let investment = state.services.investments.get_investment(id).await?;
    Ok(success_response(investment))
}

async fn list_investments(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<InvestmentQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination.normalized();
    let (items, total) = state
        .services
        .investments
        .list_investments(
            InvestmentListFilter {
                status: query.status,
                is_public: query.is_public,
                search: query.search,
            },
            page,
            limit,
        )
        .await?;
    Ok(success_response(PaginatedResponse::new(
        items, page, limit, total,
    )))
}

async fn update_investment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<InvestmentRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let investment = state
        .services
        .investments
        .update_investment(id, req.into())
        .await?;
    Ok(success_response(investment))
}

async fn delete_investment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.investments.delete_investment(id).await?;
    Ok(no_content_response())
}

async fn list_public(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination.normalized();
    let (items, total) = state
        .services
        .investments
        .list_public_investments(page, limit)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        items, page, limit, total,
    )))
}

async fn submit_inquiry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<InquiryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let inquiry = state
        .services
        .investments
        .submit_inquiry(InquiryInput {
            investment_id: id,
            name: req.name,
            email: req.email,
            phone: req.phone,
            message: req.message,
        })
        .await?;
    Ok(created_response(inquiry))
}

async fn list_inquiries(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<InquiryQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination.normalized();
    let (items, total) = state
        .services
        .investments
        .list_inquiries(query.investment_id, page, limit)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        items, page, limit, total,
    )))
}

/// Admin-facing routes, mounted behind auth.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_investment).get(list_investments))
        .route("/inquiries", get(list_inquiries))
        .route(
            "/:id",
            get(get_investment)
                .put(update_investment)
                .delete(delete_investment),
        )
}

/// Visitor-facing routes, mounted without auth.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/public", get(list_public))
        .route("/:id/inquiries", post(submit_inquiry))
}
