use super::common::{
    created_response, no_content_response, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    errors::ServiceError,
    services::rentals::{PropertyInput, RentalPaymentInput},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PropertyRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub address: String,
    pub monthly_rent: Decimal,
}

impl From<PropertyRequest> for PropertyInput {
    fn from(req: PropertyRequest) -> Self {
        Self {
            name: req.name,
            address: req.address,
            monthly_rent: req.monthly_rent,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RentalPaymentRequest {
    pub period_year: i32,
    #[validate(range(min = 1, max = 12))]
    pub period_month: i32,
    pub amount: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PropertyQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Deserialize)]
pub struct PaymentQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub year: i32,
}

async fn create_property(
    State(state): State<AppState>,
    Json(req): Json<PropertyRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let property = state.services.rentals.create_property(req.into()).await?;
    Ok(created_response(property))
}

async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let property = state.services.rentals.get_property(id).await?;
    Ok(success_response(property))
}

async fn list_properties(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<PropertyQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination.normalized();
    let (items, total) = state
        .services
        .rentals
        .list_properties(query.include_inactive, page, limit)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        items, page, limit, total,
    )))
}

async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PropertyRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let property = state.services.rentals.update_property(id, req.into()).await?;
    Ok(success_response(property))
}

async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.rentals.deactivate_property(id).await?;
    Ok(no_content_response())
}

async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RentalPaymentRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let payment = state
        .services
        .rentals
        .record_payment(
            id,
            RentalPaymentInput {
                period_year: req.period_year,
                period_month: req.period_month,
                amount: req.amount,
                notes: req.notes,
            },
        )
        .await?;
    Ok(created_response(payment))
}

async fn list_payments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<PaymentQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination.normalized();
    let (items, total) = state
        .services
        .rentals
        .list_payments(id, query.year, page, limit)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        items, page, limit, total,
    )))
}

async fn delete_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.rentals.delete_payment(payment_id).await?;
    Ok(no_content_response())
}

async fn year_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<SummaryQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let summary = state.services.rentals.year_summary(id, query.year).await?;
    Ok(success_response(summary))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_property).get(list_properties))
        .route(
            "/:id",
            get(get_property).put(update_property).delete(delete_property),
        )
        .route("/:id/payments", post(record_payment).get(list_payments))
        .route("/payments/:id", delete(delete_payment))
        .route("/:id/summary", get(year_summary))
}
