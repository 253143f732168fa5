use super::common::{
    created_response, no_content_response, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    entities::{fee_invoice::InvoiceStatus, fee_setting::FeeFrequency},
    errors::ServiceError,
    services::fees::{FeeSettingInput, InvoiceListFilter},
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
pub struct FeeSettingRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub amount: Decimal,
    #[schema(value_type = String)]
    pub frequency: FeeFrequency,
}

impl From<FeeSettingRequest> for FeeSettingInput {
    fn from(req: FeeSettingRequest) -> Self {
        Self {
            name: req.name,
            amount: req.amount,
            frequency: req.frequency,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenerateInvoicesRequest {
    pub fee_setting_id: Uuid,
    #[validate(length(min = 1, max = 10))]
    pub period: String,
}

#[derive(Debug, Deserialize)]
pub struct SettingQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Deserialize)]
pub struct InvoiceQuery {
    pub member_id: Option<Uuid>,
    pub status: Option<InvoiceStatus>,
    pub period: Option<String>,
}

async fn create_setting(
    State(state): State<AppState>,
    Json(req): Json<FeeSettingRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let setting = state.services.fees.create_setting(req.into()).await?;
    Ok(created_response(setting))
}

async fn get_setting(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let setting = state.services.fees.get_setting(id).await?;
    Ok(success_response(setting))
}

async fn list_settings(
    State(state): State<AppState>,
    Query(query): Query<SettingQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let settings = state.services.fees.list_settings(query.include_inactive).await?;
    Ok(success_response(settings))
}

async fn update_setting(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FeeSettingRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let setting = state.services.fees.update_setting(id, req.into()).await?;
    Ok(success_response(setting))
}

async fn delete_setting(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.fees.deactivate_setting(id).await?;
    Ok(no_content_response())
}

async fn generate_invoices(
    State(state): State<AppState>,
    Json(req): Json<GenerateInvoicesRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let result = state
        .services
        .fees
        .generate_invoices(req.fee_setting_id, req.period)
        .await?;
    Ok(created_response(result))
}

async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let invoice = state.services.fees.get_invoice(id).await?;
    Ok(success_response(invoice))
}

async fn list_invoices(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<InvoiceQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination.normalized();
    let (items, total) = state
        .services
        .fees
        .list_invoices(
            InvoiceListFilter {
                member_id: query.member_id,
                status: query.status,
                period: query.period,
            },
            page,
            limit,
        )
        .await?;
    Ok(success_response(PaginatedResponse::new(
        items, page, limit, total,
    )))
}

async fn pay_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let invoice = state.services.fees.pay_invoice(id).await?;
    Ok(success_response(invoice))
}

async fn waive_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let invoice = state.services.fees.waive_invoice(id).await?;
    Ok(success_response(invoice))
}

async fn member_summary(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let summary = state.services.fees.member_summary(member_id).await?;
    Ok(success_response(summary))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settings", post(create_setting).get(list_settings))
        .route(
            "/settings/:id",
            get(get_setting).put(update_setting).delete(delete_setting),
        )
        .route("/invoices/generate", post(generate_invoices))
        .route("/invoices", get(list_invoices))
        .route("/invoices/:id", get(get_invoice))
        .route("/invoices/:id/pay", post(pay_invoice))
        .route("/invoices/:id/waive", post(waive_invoice))
        .route("/members/:id/summary", get(member_summary))
}
