//! Receivable and payable endpoints. The two resources share request
//! shapes; only the service they talk to differs.

use super::common::{
    created_response, no_content_response, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    entities::receivable::SettlementStatus,
    errors::ServiceError,
    services::settlements::{OpenItemInput, OpenItemListFilter},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OpenItemRequest {
    #[validate(length(min = 1, max = 100))]
    pub counterparty: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub due_date: NaiveDate,
}

impl From<OpenItemRequest> for OpenItemInput {
    fn from(req: OpenItemRequest) -> Self {
        Self {
            counterparty: req.counterparty,
            description: req.description,
            amount: req.amount,
            due_date: req.due_date,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentRequest {
    pub payment_amount: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenItemQuery {
    pub status: Option<SettlementStatus>,
    pub search: Option<String>,
    pub due_before: Option<NaiveDate>,
}

impl From<OpenItemQuery> for OpenItemListFilter {
    fn from(query: OpenItemQuery) -> Self {
        Self {
            status: query.status,
            counterparty: query.search,
            due_before: query.due_before,
        }
    }
}

mod receivables {
    use super::*;

    pub async fn create(
        State(state): State<AppState>,
        Json(req): Json<OpenItemRequest>,
    ) -> Result<impl IntoResponse, ServiceError> {
        validate_input(&req)?;
        let item = state.services.receivables.create_receivable(req.into()).await?;
        Ok(created_response(item))
    }

    pub async fn get(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
    ) -> Result<impl IntoResponse, ServiceError> {
        let item = state.services.receivables.get_receivable(id).await?;
        Ok(success_response(item))
    }

    pub async fn list(
        State(state): State<AppState>,
        Query(pagination): Query<PaginationParams>,
        Query(query): Query<OpenItemQuery>,
    ) -> Result<impl IntoResponse, ServiceError> {
        let (page, limit) = pagination.normalized();
        let (items, total) = state
            .services
            .receivables
            .list_receivables(query.into(), page, limit)
            .await?;
        Ok(success_response(PaginatedResponse::new(
            items, page, limit, total,
        )))
    }

    pub async fn update(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
        Json(req): Json<OpenItemRequest>,
    ) -> Result<impl IntoResponse, ServiceError> {
        validate_input(&req)?;
        let item = state
            .services
            .receivables
            .update_receivable(id, req.into())
            .await?;
        Ok(success_response(item))
    }

    pub async fn pay(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
        Json(req): Json<PaymentRequest>,
    ) -> Result<impl IntoResponse, ServiceError> {
        let item = state
            .services
            .receivables
            .record_payment(id, req.payment_amount)
            .await?;
        Ok(success_response(item))
    }

    pub async fn delete(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
    ) -> Result<impl IntoResponse, ServiceError> {
        state.services.receivables.delete_receivable(id).await?;
        Ok(no_content_response())
    }
}

mod payables {
    use super::*;

    pub async fn create(
        State(state): State<AppState>,
        Json(req): Json<OpenItemRequest>,
    ) -> Result<impl IntoResponse, ServiceError> {
        validate_input(&req)?;
        let item = state.services.payables.create_payable(req.into()).await?;
        Ok(created_response(item))
    }

    pub async fn get(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
    ) -> Result<impl IntoResponse, ServiceError> {
        let item = state.services.payables.get_payable(id).await?;
        Ok(success_response(item))
    }

    pub async fn list(
        State(state): State<AppState>,
        Query(pagination): Query<PaginationParams>,
        Query(query): Query<OpenItemQuery>,
    ) -> Result<impl IntoResponse, ServiceError> {
        let (page, limit) = pagination.normalized();
        let (items, total) = state
            .services
            .payables
            .list_payables(query.into(), page, limit)
            .await?;
        Ok(success_response(PaginatedResponse::new(
            items, page, limit, total,
        )))
    }

    pub async fn update(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
        Json(req): Json<OpenItemRequest>,
    ) -> Result<impl IntoResponse, ServiceError> {
        validate_input(&req)?;
        let item = state.services.payables.update_payable(id, req.into()).await?;
        Ok(success_response(item))
    }

    pub async fn pay(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
        Json(req): Json<PaymentRequest>,
    ) -> Result<impl IntoResponse, ServiceError> {
        let item = state
            .services
            .payables
            .record_payment(id, req.payment_amount)
            .await?;
        Ok(success_response(item))
    }

    pub async fn delete(
        State(state): State<AppState>,
        Path(id): Path<Uuid>,
    ) -> Result<impl IntoResponse, ServiceError> {
        state.services.payables.delete_payable(id).await?;
        Ok(no_content_response())
    }
}

pub fn receivable_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(receivables::create).get(receivables::list))
        .route(
            "/:id",
            get(receivables::get)
                .put(receivables::update)
                .delete(receivables::delete),
        )
        .route("/:id/payment", post(receivables::pay))
}

pub fn payable_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(payables::create).get(payables::list))
        .route(
            "/:id",
            get(payables::get)
                .put(payables::update)
                .delete(payables::delete),
        )
        .route("/:id/payment", post(payables::pay))
}
