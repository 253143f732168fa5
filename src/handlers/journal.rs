use super::common::{
    created_response, no_content_response, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    errors::ServiceError,
    services::journal::{CreateJournalEntryInput, JournalListFilter},
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
pub struct CreateJournalEntryRequest {
    #[validate(length(min = 1, max = 50))]
    pub journal_number: String,
    pub journal_date: NaiveDate,
    pub debit_account_id: Uuid,
    pub credit_account_id: Uuid,
    pub amount: Decimal,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateJournalEntryRequest {
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    /// Removes the existing description.
    #[serde(default)]
    pub clear_description: bool,
    /// Detaches the entry from its category.
    #[serde(default)]
    pub clear_category: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

async fn create_entry(
    State(state): State<AppState>,
    Json(req): Json<CreateJournalEntryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let entry = state
        .services
        .journal
        .create_entry(CreateJournalEntryInput {
            journal_number: req.journal_number,
            journal_date: req.journal_date,
            debit_account_id: req.debit_account_id,
            credit_account_id: req.credit_account_id,
            amount: req.amount,
            category_id: req.category_id,
            description: req.description,
        })
        .await?;
    Ok(created_response(entry))
}

async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let entry = state.services.journal.get_entry(id).await?;
    Ok(success_response(entry))
}

async fn list_entries(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<JournalQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination.normalized();
    let (items, total) = state
        .services
        .journal
        .list_entries(
            JournalListFilter {
                start_date: query.start_date,
                end_date: query.end_date,
                account_id: query.account_id,
                category_id: query.category_id,
            },
            page,
            limit,
        )
        .await?;
    Ok(success_response(PaginatedResponse::new(
        items, page, limit, total,
    )))
}

async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateJournalEntryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let description = if req.clear_description {
        Some(None)
    } else {
        req.description.map(Some)
    };
    let category_id = if req.clear_category {
        Some(None)
    } else {
        req.category_id.map(Some)
    };
    let entry = state
        .services
        .journal
        .update_entry(id, description, category_id)
        .await?;
    Ok(success_response(entry))
}

async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.journal.delete_entry(id).await?;
    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_entry).get(list_entries))
        .route(
            "/:id",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}
