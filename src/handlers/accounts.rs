use super::common::{
    created_response, no_content_response, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    entities::account::AccountType,
    errors::ServiceError,
    services::accounts::{AccountListFilter, CreateAccountInput, UpdateAccountInput},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 20))]
    pub account_code: String,
    #[validate(length(min = 1, max = 100))]
    pub account_name: String,
    #[schema(value_type = String)]
    pub account_type: AccountType,
    pub parent_account_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 1, max = 20))]
    pub account_code: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub account_name: Option<String>,
    #[schema(value_type = Option<String>)]
    pub account_type: Option<AccountType>,
    pub parent_account_id: Option<Uuid>,
    /// Detaches the account from its parent; wins over `parent_account_id`.
    #[serde(default)]
    pub clear_parent: bool,
}

#[derive(Debug, Deserialize)]
pub struct AccountQuery {
    pub account_type: Option<AccountType>,
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

async fn create_account(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<CreateAccountRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let account = state
        .services
        .accounts
        .create_account(CreateAccountInput {
            account_code: req.account_code,
            account_name: req.account_name,
            account_type: req.account_type,
            parent_account_id: req.parent_account_id,
        })
        .await?;
    Ok(created_response(account))
}

async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let account = state.services.accounts.get_account(id).await?;
    Ok(success_response(account))
}

async fn list_accounts(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<AccountQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, limit) = pagination.normalized();
    let (items, total) = state
        .services
        .accounts
        .list_accounts(
            AccountListFilter {
                account_type: query.account_type,
                search: query.search,
                include_inactive: query.include_inactive,
            },
            page,
            limit,
        )
        .await?;
    Ok(success_response(PaginatedResponse::new(
        items, page, limit, total,
    )))
}

async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(req): axum::Json<UpdateAccountRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&req)?;
    let account = state
        .services
        .accounts
        .update_account(
            id,
            UpdateAccountInput {
                account_code: req.account_code,
                account_name: req.account_name,
                account_type: req.account_type,
                parent_account_id: if req.clear_parent {
                    Some(None)
                } else {
                    req.parent_account_id.map(Some)
                },
            },
        )
        .await?;
    Ok(success_response(account))
}

async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.accounts.deactivate_account(id).await?;
    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_account).get(list_accounts))
        .route(
            "/:id",
            get(get_account).put(update_account).delete(delete_account),
        )
}
