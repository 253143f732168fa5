use super::common::success_response;
use crate::{errors::ServiceError, AppState};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsOfQuery {
    pub as_of_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl RangeQuery {
    /// Period reports need both ends of the range.
    fn required(self) -> Result<(NaiveDate, NaiveDate), ServiceError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start <= end => Ok((start, end)),
            (Some(_), Some(_)) => Err(ServiceError::ValidationError(
                "結束日期不可早於開始日期".into(),
            )),
            _ => Err(ServiceError::ValidationError(
                "必須提供開始日期與結束日期".into(),
            )),
        }
    }
}

async fn trial_balance(
    State(state): State<AppState>,
    Query(query): Query<AsOfQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let report = state.services.reports.trial_balance(query.as_of_date).await?;
    Ok(success_response(report))
}

async fn income_statement(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (start, end) = query.required()?;
    let report = state.services.reports.income_statement(start, end).await?;
    Ok(success_response(report))
}

async fn balance_sheet(
    State(state): State<AppState>,
    Query(query): Query<AsOfQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let as_of = query.as_of_date.ok_or_else(|| {
        ServiceError::ValidationError("必須提供基準日期".into())
    })?;
    let report = state.services.reports.balance_sheet(as_of).await?;
    Ok(success_response(report))
}

async fn cash_flow(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (start, end) = query.required()?;
    let report = state.services.reports.cash_flow(start, end).await?;
    Ok(success_response(report))
}

async fn account_ledger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let report = state
        .services
        .reports
        .account_ledger(id, query.start_date, query.end_date)
        .await?;
    Ok(success_response(report))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trial-balance", get(trial_balance))
        .route("/income-statement", get(income_statement))
        .route("/balance-sheet", get(balance_sheet))
        .route("/cash-flow", get(cash_flow))
        .route("/account-ledger/:id", get(account_ledger))
}
