use crate::{
    db::DbPool,
    entities::{
        journal_entry::{self, Entity as JournalEntity},
        monthly_closing::{self, ClosingStatus, Entity as ClosingEntity},
    },
    errors::ServiceError,
    services::reports::BALANCE_TOLERANCE,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// Aggregated journal totals for one calendar month.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PeriodTotals {
    pub entry_count: u64,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub balance: Decimal,
}

impl PeriodTotals {
    pub fn is_balanced(&self) -> bool {
        self.balance.abs() <= BALANCE_TOLERANCE
    }
}

/// Result of the side-effect-free closing eligibility check.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClosingEligibility {
    pub closing_year: i32,
    pub closing_month: i32,
    pub already_closed: bool,
    pub totals: PeriodTotals,
    pub can_close: bool,
}

pub struct ClosingListFilter {
    pub closing_year: Option<i32>,
    pub status: Option<ClosingStatus>,
}

/// Month-end closing: aggregates the month's journal, verifies debits equal
/// credits, and locks the period.
#[derive(Clone)]
pub struct ClosingService {
    db_pool: Arc<DbPool>,
}

impl ClosingService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, filter))]
    pub async fn list_closings(
        &self,
        filter: ClosingListFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<monthly_closing::Model>, u64), ServiceError> {
        let mut query = ClosingEntity::find();
        if let Some(year) = filter.closing_year {
            query = query.filter(monthly_closing::Column::ClosingYear.eq(year));
        }
        if let Some(status) = filter.status {
            query = query.filter(monthly_closing::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(monthly_closing::Column::ClosingYear)
            .order_by_desc(monthly_closing::Column::ClosingMonth)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self))]
    pub async fn get_closing(&self, id: Uuid) -> Result<monthly_closing::Model, ServiceError> {
        ClosingEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("月結記錄 {} 不存在", id)))
    }

    /// Closes a month. A (year, month) pair may be closed at most once, and
    /// the month's debits and credits must balance within the tolerance.
    #[instrument(skip(self, closed_by))]
    pub async fn close_month(
        &self,
        closing_year: i32,
        closing_month: i32,
        closed_by: String,
        notes: Option<String>,
    ) -> Result<monthly_closing::Model, ServiceError> {
        validate_period(closing_year, closing_month)?;
        let db = &*self.db_pool;

        let existing = self.find_period(closing_year, closing_month).await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict("該年月的月結記錄已存在".into()));
        }

        let totals = self.period_totals(closing_year, closing_month).await?;
        if totals.entry_count == 0 {
            return Err(ServiceError::ValidationError(
                "該月份沒有日記帳分錄，無法月結".into(),
            ));
        }
        if !totals.is_balanced() {
            return Err(ServiceError::ValidationError(format!(
                "借貸不平衡無法月結：借方 {} 貸方 {} 差額 {}",
                totals.total_debit, totals.total_credit, totals.balance
            )));
        }

        let model = monthly_closing::ActiveModel {
            id: Set(Uuid::new_v4()),
            closing_year: Set(closing_year),
            closing_month: Set(closing_month),
            total_debit: Set(totals.total_debit),
            total_credit: Set(totals.total_credit),
            balance: Set(totals.balance),
            status: Set(ClosingStatus::Closed),
            closed_by: Set(closed_by),
            closed_at: Set(Utc::now()),
            notes: Set(notes),
        };

        // The unique (year, month) index turns a concurrent double-close
        // into a constraint violation instead of a duplicate row.
        let created = model.insert(db).await.map_err(|err| {
            if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                ServiceError::Conflict("該年月的月結記錄已存在".into())
            } else {
                ServiceError::DatabaseError(err)
            }
        })?;

        info!(
            year = closing_year,
            month = closing_month,
            closing_id = %created.id,
            "month closed"
        );
        Ok(created)
    }

    /// Eligibility check without side effects, for UI pre-validation.
    #[instrument(skip(self))]
    pub async fn check_period(
        &self,
        closing_year: i32,
        closing_month: i32,
    ) -> Result<ClosingEligibility, ServiceError> {
        validate_period(closing_year, closing_month)?;

        let already_closed = self
            .find_period(closing_year, closing_month)
            .await?
            .is_some();
        let totals = self.period_totals(closing_year, closing_month).await?;
        let can_close = !already_closed && totals.entry_count > 0 && totals.is_balanced();

        Ok(ClosingEligibility {
            closing_year,
            closing_month,
            already_closed,
            totals,
            can_close,
        })
    }

    /// Only `notes` is mutable after the fact; a closed record can never be
    /// reopened through this endpoint.
    #[instrument(skip(self, notes))]
    pub async fn update_notes(
        &self,
        id: Uuid,
        notes: Option<String>,
    ) -> Result<monthly_closing::Model, ServiceError> {
        let existing = self.get_closing(id).await?;
        let mut model: monthly_closing::ActiveModel = existing.into();
        model.notes = Set(notes);
        Ok(model.update(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_closing(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_closing(id).await?;
        if existing.status == ClosingStatus::Closed {
            return Err(ServiceError::InvalidOperation(
                "已結帳的月結記錄無法刪除".into(),
            ));
        }
        existing.delete(&*self.db_pool).await?;
        Ok(())
    }

    async fn find_period(
        &self,
        year: i32,
        month: i32,
    ) -> Result<Option<monthly_closing::Model>, ServiceError> {
        Ok(ClosingEntity::find()
            .filter(monthly_closing::Column::ClosingYear.eq(year))
            .filter(monthly_closing::Column::ClosingMonth.eq(month))
            .one(&*self.db_pool)
            .await?)
    }

    /// Sums the month's journal by side. In the paired-entry model every row
    /// posts the same amount to one debit and one credit account, so the two
    /// sums agree by construction; the balance gate still guards data that
    /// arrived through imports.
    async fn period_totals(&self, year: i32, month: i32) -> Result<PeriodTotals, ServiceError> {
        let (start, end) = month_bounds(year, month)?;

        let entries = JournalEntity::find()
            .filter(journal_entry::Column::JournalDate.gte(start))
            .filter(journal_entry::Column::JournalDate.lte(end))
            .all(&*self.db_pool)
            .await?;

        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;
        for entry in &entries {
            total_debit += entry.amount;
            total_credit += entry.amount;
        }

        Ok(PeriodTotals {
            entry_count: entries.len() as u64,
            total_debit,
            total_credit,
            balance: total_debit - total_credit,
        })
    }
}

fn validate_period(year: i32, month: i32) -> Result<(), ServiceError> {
    if !(1..=12).contains(&month) {
        return Err(ServiceError::ValidationError("月份必須介於1至12".into()));
    }
    if !(1900..=9999).contains(&year) {
        return Err(ServiceError::ValidationError("年份格式錯誤".into()));
    }
    Ok(())
}

/// First and last day of a calendar month.
fn month_bounds(year: i32, month: i32) -> Result<(NaiveDate, NaiveDate), ServiceError> {
    let start = NaiveDate::from_ymd_opt(year, month as u32, 1)
        .ok_or_else(|| ServiceError::ValidationError("年月格式錯誤".into()))?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month as u32 + 1, 1)
    }
    .map(|d| d.pred_opt().unwrap_or(start))
    .ok_or_else(|| ServiceError::ValidationError("年月格式錯誤".into()))?;
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn month_bounds_cover_whole_month() {
        let (start, end) = month_bounds(2026, 2).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());

        let (start, end) = month_bounds(2026, 12).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
    }

    #[test]
    fn invalid_months_are_rejected() {
        assert!(validate_period(2026, 0).is_err());
        assert!(validate_period(2026, 13).is_err());
        assert!(validate_period(2026, 6).is_ok());
    }

    #[test]
    fn totals_within_tolerance_are_balanced() {
        let totals = PeriodTotals {
            entry_count: 3,
            total_debit: dec!(100.00),
            total_credit: dec!(100.01),
            balance: dec!(-0.01),
        };
        assert!(totals.is_balanced());

        let off = PeriodTotals {
            entry_count: 3,
            total_debit: dec!(100.00),
            total_credit: dec!(100.02),
            balance: dec!(-0.02),
        };
        assert!(!off.is_balanced());
    }
}
