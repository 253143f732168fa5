//! Receivables and payables share the same settlement lifecycle: an open
//! item starts `pending`, moves to `partial` as payments arrive, and flips
//! to `paid` once the remaining balance reaches zero. Overpayment is never
//! allowed.

use crate::{
    db::DbPool,
    entities::{
        payable::{self, Entity as PayableEntity},
        receivable::{self, Entity as ReceivableEntity, SettlementStatus},
    },
    errors::ServiceError,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

pub struct OpenItemInput {
    pub counterparty: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub due_date: NaiveDate,
}

pub struct OpenItemListFilter {
    pub status: Option<SettlementStatus>,
    pub counterparty: Option<String>,
    pub due_before: Option<NaiveDate>,
}

/// Applies one payment to an open item.
///
/// Returns the new cumulative payment, remaining balance, and status.
pub fn apply_payment(
    amount: Decimal,
    paid_so_far: Decimal,
    payment: Decimal,
) -> Result<(Decimal, Decimal, SettlementStatus), ServiceError> {
    if payment <= Decimal::ZERO {
        return Err(ServiceError::ValidationError("付款金額必須大於0".into()));
    }
    let remaining = amount - paid_so_far;
    if payment > remaining {
        return Err(ServiceError::ValidationError(format!(
            "付款金額 {} 超過剩餘金額 {}",
            payment, remaining
        )));
    }

    let new_paid = paid_so_far + payment;
    let new_remaining = amount - new_paid;
    let status = if new_remaining.is_zero() {
        SettlementStatus::Paid
    } else {
        SettlementStatus::Partial
    };
    Ok((new_paid, new_remaining, status))
}

fn validate_input(input: &OpenItemInput) -> Result<(), ServiceError> {
    if input.counterparty.trim().is_empty() {
        return Err(ServiceError::ValidationError("交易對象不可為空白".into()));
    }
    if input.amount <= Decimal::ZERO {
        return Err(ServiceError::ValidationError("金額必須大於0".into()));
    }
    Ok(())
}

#[derive(Clone)]
pub struct ReceivableService {
    db_pool: Arc<DbPool>,
}

impl ReceivableService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn create_receivable(
        &self,
        input: OpenItemInput,
    ) -> Result<receivable::Model, ServiceError> {
        validate_input(&input)?;

        let model = receivable::ActiveModel {
            id: Set(Uuid::new_v4()),
            counterparty: Set(input.counterparty),
            description: Set(input.description),
            amount: Set(input.amount),
            payment_amount: Set(Decimal::ZERO),
            remaining_amount: Set(input.amount),
            due_date: Set(input.due_date),
            status: Set(SettlementStatus::Pending),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };
        Ok(model.insert(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_receivable(&self, id: Uuid) -> Result<receivable::Model, ServiceError> {
        ReceivableEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("應收帳款 {} 不存在", id)))
    }

    #[instrument(skip(self, filter))]
    pub async fn list_receivables(
        &self,
        filter: OpenItemListFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<receivable::Model>, u64), ServiceError> {
        let mut query = ReceivableEntity::find();
        if let Some(status) = filter.status {
            query = query.filter(receivable::Column::Status.eq(status));
        }
        if let Some(counterparty) = filter.counterparty {
            query = query
                .filter(receivable::Column::Counterparty.contains(counterparty.trim()));
        }
        if let Some(due_before) = filter.due_before {
            query = query.filter(receivable::Column::DueDate.lte(due_before));
        }

        let paginator = query
            .order_by_asc(receivable::Column::DueDate)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_receivable(
        &self,
        id: Uuid,
        input: OpenItemInput,
    ) -> Result<receivable::Model, ServiceError> {
        validate_input(&input)?;
        let existing = self.get_receivable(id).await?;
        if existing.payment_amount > Decimal::ZERO {
            return Err(ServiceError::InvalidOperation(
                "已有付款記錄，無法修改應收帳款".into(),
            ));
        }

        let mut model: receivable::ActiveModel = existing.into();
        model.counterparty = Set(input.counterparty);
        model.description = Set(input.description);
        model.amount = Set(input.amount);
        model.remaining_amount = Set(input.amount);
        model.due_date = Set(input.due_date);
        model.updated_at = Set(Some(Utc::now()));
        Ok(model.update(&*self.db_pool).await?)
    }

    /// Records one payment. Read and write happen inside a transaction so two
    /// concurrent payments cannot both observe the same remaining balance.
    #[instrument(skip(self))]
    pub async fn record_payment(
        &self,
        id: Uuid,
        payment: Decimal,
    ) -> Result<receivable::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let existing = ReceivableEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("應收帳款 {} 不存在", id)))?;
        if existing.status == SettlementStatus::Paid {
            return Err(ServiceError::InvalidOperation("此帳款已結清".into()));
        }

        let (paid, remaining, status) =
            apply_payment(existing.amount, existing.payment_amount, payment)?;

        let mut model: receivable::ActiveModel = existing.into();
        model.payment_amount = Set(paid);
        model.remaining_amount = Set(remaining);
        model.status = Set(status);
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&txn).await?;
        txn.commit().await?;

        info!(receivable_id = %id, %payment, ?status, "receivable payment recorded");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_receivable(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_receivable(id).await?;
        if existing.payment_amount > Decimal::ZERO {
            return Err(ServiceError::InvalidOperation(
                "已有付款記錄，無法刪除應收帳款".into(),
            ));
        }
        existing.delete(&*self.db_pool).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PayableService {
    db_pool: Arc<DbPool>,
}

impl PayableService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn create_payable(
        &self,
        input: OpenItemInput,
    ) -> Result<payable::Model, ServiceError> {
        validate_input(&input)?;

        let model = payable::ActiveModel {
            id: Set(Uuid::new_v4()),
            counterparty: Set(input.counterparty),
            description: Set(input.description),
            amount: Set(input.amount),
            payment_amount: Set(Decimal::ZERO),
            remaining_amount: Set(input.amount),
            due_date: Set(input.due_date),
            status: Set(SettlementStatus::Pending),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };
        Ok(model.insert(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_payable(&self, id: Uuid) -> Result<payable::Model, ServiceError> {
        PayableEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("應付帳款 {} 不存在", id)))
    }

    #[instrument(skip(self, filter))]
    pub async fn list_payables(
        &self,
        filter: OpenItemListFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<payable::Model>, u64), ServiceError> {
        let mut query = PayableEntity::find();
        if let Some(status) = filter.status {
            query = query.filter(payable::Column::Status.eq(status));
        }
        if let Some(counterparty) = filter.counterparty {
            query = query.filter(payable::Column::Counterparty.contains(counterparty.trim()));
        }
        if let Some(due_before) = filter.due_before {
            query = query.filter(payable::Column::DueDate.lte(due_before));
        }

        let paginator = query
            .order_by_asc(payable::Column::DueDate)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_payable(
        &self,
        id: Uuid,
        input: OpenItemInput,
    ) -> Result<payable::Model, ServiceError> {
        validate_input(&input)?;
        let existing = self.get_payable(id).await?;
        if existing.payment_amount > Decimal::ZERO {
            return Err(ServiceError::InvalidOperation(
                "已有付款記錄，無法修改應付帳款".into(),
            ));
        }

        let mut model: payable::ActiveModel = existing.into();
        model.counterparty = Set(input.counterparty);
        model.description = Set(input.description);
        model.amount = Set(input.amount);
        model.remaining_amount = Set(input.amount);
        model.due_date = Set(input.due_date);
        model.updated_at = Set(Some(Utc::now()));
        Ok(model.update(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn record_payment(
        &self,
        id: Uuid,
        payment: Decimal,
    ) -> Result<payable::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let existing = PayableEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("應付帳款 {} 不存在", id)))?;
        if existing.status == SettlementStatus::Paid {
            return Err(ServiceError::InvalidOperation("此帳款已結清".into()));
        }

        let (paid, remaining, status) =
            apply_payment(existing.amount, existing.payment_amount, payment)?;

        let mut model: payable::ActiveModel = existing.into();
        model.payment_amount = Set(paid);
        model.remaining_amount = Set(remaining);
        model.status = Set(status);
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&txn).await?;
        txn.commit().await?;

        info!(payable_id = %id, %payment, ?status, "payable payment recorded");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_payable(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_payable(id).await?;
        if existing.payment_amount > Decimal::ZERO {
            return Err(ServiceError::InvalidOperation(
                "已有付款記錄，無法刪除應付帳款".into(),
            ));
        }
        existing.delete(&*self.db_pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn partial_then_final_payment_settles_item() {
        let (paid, remaining, status) =
            apply_payment(dec!(1000), dec!(0), dec!(400)).unwrap();
        assert_eq!(paid, dec!(400));
        assert_eq!(remaining, dec!(600));
        assert_eq!(status, SettlementStatus::Partial);

        let (paid, remaining, status) =
            apply_payment(dec!(1000), paid, dec!(600)).unwrap();
        assert_eq!(paid, dec!(1000));
        assert_eq!(remaining, dec!(0));
        assert_eq!(status, SettlementStatus::Paid);
    }

    #[test]
    fn overpayment_is_rejected() {
        let err = apply_payment(dec!(1000), dec!(0), dec!(1100)).unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));

        let err = apply_payment(dec!(1000), dec!(900), dec!(200)).unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn zero_or_negative_payment_is_rejected() {
        assert!(apply_payment(dec!(1000), dec!(0), dec!(0)).is_err());
        assert!(apply_payment(dec!(1000), dec!(0), dec!(-5)).is_err());
    }
}
