use crate::{
    db::DbPool,
    entities::{
        rental_payment::{self, Entity as RentalPaymentEntity},
        rental_property::{self, Entity as RentalPropertyEntity},
    },
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
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

pub struct PropertyInput {
    pub name: String,
    pub address: String,
    pub monthly_rent: Decimal,
}

pub struct RentalPaymentInput {
    pub period_year: i32,
    pub period_month: i32,
    pub amount: Decimal,
    pub notes: Option<String>,
}

/// Collected rent for one property over one calendar year.
#[derive(Debug, Serialize, ToSchema)]
pub struct RentalYearSummary {
    pub property_id: Uuid,
    pub year: i32,
    /// One entry per recorded month, ordered by month.
    pub months: Vec<RentalMonthEntry>,
    pub total_collected: Decimal,
    /// Months 1-12 with no payment recorded.
    pub missing_months: Vec<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RentalMonthEntry {
    pub month: i32,
    pub amount: Decimal,
    pub paid_at: DateTime<Utc>,
}

fn validate_property(input: &PropertyInput) -> Result<(), ServiceError> {
    if input.name.trim().is_empty() {
        return Err(ServiceError::ValidationError("物件名稱不可為空白".into()));
    }
    if input.monthly_rent <= Decimal::ZERO {
        return Err(ServiceError::ValidationError("月租金必須大於0".into()));
    }
    Ok(())
}

/// Rental properties and their monthly rent collection records.
#[derive(Clone)]
pub struct RentalService {
    db_pool: Arc<DbPool>,
}

impl RentalService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn create_property(
        &self,
        input: PropertyInput,
    ) -> Result<rental_property::Model, ServiceError> {
        validate_property(&input)?;

        let model = rental_property::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            address: Set(input.address),
            monthly_rent: Set(input.monthly_rent),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };
        Ok(model.insert(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_property(&self, id: Uuid) -> Result<rental_property::Model, ServiceError> {
        RentalPropertyEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("出租物件 {} 不存在", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_properties(
        &self,
        include_inactive: bool,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<rental_property::Model>, u64), ServiceError> {
        let mut query = RentalPropertyEntity::find();
        if !include_inactive {
            query = query.filter(rental_property::Column::IsActive.eq(true));
        }

        let paginator = query
            .order_by_asc(rental_property::Column::Name)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_property(
        &self,
        id: Uuid,
        input: PropertyInput,
    ) -> Result<rental_property::Model, ServiceError> {
        validate_property(&input)?;
        let existing = self.get_property(id).await?;

        let mut model: rental_property::ActiveModel = existing.into();
        model.name = Set(input.name);
        model.address = Set(input.address);
        model.monthly_rent = Set(input.monthly_rent);
        model.updated_at = Set(Some(Utc::now()));
        Ok(model.update(&*self.db_pool).await?)
    }

    /// Soft delete. Payment history stays queryable.
    #[instrument(skip(self))]
    pub async fn deactivate_property(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_property(id).await?;

        let mut model: rental_property::ActiveModel = existing.into();
        model.is_active = Set(false);
        model.updated_at = Set(Some(Utc::now()));
        model.update(&*self.db_pool).await?;
        Ok(())
    }

    /// Records rent for one month. Each (property, year, month) may be
    /// recorded once; a second attempt is a conflict.
    #[instrument(skip(self, input))]
    pub async fn record_payment(
        &self,
        property_id: Uuid,
        input: RentalPaymentInput,
    ) -> Result<rental_payment::Model, ServiceError> {
        if !(1..=12).contains(&input.period_month) {
            return Err(ServiceError::ValidationError("月份必須介於1至12".into()));
        }
        if input.amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError("金額必須大於0".into()));
        }

        let property = self.get_property(property_id).await?;
        if !property.is_active {
            return Err(ServiceError::InvalidOperation(
                "此物件已停用，無法登記租金".into(),
            ));
        }

        let duplicate = RentalPaymentEntity::find()
            .filter(rental_payment::Column::PropertyId.eq(property_id))
            .filter(rental_payment::Column::PeriodYear.eq(input.period_year))
            .filter(rental_payment::Column::PeriodMonth.eq(input.period_month))
            .one(&*self.db_pool)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict("該期租金已登記".into()));
        }

        let model = rental_payment::ActiveModel {
            id: Set(Uuid::new_v4()),
            property_id: Set(property_id),
            period_year: Set(input.period_year),
            period_month: Set(input.period_month),
            amount: Set(input.amount),
            paid_at: Set(Utc::now()),
            notes: Set(input.notes),
        };

        // Unique (property, year, month) index catches the race the
        // pre-check misses.
        let created = model.insert(&*self.db_pool).await.map_err(|err| {
            if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                ServiceError::Conflict("該期租金已登記".into())
            } else {
                ServiceError::DatabaseError(err)
            }
        })?;

        info!(
            property_id = %property_id,
            year = input.period_year,
            month = input.period_month,
            "rental payment recorded"
        );
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list_payments(
        &self,
        property_id: Uuid,
        year: Option<i32>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<rental_payment::Model>, u64), ServiceError> {
        self.get_property(property_id).await?;

        let mut query = RentalPaymentEntity::find()
            .filter(rental_payment::Column::PropertyId.eq(property_id));
        if let Some(year) = year {
            query = query.filter(rental_payment::Column::PeriodYear.eq(year));
        }

        let paginator = query
            .order_by_desc(rental_payment::Column::PeriodYear)
            .order_by_desc(rental_payment::Column::PeriodMonth)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self))]
    pub async fn delete_payment(&self, payment_id: Uuid) -> Result<(), ServiceError> {
        let existing = RentalPaymentEntity::find_by_id(payment_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("租金記錄 {} 不存在", payment_id)))?;
        existing.delete(&*self.db_pool).await?;
        Ok(())
    }

    /// Per-year collection summary with gaps called out.
    #[instrument(skip(self))]
    pub async fn year_summary(
        &self,
        property_id: Uuid,
        year: i32,
    ) -> Result<RentalYearSummary, ServiceError> {
        self.get_property(property_id).await?;

        let payments = RentalPaymentEntity::find()
            .filter(rental_payment::Column::PropertyId.eq(property_id))
            .filter(rental_payment::Column::PeriodYear.eq(year))
            .order_by_asc(rental_payment::Column::PeriodMonth)
            .all(&*self.db_pool)
            .await?;

        let months: Vec<RentalMonthEntry> = payments
            .iter()
            .map(|p| RentalMonthEntry {
                month: p.period_month,
                amount: p.amount,
                paid_at: p.paid_at,
            })
            .collect();
        let total_collected = months.iter().map(|m| m.amount).sum();
        let missing_months = (1..=12)
            .filter(|m| !months.iter().any(|entry| entry.month == *m))
            .collect();

        Ok(RentalYearSummary {
            property_id,
            year,
            months,
            total_collected,
            missing_months,
        })
    }
}
