use crate::{
    db::DbPool,
    entities::{
        fee_invoice::{self, Entity as FeeInvoiceEntity, InvoiceStatus},
        fee_setting::{self, Entity as FeeSettingEntity, FeeFrequency},
        user::{self, Entity as UserEntity},
    },
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

pub struct FeeSettingInput {
    pub name: String,
    pub amount: Decimal,
    pub frequency: FeeFrequency,
}

pub struct InvoiceListFilter {
    pub member_id: Option<Uuid>,
    pub status: Option<InvoiceStatus>,
    pub period: Option<String>,
}

/// Outcome of a bulk invoice generation run.
#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResult {
    pub period: String,
    pub generated: u64,
    /// Members skipped because an invoice for this setting and period
    /// already existed.
    pub skipped: u64,
}

/// One member's fee standing across all settings.
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberFeeSummary {
    pub member_id: Uuid,
    pub total_billed: Decimal,
    pub total_paid: Decimal,
    pub total_waived: Decimal,
    pub outstanding: Decimal,
    #[schema(value_type = Vec<Object>)]
    pub unpaid_invoices: Vec<fee_invoice::Model>,
}

/// Membership fee schedules, billing, and collection.
#[derive(Clone)]
pub struct FeeService {
    db_pool: Arc<DbPool>,
}

impl FeeService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn create_setting(
        &self,
        input: FeeSettingInput,
    ) -> Result<fee_setting::Model, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::ValidationError("費用名稱不可為空白".into()));
        }
        if input.amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError("金額必須大於0".into()));
        }

        let model = fee_setting::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            amount: Set(input.amount),
            frequency: Set(input.frequency),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };
        Ok(model.insert(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_setting(&self, id: Uuid) -> Result<fee_setting::Model, ServiceError> {
        FeeSettingEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("費用設定 {} 不存在", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_settings(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<fee_setting::Model>, ServiceError> {
        let mut query = FeeSettingEntity::find();
        if !include_inactive {
            query = query.filter(fee_setting::Column::IsActive.eq(true));
        }
        Ok(query
            .order_by_asc(fee_setting::Column::Name)
            .all(&*self.db_pool)
            .await?)
    }

    #[instrument(skip(self, input))]
    pub async fn update_setting(
        &self,
        id: Uuid,
        input: FeeSettingInput,
    ) -> Result<fee_setting::Model, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::ValidationError("費用名稱不可為空白".into()));
        }
        if input.amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError("金額必須大於0".into()));
        }
        let existing = self.get_setting(id).await?;

        // Amount changes only affect invoices generated afterwards;
        // existing invoices keep the amount they were billed at.
        let mut model: fee_setting::ActiveModel = existing.into();
        model.name = Set(input.name);
        model.amount = Set(input.amount);
        model.frequency = Set(input.frequency);
        model.updated_at = Set(Some(Utc::now()));
        Ok(model.update(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn deactivate_setting(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_setting(id).await?;

        let mut model: fee_setting::ActiveModel = existing.into();
        model.is_active = Set(false);
        model.updated_at = Set(Some(Utc::now()));
        model.update(&*self.db_pool).await?;
        Ok(())
    }

    /// Generates invoices for every active member for one setting and one
    /// billing period. Members already billed for that period are skipped,
    /// so the run is idempotent.
    #[instrument(skip(self))]
    pub async fn generate_invoices(
        &self,
        setting_id: Uuid,
        period: String,
    ) -> Result<GenerateResult, ServiceError> {
        if period.trim().is_empty() {
            return Err(ServiceError::ValidationError("期別不可為空白".into()));
        }
        let setting = self.get_setting(setting_id).await?;
        if !setting.is_active {
            return Err(ServiceError::InvalidOperation(
                "此費用設定已停用，無法產生帳單".into(),
            ));
        }

        let members = UserEntity::find()
            .filter(user::Column::IsActive.eq(true))
            .filter(user::Column::Role.eq(crate::entities::user::UserRole::Member))
            .all(&*self.db_pool)
            .await?;

        let mut generated = 0u64;
        let mut skipped = 0u64;
        for member in &members {
            let model = fee_invoice::ActiveModel {
                id: Set(Uuid::new_v4()),
                member_id: Set(member.id),
                fee_setting_id: Set(setting_id),
                period: Set(period.clone()),
                amount: Set(setting.amount),
                status: Set(InvoiceStatus::Unpaid),
                paid_at: Set(None),
                created_at: Set(Utc::now()),
            };
            // The unique (member, setting, period) index makes reruns
            // skip rather than double-bill.
            match model.insert(&*self.db_pool).await {
                Ok(_) => generated += 1,
                Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    skipped += 1
                }
                Err(err) => return Err(ServiceError::DatabaseError(err)),
            }
        }

        info!(
            setting_id = %setting_id,
            period = %period,
            generated,
            skipped,
            "fee invoices generated"
        );
        Ok(GenerateResult {
            period,
            generated,
            skipped,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_invoice(&self, id: Uuid) -> Result<fee_invoice::Model, ServiceError> {
        FeeInvoiceEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("費用帳單 {} 不存在", id)))
    }

    #[instrument(skip(self, filter))]
    pub async fn list_invoices(
        &self,
        filter: InvoiceListFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<fee_invoice::Model>, u64), ServiceError> {
        let mut query = FeeInvoiceEntity::find();
        if let Some(member_id) = filter.member_id {
            query = query.filter(fee_invoice::Column::MemberId.eq(member_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(fee_invoice::Column::Status.eq(status));
        }
        if let Some(period) = filter.period {
            query = query.filter(fee_invoice::Column::Period.eq(period));
        }

        let paginator = query
            .order_by_desc(fee_invoice::Column::CreatedAt)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self))]
    pub async fn pay_invoice(&self, id: Uuid) -> Result<fee_invoice::Model, ServiceError> {
        let existing = self.get_invoice(id).await?;
        if existing.status != InvoiceStatus::Unpaid {
            return Err(ServiceError::InvalidOperation(
                "此帳單已繳費或已豁免".into(),
            ));
        }

        let mut model: fee_invoice::ActiveModel = existing.into();
        model.status = Set(InvoiceStatus::Paid);
        model.paid_at = Set(Some(Utc::now()));
        Ok(model.update(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn waive_invoice(&self, id: Uuid) -> Result<fee_invoice::Model, ServiceError> {
        let existing = self.get_invoice(id).await?;
        if existing.status != InvoiceStatus::Unpaid {
            return Err(ServiceError::InvalidOperation(
                "此帳單已繳費或已豁免".into(),
            ));
        }

        let mut model: fee_invoice::ActiveModel = existing.into();
        model.status = Set(InvoiceStatus::Waived);
        Ok(model.update(&*self.db_pool).await?)
    }

    /// Aggregated fee standing for one member.
    #[instrument(skip(self))]
    pub async fn member_summary(
        &self,
        member_id: Uuid,
    ) -> Result<MemberFeeSummary, ServiceError> {
        UserEntity::find_by_id(member_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("會員 {} 不存在", member_id)))?;

        let invoices = FeeInvoiceEntity::find()
            .filter(fee_invoice::Column::MemberId.eq(member_id))
            .order_by_desc(fee_invoice::Column::CreatedAt)
            .all(&*self.db_pool)
            .await?;

        let mut total_billed = Decimal::ZERO;
        let mut total_paid = Decimal::ZERO;
        let mut total_waived = Decimal::ZERO;
        let mut outstanding = Decimal::ZERO;
        let mut unpaid_invoices = Vec::new();
        for invoice in invoices {
            total_billed += invoice.amount;
            match invoice.status {
                InvoiceStatus::Paid => total_paid += invoice.amount,
                InvoiceStatus::Waived => total_waived += invoice.amount,
                InvoiceStatus::Unpaid => {
                    outstanding += invoice.amount;
                    unpaid_invoices.push(invoice);
                }
            }
        }

        Ok(MemberFeeSummary {
            member_id,
            total_billed,
            total_paid,
            total_waived,
            outstanding,
            unpaid_invoices,
        })
    }
}
