use crate::{
    db::DbPool,
    entities::{
        investment::{self, Entity as InvestmentEntity, InvestmentStatus},
        investment_inquiry::{self, Entity as InquiryEntity},
    },
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

pub struct InvestmentInput {
    pub title: String,
    pub description: Option<String>,
    pub min_amount: Decimal,
    pub expected_return_rate: Decimal,
    pub status: InvestmentStatus,
    pub is_public: bool,
}

pub struct InvestmentListFilter {
    pub status: Option<InvestmentStatus>,
    pub is_public: Option<bool>,
    pub search: Option<String>,
}

pub struct InquiryInput {
    pub investment_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
}

fn validate_input(input: &InvestmentInput) -> Result<(), ServiceError> {
    if input.title.trim().is_empty() {
        return Err(ServiceError::ValidationError("標題不可為空白".into()));
    }
    if input.min_amount <= Decimal::ZERO {
        return Err(ServiceError::ValidationError("最低投資金額必須大於0".into()));
    }
    if input.expected_return_rate < Decimal::ZERO {
        return Err(ServiceError::ValidationError("預期報酬率不可為負數".into()));
    }
    Ok(())
}

/// Investment listings plus the public inquiry inbox.
#[derive(Clone)]
pub struct InvestmentService {
    db_pool: Arc<DbPool>,
}

impl InvestmentService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn create_investment(
        &self,
        input: InvestmentInput,
    ) -> Result<investment::Model, ServiceError> {
        validate_input(&input)?;

        let model = investment::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(input.title),
            description: Set(input.description),
            min_amount: Set(input.min_amount),
            expected_return_rate: Set(input.expected_return_rate),
            status: Set(input.status),
            is_public: Set(input.is_public),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };
        Ok(model.insert(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_investment(&self, id: Uuid) -> Result<investment::Model, ServiceError> {
        InvestmentEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("投資項目 {} 不存在", id)))
    }

    #[instrument(skip(self, filter))]
    pub async fn list_investments(
        &self,
        filter: InvestmentListFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<investment::Model>, u64), ServiceError> {
        let mut query = InvestmentEntity::find();
        if let Some(status) = filter.status {
            query = query.filter(investment::Column::Status.eq(status));
        }
        if let Some(is_public) = filter.is_public {
            query = query.filter(investment::Column::IsPublic.eq(is_public));
        }
        if let Some(search) = filter.search {
            query = query.filter(investment::Column::Title.contains(search.trim()));
        }

        let paginator = query
            .order_by_desc(investment::Column::CreatedAt)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Unauthenticated listing. Only open, public rows are ever returned,
    /// regardless of query parameters.
    #[instrument(skip(self))]
    pub async fn list_public_investments(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<investment::Model>, u64), ServiceError> {
        let paginator = InvestmentEntity::find()
            .filter(investment::Column::IsPublic.eq(true))
            .filter(investment::Column::Status.eq(InvestmentStatus::Open))
            .order_by_desc(investment::Column::CreatedAt)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_investment(
        &self,
        id: Uuid,
        input: InvestmentInput,
    ) -> Result<investment::Model, ServiceError> {
        validate_input(&input)?;
        let existing = self.get_investment(id).await?;

        let mut model: investment::ActiveModel = existing.into();
        model.title = Set(input.title);
        model.description = Set(input.description);
        model.min_amount = Set(input.min_amount);
        model.expected_return_rate = Set(input.expected_return_rate);
        model.status = Set(input.status);
        model.is_public = Set(input.is_public);
        model.updated_at = Set(Some(Utc::now()));
        Ok(model.update(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_investment(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_investment(id).await?;

        let inquiry_count = InquiryEntity::find()
            .filter(investment_inquiry::Column::InvestmentId.eq(id))
            .count(&*self.db_pool)
            .await?;
        if inquiry_count > 0 {
            return Err(ServiceError::InvalidOperation(
                "此投資項目已有洽詢記錄，無法刪除".into(),
            ));
        }

        existing.delete(&*self.db_pool).await?;
        Ok(())
    }

    /// Public inquiry submission. The target listing must be visible to the
    /// public, so drafts and delisted rows cannot be probed by id.
    #[instrument(skip(self, input))]
    pub async fn submit_inquiry(
        &self,
        input: InquiryInput,
    ) -> Result<investment_inquiry::Model, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::ValidationError("姓名不可為空白".into()));
        }
        if input.email.trim().is_empty() || !input.email.contains('@') {
            return Err(ServiceError::ValidationError("Email格式錯誤".into()));
        }

        let target = self.get_investment(input.investment_id).await?;
        if !target.is_public || target.status != InvestmentStatus::Open {
            return Err(ServiceError::NotFound(format!(
                "投資項目 {} 不存在",
                input.investment_id
            )));
        }

        let model = investment_inquiry::ActiveModel {
            id: Set(Uuid::new_v4()),
            investment_id: Set(input.investment_id),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            message: Set(input.message),
            created_at: Set(Utc::now()),
        };
        let created = model.insert(&*self.db_pool).await?;
        info!(investment_id = %created.investment_id, inquiry_id = %created.id, "inquiry submitted");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list_inquiries(
        &self,
        investment_id: Option<Uuid>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<investment_inquiry::Model>, u64), ServiceError> {
        let mut query = InquiryEntity::find();
        if let Some(investment_id) = investment_id {
            query = query.filter(investment_inquiry::Column::InvestmentId.eq(investment_id));
        }

        let paginator = query
            .order_by_desc(investment_inquiry::Column::CreatedAt)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }
}
