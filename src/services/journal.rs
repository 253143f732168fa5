use crate::{
    db::DbPool,
    entities::{
        account::{self, Entity as AccountEntity},
        category::{self, Entity as CategoryEntity},
        journal_entry::{self, Entity as JournalEntity},
        monthly_closing::{self, ClosingStatus, Entity as ClosingEntity},
    },
    errors::ServiceError,
};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

pub struct CreateJournalEntryInput {
    pub journal_number: String,
    pub journal_date: NaiveDate,
    pub debit_account_id: Uuid,
    pub credit_account_id: Uuid,
    pub amount: Decimal,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
}

pub struct JournalListFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

/// Journal entry management. Every entry is one balanced debit/credit pair;
/// entries inside a closed month are immutable.
#[derive(Clone)]
pub struct JournalService {
    db_pool: Arc<DbPool>,
}

impl JournalService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input), fields(journal_number = %input.journal_number))]
    pub async fn create_entry(
        &self,
        input: CreateJournalEntryInput,
    ) -> Result<journal_entry::Model, ServiceError> {
        let db = &*self.db_pool;

        if input.amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError("金額必須大於0".into()));
        }
        if input.debit_account_id == input.credit_account_id {
            return Err(ServiceError::ValidationError(
                "借方與貸方科目不可相同".into(),
            ));
        }

        let duplicate = JournalEntity::find()
            .filter(journal_entry::Column::JournalNumber.eq(input.journal_number.clone()))
            .one(db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict("傳票號碼已存在".into()));
        }

        self.require_active_account(input.debit_account_id, "借方科目不存在或已停用")
            .await?;
        self.require_active_account(input.credit_account_id, "貸方科目不存在或已停用")
            .await?;

        if let Some(category_id) = input.category_id {
            let found = CategoryEntity::find_by_id(category_id).one(db).await?;
            match found {
                Some(cat) if cat.is_active => {}
                _ => {
                    return Err(ServiceError::ValidationError(
                        "分類不存在或已停用".into(),
                    ))
                }
            }
        }

        self.require_open_period(input.journal_date).await?;

        let model = journal_entry::ActiveModel {
            id: Set(Uuid::new_v4()),
            journal_number: Set(input.journal_number),
            journal_date: Set(input.journal_date),
            debit_account_id: Set(input.debit_account_id),
            credit_account_id: Set(input.credit_account_id),
            amount: Set(input.amount),
            category_id: Set(input.category_id),
            description: Set(input.description),
            created_at: Set(Utc::now()),
        };
        let created = model.insert(db).await?;
        info!(entry_id = %created.id, "journal entry created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_entry(&self, id: Uuid) -> Result<journal_entry::Model, ServiceError> {
        JournalEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("日記帳分錄 {} 不存在", id)))
    }

    #[instrument(skip(self, filter))]
    pub async fn list_entries(
        &self,
        filter: JournalListFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<journal_entry::Model>, u64), ServiceError> {
        let mut query = JournalEntity::find();

        if let Some(start) = filter.start_date {
            query = query.filter(journal_entry::Column::JournalDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(journal_entry::Column::JournalDate.lte(end));
        }
        if let Some(account_id) = filter.account_id {
            query = query.filter(
                Condition::any()
                    .add(journal_entry::Column::DebitAccountId.eq(account_id))
                    .add(journal_entry::Column::CreditAccountId.eq(account_id)),
            );
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(journal_entry::Column::CategoryId.eq(category_id));
        }

        let paginator = query
            .order_by_desc(journal_entry::Column::JournalDate)
            .order_by_desc(journal_entry::Column::CreatedAt)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Update is restricted to description and category; monetary fields and
    /// accounts are immutable once posted (delete and re-post instead).
    #[instrument(skip(self, description, category_id))]
    pub async fn update_entry(
        &self,
        id: Uuid,
        description: Option<Option<String>>,
        category_id: Option<Option<Uuid>>,
    ) -> Result<journal_entry::Model, ServiceError> {
        let db = &*self.db_pool;
        let existing = self.get_entry(id).await?;
        self.require_open_period(existing.journal_date).await?;

        if let Some(Some(cat_id)) = category_id {
            let found = CategoryEntity::find_by_id(cat_id).one(db).await?;
            match found {
                Some(cat) if cat.is_active => {}
                _ => {
                    return Err(ServiceError::ValidationError(
                        "分類不存在或已停用".into(),
                    ))
                }
            }
        }

        let mut model: journal_entry::ActiveModel = existing.into();
        if let Some(desc) = description {
            model.description = Set(desc);
        }
        if let Some(cat) = category_id {
            model.category_id = Set(cat);
        }
        Ok(model.update(db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_entry(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_entry(id).await?;
        self.require_open_period(existing.journal_date).await?;

        existing.delete(&*self.db_pool).await?;
        info!(entry_id = %id, "journal entry deleted");
        Ok(())
    }

    async fn require_active_account(
        &self,
        id: Uuid,
        message: &str,
    ) -> Result<account::Model, ServiceError> {
        let found = AccountEntity::find_by_id(id).one(&*self.db_pool).await?;
        match found {
            Some(acc) if acc.is_active => Ok(acc),
            _ => Err(ServiceError::ValidationError(message.to_string())),
        }
    }

    /// Rejects mutations for dates falling in a closed month.
    async fn require_open_period(&self, date: NaiveDate) -> Result<(), ServiceError> {
        let closed = ClosingEntity::find()
            .filter(monthly_closing::Column::ClosingYear.eq(date.year()))
            .filter(monthly_closing::Column::ClosingMonth.eq(date.month() as i32))
            .filter(monthly_closing::Column::Status.eq(ClosingStatus::Closed))
            .one(&*self.db_pool)
            .await?;
        if closed.is_some() {
            return Err(ServiceError::InvalidOperation(format!(
                "{}年{}月已完成月結，無法異動分錄",
                date.year(),
                date.month()
            )));
        }
        Ok(())
    }
}
