use crate::{
    db::DbPool,
    entities::{
        account::{self, AccountType, Entity as AccountEntity},
        journal_entry::{self, Entity as JournalEntity},
    },
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

pub struct CreateAccountInput {
    pub account_code: String,
    pub account_name: String,
    pub account_type: AccountType,
    pub parent_account_id: Option<Uuid>,
}

pub struct UpdateAccountInput {
    pub account_code: Option<String>,
    pub account_name: Option<String>,
    pub account_type: Option<AccountType>,
    pub parent_account_id: Option<Option<Uuid>>,
}

pub struct AccountListFilter {
    pub account_type: Option<AccountType>,
    pub search: Option<String>,
    pub include_inactive: bool,
}

/// Chart-of-accounts management with soft deletes and referential guards.
#[derive(Clone)]
pub struct AccountService {
    db_pool: Arc<DbPool>,
}

impl AccountService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input), fields(code = %input.account_code))]
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<account::Model, ServiceError> {
        let db = &*self.db_pool;

        let duplicate = AccountEntity::find()
            .filter(account::Column::AccountCode.eq(input.account_code.clone()))
            .one(db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict("會計科目代碼已存在".into()));
        }

        if let Some(parent_id) = input.parent_account_id {
            self.require_active(parent_id, "上層科目不存在或已停用").await?;
        }

        let model = account::ActiveModel {
            id: Set(Uuid::new_v4()),
            account_code: Set(input.account_code),
            account_name: Set(input.account_name),
            account_type: Set(input.account_type),
            parent_account_id: Set(input.parent_account_id),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let created = model.insert(db).await?;
        info!(account_id = %created.id, "account created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_account(&self, id: Uuid) -> Result<account::Model, ServiceError> {
        AccountEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("會計科目 {} 不存在", id)))
    }

    #[instrument(skip(self, filter))]
    pub async fn list_accounts(
        &self,
        filter: AccountListFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<account::Model>, u64), ServiceError> {
        let mut query = AccountEntity::find();

        if !filter.include_inactive {
            query = query.filter(account::Column::IsActive.eq(true));
        }
        if let Some(kind) = filter.account_type {
            query = query.filter(account::Column::AccountType.eq(kind));
        }
        if let Some(term) = filter.search.filter(|t| !t.is_empty()) {
            let pattern = format!("%{}%", term);
            query = query.filter(
                Condition::any()
                    .add(account::Column::AccountCode.like(pattern.clone()))
                    .add(account::Column::AccountName.like(pattern)),
            );
        }

        let paginator = query
            .order_by_asc(account::Column::AccountCode)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_account(
        &self,
        id: Uuid,
        input: UpdateAccountInput,
    ) -> Result<account::Model, ServiceError> {
        let db = &*self.db_pool;
        let existing = self.get_account(id).await?;

        if let Some(code) = &input.account_code {
            let duplicate = AccountEntity::find()
                .filter(account::Column::AccountCode.eq(code.clone()))
                .filter(account::Column::Id.ne(id))
                .one(db)
                .await?;
            if duplicate.is_some() {
                return Err(ServiceError::Conflict("會計科目代碼已存在".into()));
            }
        }

        if let Some(Some(parent_id)) = input.parent_account_id {
            if parent_id == id {
                return Err(ServiceError::ValidationError(
                    "科目不可作為自己的上層科目".into(),
                ));
            }
            self.require_active(parent_id, "上層科目不存在或已停用").await?;
        }

        let mut model: account::ActiveModel = existing.into();
        if let Some(code) = input.account_code {
            model.account_code = Set(code);
        }
        if let Some(name) = input.account_name {
            model.account_name = Set(name);
        }
        if let Some(kind) = input.account_type {
            model.account_type = Set(kind);
        }
        if let Some(parent) = input.parent_account_id {
            model.parent_account_id = Set(parent);
        }
        model.updated_at = Set(Some(Utc::now()));

        Ok(model.update(db).await?)
    }

    /// Soft delete. Refused while the account has an active child or is
    /// referenced by any journal entry on either side.
    #[instrument(skip(self))]
    pub async fn deactivate_account(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let existing = self.get_account(id).await?;

        let active_children = AccountEntity::find()
            .filter(account::Column::ParentAccountId.eq(id))
            .filter(account::Column::IsActive.eq(true))
            .count(db)
            .await?;
        if active_children > 0 {
            return Err(ServiceError::ValidationError(
                "此科目尚有啟用中的子科目，無法刪除".into(),
            ));
        }

        let journal_refs = JournalEntity::find()
            .filter(
                Condition::any()
                    .add(journal_entry::Column::DebitAccountId.eq(id))
                    .add(journal_entry::Column::CreditAccountId.eq(id)),
            )
            .count(db)
            .await?;
        if journal_refs > 0 {
            return Err(ServiceError::ValidationError(
                "此科目已被日記帳分錄使用，無法刪除".into(),
            ));
        }

        let mut model: account::ActiveModel = existing.into();
        model.is_active = Set(false);
        model.updated_at = Set(Some(Utc::now()));
        model.update(db).await?;

        info!(account_id = %id, "account deactivated");
        Ok(())
    }

    async fn require_active(&self, id: Uuid, message: &str) -> Result<account::Model, ServiceError> {
        let found = AccountEntity::find_by_id(id).one(&*self.db_pool).await?;
        match found {
            Some(acc) if acc.is_active => Ok(acc),
            _ => Err(ServiceError::ValidationError(message.to_string())),
        }
    }
}
