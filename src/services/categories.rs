use crate::{
    db::DbPool,
    entities::{
        category::{self, Entity as CategoryEntity},
        journal_entry::{self, Entity as JournalEntity},
    },
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Clone)]
pub struct CategoryService {
    db_pool: Arc<DbPool>,
}

impl CategoryService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, name, description), fields(name = %name))]
    pub async fn create_category(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<category::Model, ServiceError> {
        let db = &*self.db_pool;

        let duplicate = CategoryEntity::find()
            .filter(category::Column::Name.eq(name.clone()))
            .one(db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict("分類名稱已存在".into()));
        }

        let model = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(description),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        };
        let created = model.insert(db).await?;
        info!(category_id = %created.id, "category created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: Uuid) -> Result<category::Model, ServiceError> {
        CategoryEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("分類 {} 不存在", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_categories(
        &self,
        include_inactive: bool,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<category::Model>, u64), ServiceError> {
        let mut query = CategoryEntity::find();
        if !include_inactive {
            query = query.filter(category::Column::IsActive.eq(true));
        }

        let paginator = query
            .order_by_asc(category::Column::Name)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self, name, description))]
    pub async fn update_category(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<Option<String>>,
    ) -> Result<category::Model, ServiceError> {
        let db = &*self.db_pool;
        let existing = self.get_category(id).await?;

        if let Some(new_name) = &name {
            let duplicate = CategoryEntity::find()
                .filter(category::Column::Name.eq(new_name.clone()))
                .filter(category::Column::Id.ne(id))
                .one(db)
                .await?;
            if duplicate.is_some() {
                return Err(ServiceError::Conflict("分類名稱已存在".into()));
            }
        }

        let mut model: category::ActiveModel = existing.into();
        if let Some(new_name) = name {
            model.name = Set(new_name);
        }
        if let Some(desc) = description {
            model.description = Set(desc);
        }
        Ok(model.update(db).await?)
    }

    /// Soft delete, blocked while any journal entry references the category.
    #[instrument(skip(self))]
    pub async fn deactivate_category(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let existing = self.get_category(id).await?;

        let journal_refs = JournalEntity::find()
            .filter(journal_entry::Column::CategoryId.eq(id))
            .count(db)
            .await?;
        if journal_refs > 0 {
            return Err(ServiceError::ValidationError(
                "此分類已被日記帳分錄使用，無法刪除".into(),
            ));
        }

        let mut model: category::ActiveModel = existing.into();
        model.is_active = Set(false);
        model.update(db).await?;
        info!(category_id = %id, "category deactivated");
        Ok(())
    }
}
