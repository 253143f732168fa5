use crate::{
    db::DbPool,
    entities::user::{self, Entity as UserEntity, UserRole},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

pub struct UserInput {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: UserRole,
}

pub struct UserListFilter {
    pub role: Option<UserRole>,
    pub search: Option<String>,
    pub include_inactive: bool,
}

/// Membership roster. Credentials live in the external identity service;
/// here we only manage profile, role, and active flag.
#[derive(Clone)]
pub struct UserService {
    db_pool: Arc<DbPool>,
}

impl UserService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn create_user(&self, input: UserInput) -> Result<user::Model, ServiceError> {
        if input.email.trim().is_empty() || !input.email.contains('@') {
            return Err(ServiceError::ValidationError("Email格式錯誤".into()));
        }
        if input.name.trim().is_empty() {
            return Err(ServiceError::ValidationError("姓名不可為空白".into()));
        }

        let duplicate = UserEntity::find()
            .filter(user::Column::Email.eq(input.email.clone()))
            .one(&*self.db_pool)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict("Email已被使用".into()));
        }

        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email),
            name: Set(input.name),
            phone: Set(input.phone),
            role: Set(input.role),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };
        Ok(model.insert(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> Result<user::Model, ServiceError> {
        UserEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("會員 {} 不存在", id)))
    }

    #[instrument(skip(self, filter))]
    pub async fn list_users(
        &self,
        filter: UserListFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<user::Model>, u64), ServiceError> {
        let mut query = UserEntity::find();
        if let Some(role) = filter.role {
            query = query.filter(user::Column::Role.eq(role));
        }
        if let Some(search) = filter.search {
            let term = search.trim().to_owned();
            query = query.filter(
                Condition::any()
                    .add(user::Column::Name.contains(&term))
                    .add(user::Column::Email.contains(&term)),
            );
        }
        if !filter.include_inactive {
            query = query.filter(user::Column::IsActive.eq(true));
        }

        let paginator = query
            .order_by_asc(user::Column::Name)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_user(
        &self,
        id: Uuid,
        input: UserInput,
    ) -> Result<user::Model, ServiceError> {
        if input.email.trim().is_empty() || !input.email.contains('@') {
            return Err(ServiceError::ValidationError("Email格式錯誤".into()));
        }
        if input.name.trim().is_empty() {
            return Err(ServiceError::ValidationError("姓名不可為空白".into()));
        }
        let existing = self.get_user(id).await?;

        let duplicate = UserEntity::find()
            .filter(user::Column::Email.eq(input.email.clone()))
            .filter(user::Column::Id.ne(id))
            .one(&*self.db_pool)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict("Email已被使用".into()));
        }

        let mut model: user::ActiveModel = existing.into();
        model.email = Set(input.email);
        model.name = Set(input.name);
        model.phone = Set(input.phone);
        model.role = Set(input.role);
        model.updated_at = Set(Some(Utc::now()));
        Ok(model.update(&*self.db_pool).await?)
    }

    /// Soft delete. Historical records keep pointing at the row.
    #[instrument(skip(self))]
    pub async fn deactivate_user(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_user(id).await?;

        let mut model: user::ActiveModel = existing.into();
        model.is_active = Set(false);
        model.updated_at = Set(Some(Utc::now()));
        model.update(&*self.db_pool).await?;
        Ok(())
    }
}
