use crate::{
    db::DbPool,
    entities::company::{self, Entity as CompanyEntity},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

pub struct CompanyInput {
    pub name: String,
    pub tax_id: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
}

fn validate_input(input: &CompanyInput) -> Result<(), ServiceError> {
    if input.name.trim().is_empty() {
        return Err(ServiceError::ValidationError("公司名稱不可為空白".into()));
    }
    if input.tax_id.trim().is_empty() {
        return Err(ServiceError::ValidationError("統一編號不可為空白".into()));
    }
    Ok(())
}

/// Partner company registry, keyed by tax id.
#[derive(Clone)]
pub struct CompanyService {
    db_pool: Arc<DbPool>,
}

impl CompanyService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn create_company(
        &self,
        input: CompanyInput,
    ) -> Result<company::Model, ServiceError> {
        validate_input(&input)?;

        let duplicate = CompanyEntity::find()
            .filter(company::Column::TaxId.eq(input.tax_id.clone()))
            .one(&*self.db_pool)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict("統一編號已存在".into()));
        }

        let model = company::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            tax_id: Set(input.tax_id),
            contact_name: Set(input.contact_name),
            contact_email: Set(input.contact_email),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };
        Ok(model.insert(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_company(&self, id: Uuid) -> Result<company::Model, ServiceError> {
        CompanyEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("公司 {} 不存在", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_companies(
        &self,
        search: Option<String>,
        include_inactive: bool,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<company::Model>, u64), ServiceError> {
        let mut query = CompanyEntity::find();
        if let Some(search) = search {
            query = query.filter(company::Column::Name.contains(search.trim()));
        }
        if !include_inactive {
            query = query.filter(company::Column::IsActive.eq(true));
        }

        let paginator = query
            .order_by_asc(company::Column::Name)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_company(
        &self,
        id: Uuid,
        input: CompanyInput,
    ) -> Result<company::Model, ServiceError> {
        validate_input(&input)?;
        let existing = self.get_company(id).await?;

        let duplicate = CompanyEntity::find()
            .filter(company::Column::TaxId.eq(input.tax_id.clone()))
            .filter(company::Column::Id.ne(id))
            .one(&*self.db_pool)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict("統一編號已存在".into()));
        }

        let mut model: company::ActiveModel = existing.into();
        model.name = Set(input.name);
        model.tax_id = Set(input.tax_id);
        model.contact_name = Set(input.contact_name);
        model.contact_email = Set(input.contact_email);
        model.updated_at = Set(Some(Utc::now()));
        Ok(model.update(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn deactivate_company(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_company(id).await?;

        let mut model: company::ActiveModel = existing.into();
        model.is_active = Set(false);
        model.updated_at = Set(Some(Utc::now()));
        model.update(&*self.db_pool).await?;
        Ok(())
    }
}
