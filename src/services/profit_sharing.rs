use crate::{
    db::DbPool,
    entities::{
        profit_sharing_distribution::{self, Entity as DistributionEntity},
        profit_sharing_project::{self, Entity as ProjectEntity, ProjectStatus},
        user::Entity as UserEntity,
    },
    errors::ServiceError,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

pub struct ProjectInput {
    pub name: String,
    pub total_profit: Decimal,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

pub struct DistributionInput {
    pub member_id: Uuid,
    pub share_ratio: Decimal,
}

/// Validates a new share ratio against the ratios already allocated.
/// The sum across a project must stay at or below 1.
pub fn check_ratio(
    new_ratio: Decimal,
    allocated: Decimal,
) -> Result<(), ServiceError> {
    if new_ratio <= Decimal::ZERO || new_ratio > Decimal::ONE {
        return Err(ServiceError::ValidationError(
            "分潤比例必須介於0與1之間".into(),
        ));
    }
    if allocated + new_ratio > Decimal::ONE {
        return Err(ServiceError::ValidationError(format!(
            "分潤比例總和超過100%：已分配 {}，新增 {}",
            allocated, new_ratio
        )));
    }
    Ok(())
}

/// Profit-sharing projects and their per-member distributions.
#[derive(Clone)]
pub struct ProfitSharingService {
    db_pool: Arc<DbPool>,
}

impl ProfitSharingService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn create_project(
        &self,
        input: ProjectInput,
    ) -> Result<profit_sharing_project::Model, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::ValidationError("專案名稱不可為空白".into()));
        }
        if input.total_profit <= Decimal::ZERO {
            return Err(ServiceError::ValidationError("分潤總額必須大於0".into()));
        }
        if input.period_end < input.period_start {
            return Err(ServiceError::ValidationError(
                "期間結束日不可早於開始日".into(),
            ));
        }

        let model = profit_sharing_project::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            total_profit: Set(input.total_profit),
            period_start: Set(input.period_start),
            period_end: Set(input.period_end),
            status: Set(ProjectStatus::Draft),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };
        Ok(model.insert(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_project(
        &self,
        id: Uuid,
    ) -> Result<profit_sharing_project::Model, ServiceError> {
        ProjectEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("分潤專案 {} 不存在", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_projects(
        &self,
        status: Option<ProjectStatus>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<profit_sharing_project::Model>, u64), ServiceError> {
        let mut query = ProjectEntity::find();
        if let Some(status) = status {
            query = query.filter(profit_sharing_project::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(profit_sharing_project::Column::PeriodEnd)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Adds one member's share to a project that is still being set up. The
    /// distribution amount is the share of total profit at the time of
    /// allocation.
    #[instrument(skip(self, input))]
    pub async fn add_distribution(
        &self,
        project_id: Uuid,
        input: DistributionInput,
    ) -> Result<profit_sharing_distribution::Model, ServiceError> {
        let project = self.get_project(project_id).await?;
        if project.status == ProjectStatus::Completed {
            return Err(ServiceError::InvalidOperation(
                "專案已完成，無法新增分潤".into(),
            ));
        }

        UserEntity::find_by_id(input.member_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                ServiceError::ValidationError(format!("會員 {} 不存在", input.member_id))
            })?;

        let existing = self.project_distributions(project_id).await?;
        if existing.iter().any(|d| d.member_id == input.member_id) {
            return Err(ServiceError::Conflict("該會員已在分潤名單中".into()));
        }
        let allocated: Decimal = existing.iter().map(|d| d.share_ratio).sum();
        check_ratio(input.share_ratio, allocated)?;

        let amount = project.total_profit * input.share_ratio;
        let model = profit_sharing_distribution::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(project_id),
            member_id: Set(input.member_id),
            share_ratio: Set(input.share_ratio),
            amount: Set(amount),
            is_paid: Set(false),
            paid_at: Set(None),
        };
        let created = model.insert(&*self.db_pool).await?;

        // First allocation moves a draft into distributing.
        if project.status == ProjectStatus::Draft {
            let mut project: profit_sharing_project::ActiveModel = project.into();
            project.status = Set(ProjectStatus::Distributing);
            project.updated_at = Set(Some(Utc::now()));
            project.update(&*self.db_pool).await?;
        }

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list_distributions(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<profit_sharing_distribution::Model>, ServiceError> {
        self.get_project(project_id).await?;
        self.project_distributions(project_id).await
    }

    /// Marks one distribution paid. When every distribution of the project
    /// is paid, the project completes.
    #[instrument(skip(self))]
    pub async fn mark_paid(
        &self,
        distribution_id: Uuid,
    ) -> Result<profit_sharing_distribution::Model, ServiceError> {
        let existing = DistributionEntity::find_by_id(distribution_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("分潤記錄 {} 不存在", distribution_id))
            })?;
        if existing.is_paid {
            return Err(ServiceError::InvalidOperation("此分潤已發放".into()));
        }

        let project_id = existing.project_id;
        let mut model: profit_sharing_distribution::ActiveModel = existing.into();
        model.is_paid = Set(true);
        model.paid_at = Set(Some(Utc::now()));
        let updated = model.update(&*self.db_pool).await?;

        let unpaid = DistributionEntity::find()
            .filter(profit_sharing_distribution::Column::ProjectId.eq(project_id))
            .filter(profit_sharing_distribution::Column::IsPaid.eq(false))
            .count(&*self.db_pool)
            .await?;
        if unpaid == 0 {
            let project = self.get_project(project_id).await?;
            let mut project: profit_sharing_project::ActiveModel = project.into();
            project.status = Set(ProjectStatus::Completed);
            project.updated_at = Set(Some(Utc::now()));
            project.update(&*self.db_pool).await?;
            info!(project_id = %project_id, "profit sharing project completed");
        }

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn remove_distribution(&self, distribution_id: Uuid) -> Result<(), ServiceError> {
        let existing = DistributionEntity::find_by_id(distribution_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("分潤記錄 {} 不存在", distribution_id))
            })?;
        if existing.is_paid {
            return Err(ServiceError::InvalidOperation(
                "已發放的分潤無法移除".into(),
            ));
        }
        existing.delete(&*self.db_pool).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_project(&self, id: Uuid) -> Result<(), ServiceError> {
        let project = self.get_project(id).await?;

        let paid = DistributionEntity::find()
            .filter(profit_sharing_distribution::Column::ProjectId.eq(id))
            .filter(profit_sharing_distribution::Column::IsPaid.eq(true))
            .count(&*self.db_pool)
            .await?;
        if paid > 0 {
            return Err(ServiceError::InvalidOperation(
                "專案已有發放記錄，無法刪除".into(),
            ));
        }

        DistributionEntity::delete_many()
            .filter(profit_sharing_distribution::Column::ProjectId.eq(id))
            .exec(&*self.db_pool)
            .await?;
        project.delete(&*self.db_pool).await?;
        Ok(())
    }

    async fn project_distributions(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<profit_sharing_distribution::Model>, ServiceError> {
        Ok(DistributionEntity::find()
            .filter(profit_sharing_distribution::Column::ProjectId.eq(project_id))
            .all(&*self.db_pool)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ratio_sum_cannot_exceed_one() {
        assert!(check_ratio(dec!(0.4), dec!(0.0)).is_ok());
        assert!(check_ratio(dec!(0.6), dec!(0.4)).is_ok());
        assert!(check_ratio(dec!(0.61), dec!(0.4)).is_err());
    }

    #[test]
    fn ratio_bounds_are_enforced() {
        assert!(check_ratio(dec!(0), dec!(0)).is_err());
        assert!(check_ratio(dec!(-0.1), dec!(0)).is_err());
        assert!(check_ratio(dec!(1.01), dec!(0)).is_err());
        assert!(check_ratio(dec!(1), dec!(0)).is_ok());
    }
}
