use crate::{
    db::DbPool,
    entities::{
        activity::{self, Entity as ActivityEntity},
        activity_registration::{self, Entity as RegistrationEntity, RegistrationStatus},
        user::Entity as UserEntity,
    },
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

pub struct ActivityInput {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub registration_deadline: DateTime<Utc>,
    pub capacity: i32,
    pub is_published: bool,
}

fn validate_input(input: &ActivityInput) -> Result<(), ServiceError> {
    if input.title.trim().is_empty() {
        return Err(ServiceError::ValidationError("活動標題不可為空白".into()));
    }
    if input.capacity <= 0 {
        return Err(ServiceError::ValidationError("活動名額必須大於0".into()));
    }
    if input.registration_deadline > input.starts_at {
        return Err(ServiceError::ValidationError(
            "報名截止時間不可晚於活動開始時間".into(),
        ));
    }
    Ok(())
}

/// Activities and member registrations. Sign-up enforces the deadline, the
/// capacity, and one live registration per member.
#[derive(Clone)]
pub struct ActivityService {
    db_pool: Arc<DbPool>,
}

impl ActivityService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn create_activity(
        &self,
        input: ActivityInput,
    ) -> Result<activity::Model, ServiceError> {
        validate_input(&input)?;

        let model = activity::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(input.title),
            description: Set(input.description),
            location: Set(input.location),
            starts_at: Set(input.starts_at),
            registration_deadline: Set(input.registration_deadline),
            capacity: Set(input.capacity),
            is_published: Set(input.is_published),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };
        Ok(model.insert(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_activity(&self, id: Uuid) -> Result<activity::Model, ServiceError> {
        ActivityEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("活動 {} 不存在", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_activities(
        &self,
        published_only: bool,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<activity::Model>, u64), ServiceError> {
        let mut query = ActivityEntity::find();
        if published_only {
            query = query.filter(activity::Column::IsPublished.eq(true));
        }

        let paginator = query
            .order_by_desc(activity::Column::StartsAt)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Capacity may not be reduced below the current headcount.
    #[instrument(skip(self, input))]
    pub async fn update_activity(
        &self,
        id: Uuid,
        input: ActivityInput,
    ) -> Result<activity::Model, ServiceError> {
        validate_input(&input)?;
        let existing = self.get_activity(id).await?;

        let registered = self.active_registration_count(id, &*self.db_pool).await?;
        if (input.capacity as u64) < registered {
            return Err(ServiceError::ValidationError(format!(
                "名額不可低於目前報名人數 {}",
                registered
            )));
        }

        let mut model: activity::ActiveModel = existing.into();
        model.title = Set(input.title);
        model.description = Set(input.description);
        model.location = Set(input.location);
        model.starts_at = Set(input.starts_at);
        model.registration_deadline = Set(input.registration_deadline);
        model.capacity = Set(input.capacity);
        model.is_published = Set(input.is_published);
        model.updated_at = Set(Some(Utc::now()));
        Ok(model.update(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_activity(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_activity(id).await?;

        let registered = self.active_registration_count(id, &*self.db_pool).await?;
        if registered > 0 {
            return Err(ServiceError::InvalidOperation(
                "活動已有報名記錄，無法刪除".into(),
            ));
        }

        RegistrationEntity::delete_many()
            .filter(activity_registration::Column::ActivityId.eq(id))
            .exec(&*self.db_pool)
            .await?;
        existing.delete(&*self.db_pool).await?;
        Ok(())
    }

    /// Registers a member. Deadline, capacity, and duplicate checks all run
    /// inside one transaction so two simultaneous sign-ups cannot both take
    /// the last seat.
    #[instrument(skip(self))]
    pub async fn register(
        &self,
        activity_id: Uuid,
        member_id: Uuid,
    ) -> Result<activity_registration::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let activity = ActivityEntity::find_by_id(activity_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("活動 {} 不存在", activity_id)))?;
        if !activity.is_published {
            return Err(ServiceError::NotFound(format!("活動 {} 不存在", activity_id)));
        }
        if Utc::now() > activity.registration_deadline {
            return Err(ServiceError::InvalidOperation("報名已截止".into()));
        }

        UserEntity::find_by_id(member_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::ValidationError(format!("會員 {} 不存在", member_id)))?;

        let duplicate = RegistrationEntity::find()
            .filter(activity_registration::Column::ActivityId.eq(activity_id))
            .filter(activity_registration::Column::MemberId.eq(member_id))
            .filter(activity_registration::Column::Status.eq(RegistrationStatus::Registered))
            .one(&txn)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict("已報名此活動".into()));
        }

        let registered = self.active_registration_count(activity_id, &txn).await?;
        if registered >= activity.capacity as u64 {
            return Err(ServiceError::InvalidOperation("活動名額已滿".into()));
        }

        let model = activity_registration::ActiveModel {
            id: Set(Uuid::new_v4()),
            activity_id: Set(activity_id),
            member_id: Set(member_id),
            status: Set(RegistrationStatus::Registered),
            created_at: Set(Utc::now()),
        };
        // The partial unique index on live registrations turns a concurrent
        // double sign-up into a constraint violation.
        let created = model.insert(&txn).await.map_err(|err| {
            if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                ServiceError::Conflict("已報名此活動".into())
            } else {
                ServiceError::DatabaseError(err)
            }
        })?;
        txn.commit().await?;

        info!(activity_id = %activity_id, member_id = %member_id, "activity registration");
        Ok(created)
    }

    /// Cancelling frees the seat. The row stays for the audit trail.
    #[instrument(skip(self))]
    pub async fn cancel_registration(
        &self,
        activity_id: Uuid,
        member_id: Uuid,
    ) -> Result<activity_registration::Model, ServiceError> {
        let existing = RegistrationEntity::find()
            .filter(activity_registration::Column::ActivityId.eq(activity_id))
            .filter(activity_registration::Column::MemberId.eq(member_id))
            .filter(activity_registration::Column::Status.eq(RegistrationStatus::Registered))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("找不到報名記錄".into()))?;

        let mut model: activity_registration::ActiveModel = existing.into();
        model.status = Set(RegistrationStatus::Cancelled);
        Ok(model.update(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn list_registrations(
        &self,
        activity_id: Uuid,
        include_cancelled: bool,
    ) -> Result<Vec<activity_registration::Model>, ServiceError> {
        self.get_activity(activity_id).await?;

        let mut query = RegistrationEntity::find()
            .filter(activity_registration::Column::ActivityId.eq(activity_id));
        if !include_cancelled {
            query = query
                .filter(activity_registration::Column::Status.eq(RegistrationStatus::Registered));
        }
        Ok(query
            .order_by_asc(activity_registration::Column::CreatedAt)
            .all(&*self.db_pool)
            .await?)
    }

    async fn active_registration_count<C>(
        &self,
        activity_id: Uuid,
        conn: &C,
    ) -> Result<u64, ServiceError>
    where
        C: sea_orm::ConnectionTrait,
    {
        Ok(RegistrationEntity::find()
            .filter(activity_registration::Column::ActivityId.eq(activity_id))
            .filter(activity_registration::Column::Status.eq(RegistrationStatus::Registered))
            .count(conn)
            .await?)
    }
}
