use crate::{
    db::DbPool,
    entities::anomaly::{self, AnomalySeverity, AnomalyStatus, Entity as AnomalyEntity},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

pub struct AnomalyInput {
    pub source: String,
    pub severity: AnomalySeverity,
    pub description: String,
}

pub struct AnomalyListFilter {
    pub status: Option<AnomalyStatus>,
    pub severity: Option<AnomalySeverity>,
    pub source: Option<String>,
}

/// Irregularity tracker. Other services and batch jobs file anomalies here;
/// staff resolve them with an audit note.
#[derive(Clone)]
pub struct AnomalyService {
    db_pool: Arc<DbPool>,
}

impl AnomalyService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn report_anomaly(
        &self,
        input: AnomalyInput,
    ) -> Result<anomaly::Model, ServiceError> {
        if input.source.trim().is_empty() {
            return Err(ServiceError::ValidationError("來源不可為空白".into()));
        }
        if input.description.trim().is_empty() {
            return Err(ServiceError::ValidationError("描述不可為空白".into()));
        }

        let model = anomaly::ActiveModel {
            id: Set(Uuid::new_v4()),
            source: Set(input.source),
            severity: Set(input.severity),
            description: Set(input.description),
            status: Set(AnomalyStatus::Open),
            resolved_at: Set(None),
            resolved_by: Set(None),
            created_at: Set(Utc::now()),
        };
        let created = model.insert(&*self.db_pool).await?;
        warn!(
            anomaly_id = %created.id,
            source = %created.source,
            severity = ?created.severity,
            "anomaly reported"
        );
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_anomaly(&self, id: Uuid) -> Result<anomaly::Model, ServiceError> {
        AnomalyEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("異常記錄 {} 不存在", id)))
    }

    #[instrument(skip(self, filter))]
    pub async fn list_anomalies(
        &self,
        filter: AnomalyListFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<anomaly::Model>, u64), ServiceError> {
        let mut query = AnomalyEntity::find();
        if let Some(status) = filter.status {
            query = query.filter(anomaly::Column::Status.eq(status));
        }
        if let Some(severity) = filter.severity {
            query = query.filter(anomaly::Column::Severity.eq(severity));
        }
        if let Some(source) = filter.source {
            query = query.filter(anomaly::Column::Source.eq(source));
        }

        let paginator = query
            .order_by_desc(anomaly::Column::CreatedAt)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self, resolved_by))]
    pub async fn resolve_anomaly(
        &self,
        id: Uuid,
        resolved_by: String,
    ) -> Result<anomaly::Model, ServiceError> {
        let existing = self.get_anomaly(id).await?;
        if existing.status == AnomalyStatus::Resolved {
            return Err(ServiceError::InvalidOperation("此異常已處理".into()));
        }

        let mut model: anomaly::ActiveModel = existing.into();
        model.status = Set(AnomalyStatus::Resolved);
        model.resolved_at = Set(Some(Utc::now()));
        model.resolved_by = Set(Some(resolved_by));
        Ok(model.update(&*self.db_pool).await?)
    }
}
