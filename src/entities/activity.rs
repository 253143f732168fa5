use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Organization event members can sign up for.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,

    pub description: Option<String>,

    pub location: Option<String>,

    pub starts_at: DateTimeUtc,

    /// Registrations are rejected after this instant.
    pub registration_deadline: DateTimeUtc,

    /// Maximum non-cancelled registrations.
    pub capacity: i32,

    pub is_published: bool,

    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
