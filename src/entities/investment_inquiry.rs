use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inquiry submitted by a (possibly anonymous) visitor about a listing.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "investment_inquiries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub investment_id: Uuid,

    pub name: String,

    pub email: String,

    pub phone: Option<String>,

    pub message: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
