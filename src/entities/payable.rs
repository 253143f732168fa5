use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use super::receivable::SettlementStatus;

/// Money the organization owes. Same shape and settlement rules as a
/// receivable, with payments flowing outward.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounting_payables")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub counterparty: String,

    pub description: Option<String>,

    pub amount: Decimal,

    pub payment_amount: Decimal,

    pub remaining_amount: Decimal,

    pub due_date: Date,

    pub status: SettlementStatus,

    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
