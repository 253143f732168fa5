use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One balanced debit/credit pair, the atomic unit of the ledger.
///
/// Every entry touches exactly two accounts: `amount` is debited to
/// `debit_account_id` and credited to `credit_account_id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounting_journal")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Unique, operator-visible voucher number.
    pub journal_number: String,

    pub journal_date: Date,

    pub debit_account_id: Uuid,

    pub credit_account_id: Uuid,

    /// Always strictly positive.
    pub amount: Decimal,

    pub category_id: Option<Uuid>,

    pub description: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the entry posts to the given account on either side.
    pub fn touches(&self, account_id: Uuid) -> bool {
        self.debit_account_id == account_id || self.credit_account_id == account_id
    }
}
