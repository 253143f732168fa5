use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Chart-of-accounts classification, including the refined subtypes used by
/// the balance sheet and cash flow reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "current_asset")]
    CurrentAsset,
    #[sea_orm(string_value = "fixed_asset")]
    FixedAsset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "current_liability")]
    CurrentLiability,
    #[sea_orm(string_value = "long_term_liability")]
    LongTermLiability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "capital")]
    Capital,
    #[sea_orm(string_value = "retained_earnings")]
    RetainedEarnings,
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "expense")]
    Expense,
    #[sea_orm(string_value = "investment")]
    Investment,
}

impl AccountType {
    /// Debit-normal accounts carry their balance as debit minus credit;
    /// everything else is credit-normal.
    pub fn is_debit_normal(self) -> bool {
        matches!(
            self,
            Self::Asset
                | Self::CurrentAsset
                | Self::FixedAsset
                | Self::Expense
                | Self::Investment
        )
    }

    /// Asset family as grouped by the balance sheet.
    pub fn is_asset(self) -> bool {
        matches!(self, Self::Asset | Self::CurrentAsset | Self::FixedAsset)
    }

    /// Liability family as grouped by the balance sheet.
    pub fn is_liability(self) -> bool {
        matches!(
            self,
            Self::Liability | Self::CurrentLiability | Self::LongTermLiability
        )
    }

    /// Equity family as grouped by the balance sheet.
    pub fn is_equity(self) -> bool {
        matches!(self, Self::Equity | Self::Capital | Self::RetainedEarnings)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounting_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Unique ledger code, e.g. "1101".
    pub account_code: String,

    pub account_name: String,

    pub account_type: AccountType,

    /// Optional parent for the account tree.
    pub parent_account_id: Option<Uuid>,

    /// Soft-delete flag; inactive accounts stay retrievable by id.
    pub is_active: bool,

    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
