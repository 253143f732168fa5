use crate::{
    db::DbPool,
    entities::{
        account::{self, AccountType, Entity as AccountEntity},
        journal_entry::{self, Entity as JournalEntity},
    },
    errors::ServiceError,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

/// Ledgers are considered balanced when the absolute difference stays under
/// one cent.
pub const BALANCE_TOLERANCE: Decimal = dec!(0.01);

/// Per-account debit/credit totals over some date range.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountActivity {
    pub account_id: Uuid,
    pub account_code: String,
    pub account_name: String,
    #[schema(value_type = String)]
    pub account_type: AccountType,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
}

impl AccountActivity {
    /// Balance expressed in the account's normal direction: debit minus
    /// credit for debit-normal types, credit minus debit otherwise.
    pub fn normal_balance(&self) -> Decimal {
        if self.account_type.is_debit_normal() {
            self.total_debit - self.total_credit
        } else {
            self.total_credit - self.total_debit
        }
    }

    fn has_activity(&self) -> bool {
        !self.total_debit.is_zero() || !self.total_credit.is_zero()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrialBalanceRow {
    pub account_code: String,
    pub account_name: String,
    #[schema(value_type = String)]
    pub account_type: AccountType,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub normal_balance: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrialBalanceReport {
    pub as_of_date: Option<NaiveDate>,
    pub items: Vec<TrialBalanceRow>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub difference: Decimal,
    pub is_balanced: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SectionItem {
    pub account_code: String,
    pub account_name: String,
    pub balance: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportSection {
    pub items: Vec<SectionItem>,
    pub total: Decimal,
}

impl ReportSection {
    fn from_items(items: Vec<SectionItem>) -> Self {
        let total = items.iter().map(|i| i.balance).sum();
        Self { items, total }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IncomeStatementReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub revenue: ReportSection,
    pub expenses: ReportSection,
    pub net_income: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceSheetReport {
    pub as_of_date: NaiveDate,
    pub assets: ReportSection,
    pub liabilities: ReportSection,
    pub equity: ReportSection,
    pub balance_check: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CashFlowSection {
    pub items: Vec<SectionItem>,
    pub net_cash_flow: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CashFlowReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub operating: CashFlowSection,
    pub investing: CashFlowSection,
    pub financing: CashFlowSection,
    pub net_cash_flow: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LedgerRow {
    pub entry_id: Uuid,
    pub journal_number: String,
    pub journal_date: NaiveDate,
    pub description: Option<String>,
    pub debit: Decimal,
    pub credit: Decimal,
    pub running_balance: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountLedgerReport {
    pub account_id: Uuid,
    pub account_code: String,
    pub account_name: String,
    pub items: Vec<LedgerRow>,
    pub ending_balance: Decimal,
}

/// Cash flow activity buckets partition account types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CashFlowBucket {
    Operating,
    Investing,
    Financing,
}

fn cash_flow_bucket(kind: AccountType) -> Option<CashFlowBucket> {
    use AccountType::*;
    match kind {
        Revenue | Expense | CurrentAsset | CurrentLiability => Some(CashFlowBucket::Operating),
        FixedAsset | Investment => Some(CashFlowBucket::Investing),
        Equity | Capital | LongTermLiability => Some(CashFlowBucket::Financing),
        Asset | Liability | RetainedEarnings => None,
    }
}

/// Trial balance over per-account activity. Only accounts with nonzero
/// activity appear; the ledger is balanced when |debit - credit| stays under
/// the tolerance.
pub fn build_trial_balance(
    as_of_date: Option<NaiveDate>,
    activities: &[AccountActivity],
) -> TrialBalanceReport {
    let mut items = Vec::new();
    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;

    for activity in activities.iter().filter(|a| a.has_activity()) {
        total_debit += activity.total_debit;
        total_credit += activity.total_credit;
        items.push(TrialBalanceRow {
            account_code: activity.account_code.clone(),
            account_name: activity.account_name.clone(),
            account_type: activity.account_type,
            total_debit: activity.total_debit,
            total_credit: activity.total_credit,
            normal_balance: activity.normal_balance(),
        });
    }

    let difference = total_debit - total_credit;
    TrialBalanceReport {
        as_of_date,
        items,
        total_debit,
        total_credit,
        difference,
        is_balanced: difference.abs() < BALANCE_TOLERANCE,
    }
}

fn section_items<F>(activities: &[AccountActivity], predicate: F) -> Vec<SectionItem>
where
    F: Fn(AccountType) -> bool,
{
    activities
        .iter()
        .filter(|a| predicate(a.account_type))
        .map(|a| SectionItem {
            account_code: a.account_code.clone(),
            account_name: a.account_name.clone(),
            balance: a.normal_balance(),
        })
        .filter(|item| !item.balance.is_zero())
        .collect()
}

pub fn build_income_statement(
    start_date: NaiveDate,
    end_date: NaiveDate,
    activities: &[AccountActivity],
) -> IncomeStatementReport {
    let revenue = ReportSection::from_items(section_items(activities, |t| {
        t == AccountType::Revenue
    }));
    let expenses = ReportSection::from_items(section_items(activities, |t| {
        t == AccountType::Expense
    }));
    let net_income = revenue.total - expenses.total;
    IncomeStatementReport {
        start_date,
        end_date,
        revenue,
        expenses,
        net_income,
    }
}

pub fn build_balance_sheet(
    as_of_date: NaiveDate,
    activities: &[AccountActivity],
) -> BalanceSheetReport {
    let assets = ReportSection::from_items(section_items(activities, AccountType::is_asset));
    let liabilities =
        ReportSection::from_items(section_items(activities, AccountType::is_liability));
    let equity = ReportSection::from_items(section_items(activities, AccountType::is_equity));

    let balance_check =
        (assets.total - (liabilities.total + equity.total)).abs() < BALANCE_TOLERANCE;
    BalanceSheetReport {
        as_of_date,
        assets,
        liabilities,
        equity,
        balance_check,
    }
}

pub fn build_cash_flow(
    start_date: NaiveDate,
    end_date: NaiveDate,
    activities: &[AccountActivity],
) -> CashFlowReport {
    let mut sections: HashMap<CashFlowBucket, Vec<SectionItem>> = HashMap::new();

    for activity in activities.iter().filter(|a| a.has_activity()) {
        let Some(bucket) = cash_flow_bucket(activity.account_type) else {
            continue;
        };
        // Cash flow is uniformly credit minus debit regardless of type.
        let flow = activity.total_credit - activity.total_debit;
        if flow.is_zero() {
            continue;
        }
        sections.entry(bucket).or_default().push(SectionItem {
            account_code: activity.account_code.clone(),
            account_name: activity.account_name.clone(),
            balance: flow,
        });
    }

    let mut take = |bucket| {
        let items: Vec<SectionItem> = sections.remove(&bucket).unwrap_or_default();
        let net_cash_flow = items.iter().map(|i| i.balance).sum();
        CashFlowSection {
            items,
            net_cash_flow,
        }
    };

    let operating = take(CashFlowBucket::Operating);
    let investing = take(CashFlowBucket::Investing);
    let financing = take(CashFlowBucket::Financing);
    let net_cash_flow =
        operating.net_cash_flow + investing.net_cash_flow + financing.net_cash_flow;

    CashFlowReport {
        start_date,
        end_date,
        operating,
        investing,
        financing,
        net_cash_flow,
    }
}

/// Read-side report engine over the journal.
#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Aggregates debit/credit totals per active account over the date range.
    async fn account_activity(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<AccountActivity>, ServiceError> {
        let db = &*self.db_pool;

        let accounts = AccountEntity::find()
            .filter(account::Column::IsActive.eq(true))
            .order_by_asc(account::Column::AccountCode)
            .all(db)
            .await?;

        let mut query = JournalEntity::find();
        if let Some(start) = start_date {
            query = query.filter(journal_entry::Column::JournalDate.gte(start));
        }
        if let Some(end) = end_date {
            query = query.filter(journal_entry::Column::JournalDate.lte(end));
        }
        let entries = query.all(db).await?;

        let mut totals: HashMap<Uuid, (Decimal, Decimal)> = HashMap::new();
        for entry in &entries {
            totals.entry(entry.debit_account_id).or_default().0 += entry.amount;
            totals.entry(entry.credit_account_id).or_default().1 += entry.amount;
        }

        Ok(accounts
            .into_iter()
            .map(|acc| {
                let (debit, credit) = totals.get(&acc.id).copied().unwrap_or_default();
                AccountActivity {
                    account_id: acc.id,
                    account_code: acc.account_code,
                    account_name: acc.account_name,
                    account_type: acc.account_type,
                    total_debit: debit,
                    total_credit: credit,
                }
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn trial_balance(
        &self,
        as_of_date: Option<NaiveDate>,
    ) -> Result<TrialBalanceReport, ServiceError> {
        let activities = self.account_activity(None, as_of_date).await?;
        Ok(build_trial_balance(as_of_date, &activities))
    }

    #[instrument(skip(self))]
    pub async fn income_statement(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<IncomeStatementReport, ServiceError> {
        let activities = self
            .account_activity(Some(start_date), Some(end_date))
            .await?;
        Ok(build_income_statement(start_date, end_date, &activities))
    }

    #[instrument(skip(self))]
    pub async fn balance_sheet(
        &self,
        as_of_date: NaiveDate,
    ) -> Result<BalanceSheetReport, ServiceError> {
        let activities = self.account_activity(None, Some(as_of_date)).await?;
        Ok(build_balance_sheet(as_of_date, &activities))
    }

    #[instrument(skip(self))]
    pub async fn cash_flow(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<CashFlowReport, ServiceError> {
        let activities = self
            .account_activity(Some(start_date), Some(end_date))
            .await?;
        Ok(build_cash_flow(start_date, end_date, &activities))
    }

    /// Chronological entries touching one account with a running balance.
    /// The running balance uses the uniform debit-minus-credit convention.
    #[instrument(skip(self))]
    pub async fn account_ledger(
        &self,
        account_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<AccountLedgerReport, ServiceError> {
        let db = &*self.db_pool;

        let account = AccountEntity::find_by_id(account_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("會計科目 {} 不存在", account_id)))?;

        let mut query = JournalEntity::find().filter(
            Condition::any()
                .add(journal_entry::Column::DebitAccountId.eq(account_id))
                .add(journal_entry::Column::CreditAccountId.eq(account_id)),
        );
        if let Some(start) = start_date {
            query = query.filter(journal_entry::Column::JournalDate.gte(start));
        }
        if let Some(end) = end_date {
            query = query.filter(journal_entry::Column::JournalDate.lte(end));
        }
        let entries = query
            .order_by_asc(journal_entry::Column::JournalDate)
            .order_by_asc(journal_entry::Column::CreatedAt)
            .all(db)
            .await?;

        let mut running = Decimal::ZERO;
        let items = entries
            .into_iter()
            .map(|entry| {
                let (debit, credit) = if entry.debit_account_id == account_id {
                    (entry.amount, Decimal::ZERO)
                } else {
                    (Decimal::ZERO, entry.amount)
                };
                running += debit - credit;
                LedgerRow {
                    entry_id: entry.id,
                    journal_number: entry.journal_number,
                    journal_date: entry.journal_date,
                    description: entry.description,
                    debit,
                    credit,
                    running_balance: running,
                }
            })
            .collect();

        Ok(AccountLedgerReport {
            account_id,
            account_code: account.account_code,
            account_name: account.account_name,
            items,
            ending_balance: running,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(
        code: &str,
        kind: AccountType,
        debit: Decimal,
        credit: Decimal,
    ) -> AccountActivity {
        AccountActivity {
            account_id: Uuid::new_v4(),
            account_code: code.into(),
            account_name: format!("Account {}", code),
            account_type: kind,
            total_debit: debit,
            total_credit: credit,
        }
    }

    #[test]
    fn normal_balance_follows_account_direction() {
        let cash = activity("1101", AccountType::Asset, dec!(500), dec!(200));
        assert_eq!(cash.normal_balance(), dec!(300));

        let revenue = activity("4101", AccountType::Revenue, dec!(0), dec!(900));
        assert_eq!(revenue.normal_balance(), dec!(900));

        let loan = activity("2201", AccountType::LongTermLiability, dec!(100), dec!(400));
        assert_eq!(loan.normal_balance(), dec!(300));
    }

    #[test]
    fn trial_balance_totals_and_difference() {
        let activities = vec![
            activity("1101", AccountType::Asset, dec!(1000), dec!(0)),
            activity("4101", AccountType::Revenue, dec!(0), dec!(1000)),
            activity("9999", AccountType::Expense, dec!(0), dec!(0)),
        ];
        let report = build_trial_balance(None, &activities);

        // Zero-activity account is excluded.
        assert_eq!(report.items.len(), 2);
        assert_eq!(report.total_debit, dec!(1000));
        assert_eq!(report.total_credit, dec!(1000));
        assert_eq!(report.difference, report.total_debit - report.total_credit);
        assert!(report.is_balanced);
    }

    #[test]
    fn trial_balance_detects_imbalance() {
        let activities = vec![
            activity("1101", AccountType::Asset, dec!(1000), dec!(0)),
            activity("4101", AccountType::Revenue, dec!(0), dec!(999.98)),
        ];
        let report = build_trial_balance(None, &activities);
        assert_eq!(report.difference, dec!(0.02));
        assert!(!report.is_balanced);
    }

    #[test]
    fn income_statement_nets_revenue_against_expenses() {
        let activities = vec![
            activity("4101", AccountType::Revenue, dec!(0), dec!(800)),
            activity("5101", AccountType::Expense, dec!(300), dec!(0)),
            // Asset activity must not leak into the income statement.
            activity("1101", AccountType::Asset, dec!(500), dec!(0)),
        ];
        let report = build_income_statement(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            &activities,
        );
        assert_eq!(report.revenue.total, dec!(800));
        assert_eq!(report.expenses.total, dec!(300));
        assert_eq!(report.net_income, dec!(500));
        assert_eq!(report.revenue.items.len(), 1);
        assert_eq!(report.expenses.items.len(), 1);
    }

    #[test]
    fn balance_sheet_checks_accounting_equation() {
        let activities = vec![
            activity("1101", AccountType::Asset, dec!(100), dec!(0)),
            activity("2101", AccountType::Liability, dec!(0), dec!(60)),
            activity("3101", AccountType::Equity, dec!(0), dec!(40)),
        ];
        let report =
            build_balance_sheet(NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(), &activities);
        assert_eq!(report.assets.total, dec!(100));
        assert_eq!(report.liabilities.total, dec!(60));
        assert_eq!(report.equity.total, dec!(40));
        assert!(report.balance_check);
    }

    #[test]
    fn balance_sheet_flags_broken_equation() {
        let activities = vec![
            activity("1101", AccountType::Asset, dec!(100), dec!(0)),
            activity("2101", AccountType::Liability, dec!(0), dec!(50)),
        ];
        let report =
            build_balance_sheet(NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(), &activities);
        assert!(!report.balance_check);
    }

    #[test]
    fn cash_flow_buckets_partition_account_types() {
        let activities = vec![
            activity("4101", AccountType::Revenue, dec!(0), dec!(500)),
            activity("1201", AccountType::FixedAsset, dec!(200), dec!(0)),
            activity("3101", AccountType::Capital, dec!(0), dec!(300)),
            // Plain asset belongs to no bucket.
            activity("1101", AccountType::Asset, dec!(100), dec!(0)),
        ];
        let report = build_cash_flow(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            &activities,
        );
        assert_eq!(report.operating.net_cash_flow, dec!(500));
        assert_eq!(report.investing.net_cash_flow, dec!(-200));
        assert_eq!(report.financing.net_cash_flow, dec!(300));
        assert_eq!(report.net_cash_flow, dec!(600));
    }
}
