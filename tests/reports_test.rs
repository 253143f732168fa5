mod common;

use backoffice_api::{
    entities::account::AccountType,
    services::{accounts::CreateAccountInput, journal::CreateJournalEntryInput},
};
use chrono::NaiveDate;
use common::TestApp;
use rust_decimal_macros::dec;
use uuid::Uuid;

async fn seed_account(app: &TestApp, code: &str, name: &str, kind: AccountType) -> Uuid {
    app.state
        .services
        .accounts
        .create_account(CreateAccountInput {
            account_code: code.into(),
            account_name: name.into(),
            account_type: kind,
            parent_account_id: None,
        })
        .await
        .expect("account creation failed")
        .id
}

async fn seed_entry(app: &TestApp, number: &str, debit: Uuid, credit: Uuid, amount: rust_decimal::Decimal) {
    app.state
        .services
        .journal
        .create_entry(CreateJournalEntryInput {
            journal_number: number.into(),
            journal_date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            debit_account_id: debit,
            credit_account_id: credit,
            amount,
            category_id: None,
            description: None,
        })
        .await
        .expect("journal entry creation failed");
}

#[tokio::test]
async fn trial_balance_is_balanced_by_construction() {
    let app = TestApp::new().await;
    let cash = seed_account(&app, "1001", "現金", AccountType::CurrentAsset).await;
    let revenue = seed_account(&app, "4001", "租金收入", AccountType::Revenue).await;
    let expense = seed_account(&app, "5001", "管理費用", AccountType::Expense).await;

    seed_entry(&app, "J-1", cash, revenue, dec!(1000)).await;
    seed_entry(&app, "J-2", expense, cash, dec!(300)).await;

    let report = app
        .state
        .services
        .reports
        .trial_balance(None)
        .await
        .expect("report failed");
    assert!(report.is_balanced);
    assert_eq!(report.total_debit, dec!(1300));
    assert_eq!(report.total_credit, dec!(1300));
    // Three active accounts, all with activity.
    assert_eq!(report.items.len(), 3);

    let cash_row = report
        .items
        .iter()
        .find(|r| r.account_code == "1001")
        .expect("cash row missing");
    assert_eq!(cash_row.total_debit, dec!(1000));
    assert_eq!(cash_row.total_credit, dec!(300));
    assert_eq!(cash_row.normal_balance, dec!(700));
}

#[tokio::test]
async fn income_statement_nets_revenue_against_expenses() {
    let app = TestApp::new().await;
    let cash = seed_account(&app, "1001", "現金", AccountType::CurrentAsset).await;
    let revenue = seed_account(&app, "4001", "會費收入", AccountType::Revenue).await;
    let expense = seed_account(&app, "5001", "活動支出", AccountType::Expense).await;

    seed_entry(&app, "J-1", cash, revenue, dec!(2000)).await;
    seed_entry(&app, "J-2", expense, cash, dec!(450)).await;

    let report = app
        .state
        .services
        .reports
        .income_statement(
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        )
        .await
        .expect("report failed");
    assert_eq!(report.revenue.total, dec!(2000));
    assert_eq!(report.expenses.total, dec!(450));
    assert_eq!(report.net_income, dec!(1550));
}

#[tokio::test]
async fn balance_sheet_balances_assets_against_liabilities_and_equity() {
    let app = TestApp::new().await;
    let cash = seed_account(&app, "1001", "現金", AccountType::CurrentAsset).await;
    let loan = seed_account(&app, "2001", "銀行借款", AccountType::Liability).await;
    let capital = seed_account(&app, "3001", "股本", AccountType::Capital).await;

    // 100 assets financed by 60 liabilities and 40 capital.
    seed_entry(&app, "J-1", cash, loan, dec!(60)).await;
    seed_entry(&app, "J-2", cash, capital, dec!(40)).await;

    let report = app
        .state
        .services
        .reports
        .balance_sheet(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap())
        .await
        .expect("report failed");
    assert_eq!(report.assets.total, dec!(100));
    assert_eq!(report.liabilities.total, dec!(60));
    assert_eq!(report.equity.total, dec!(40));
    assert!(report.balance_check);
}

#[tokio::test]
async fn account_ledger_keeps_a_running_balance() {
    let app = TestApp::new().await;
    let cash = seed_account(&app, "1001", "現金", AccountType::CurrentAsset).await;
    let revenue = seed_account(&app, "4001", "收入", AccountType::Revenue).await;
    let expense = seed_account(&app, "5001", "支出", AccountType::Expense).await;

    seed_entry(&app, "J-1", cash, revenue, dec!(1000)).await;
    seed_entry(&app, "J-2", expense, cash, dec!(250)).await;

    let ledger = app
        .state
        .services
        .reports
        .account_ledger(cash, None, None)
        .await
        .expect("report failed");
    assert_eq!(ledger.items.len(), 2);
    assert_eq!(ledger.items.last().unwrap().running_balance, dec!(750));
}

#[tokio::test]
async fn inactive_accounts_are_excluded_from_reports() {
    let app = TestApp::new().await;
    let cash = seed_account(&app, "1001", "現金", AccountType::CurrentAsset).await;
    let revenue = seed_account(&app, "4001", "收入", AccountType::Revenue).await;
    let unused = seed_account(&app, "9999", "未使用科目", AccountType::Expense).await;

    seed_entry(&app, "J-1", cash, revenue, dec!(10)).await;
    app.state
        .services
        .accounts
        .deactivate_account(unused)
        .await
        .expect("deactivate failed");

    let report = app
        .state
        .services
        .reports
        .trial_balance(None)
        .await
        .expect("report failed");
    assert!(report.items.iter().all(|r| r.account_code != "9999"));
}
