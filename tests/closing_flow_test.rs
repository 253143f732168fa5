mod common;

use backoffice_api::{
    entities::account::AccountType,
    errors::ServiceError,
    services::{
        accounts::CreateAccountInput,
        closings::ClosingListFilter,
        journal::CreateJournalEntryInput,
    },
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

async fn seed_entry(
    app: &TestApp,
    number: &str,
    date: NaiveDate,
    debit: Uuid,
    credit: Uuid,
    amount: rust_decimal::Decimal,
) {
    app.state
        .services
        .journal
        .create_entry(CreateJournalEntryInput {
            journal_number: number.into(),
            journal_date: date,
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
async fn closing_a_month_locks_its_journal() {
    let app = TestApp::new().await;
    let cash = seed_account(&app, "1001", "現金", AccountType::CurrentAsset).await;
    let revenue = seed_account(&app, "4001", "會費收入", AccountType::Revenue).await;

    let march = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
    seed_entry(&app, "J-2026-001", march, cash, revenue, dec!(1000)).await;
    seed_entry(&app, "J-2026-002", march, cash, revenue, dec!(250.50)).await;

    let closing = app
        .state
        .services
        .closings
        .close_month(2026, 3, "admin".into(), None)
        .await
        .expect("closing failed");
    assert_eq!(closing.total_debit, dec!(1250.50));
    assert_eq!(closing.total_credit, dec!(1250.50));
    assert_eq!(closing.balance, dec!(0));

    // Same period again is a conflict with the exact operator message.
    let err = app
        .state
        .services
        .closings
        .close_month(2026, 3, "admin".into(), None)
        .await
        .unwrap_err();
    match err {
        ServiceError::Conflict(msg) => assert_eq!(msg, "該年月的月結記錄已存在"),
        other => panic!("expected conflict, got {:?}", other),
    }

    // The closed month rejects new entries.
    let err = app
        .state
        .services
        .journal
        .create_entry(CreateJournalEntryInput {
            journal_number: "J-2026-003".into(),
            journal_date: march,
            debit_account_id: cash,
            credit_account_id: revenue,
            amount: dec!(10),
            category_id: None,
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidOperation(_)));

    // An adjacent open month still accepts entries.
    let april = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
    seed_entry(&app, "J-2026-004", april, cash, revenue, dec!(99)).await;
}

#[tokio::test]
async fn empty_month_cannot_be_closed() {
    let app = TestApp::new().await;
    let err = app
        .state
        .services
        .closings
        .close_month(2026, 7, "admin".into(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn check_period_reports_eligibility() {
    let app = TestApp::new().await;
    let cash = seed_account(&app, "1001", "現金", AccountType::CurrentAsset).await;
    let revenue = seed_account(&app, "4001", "會費收入", AccountType::Revenue).await;
    seed_entry(
        &app,
        "J-1",
        NaiveDate::from_ymd_opt(2026, 5, 2).unwrap(),
        cash,
        revenue,
        dec!(500),
    )
    .await;

    let check = app
        .state
        .services
        .closings
        .check_period(2026, 5)
        .await
        .expect("check failed");
    assert!(!check.already_closed);
    assert_eq!(check.totals.entry_count, 1);
    assert!(check.can_close);

    app.state
        .services
        .closings
        .close_month(2026, 5, "admin".into(), Some("期末結帳".into()))
        .await
        .expect("closing failed");

    let check = app
        .state
        .services
        .closings
        .check_period(2026, 5)
        .await
        .expect("check failed");
    assert!(check.already_closed);
    assert!(!check.can_close);

    let (items, total) = app
        .state
        .services
        .closings
        .list_closings(
            ClosingListFilter {
                closing_year: Some(2026),
                status: None,
            },
            1,
            20,
        )
        .await
        .expect("list failed");
    assert_eq!(total, 1);
    assert_eq!(items[0].closing_month, 5);
}

#[tokio::test]
async fn closed_record_cannot_be_deleted() {
    let app = TestApp::new().await;
    let cash = seed_account(&app, "1001", "現金", AccountType::CurrentAsset).await;
    let revenue = seed_account(&app, "4001", "會費收入", AccountType::Revenue).await;
    seed_entry(
        &app,
        "J-1",
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
        cash,
        revenue,
        dec!(100),
    )
    .await;

    let closing = app
        .state
        .services
        .closings
        .close_month(2026, 6, "admin".into(), None)
        .await
        .expect("closing failed");

    let err = app
        .state
        .services
        .closings
        .delete_closing(closing.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidOperation(_)));

    // Notes stay editable after closing.
    let updated = app
        .state
        .services
        .closings
        .update_notes(closing.id, Some("補充說明".into()))
        .await
        .expect("update failed");
    assert_eq!(updated.notes.as_deref(), Some("補充說明"));
}
