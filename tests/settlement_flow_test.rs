mod common;

use backoffice_api::{
    entities::receivable::SettlementStatus,
    errors::ServiceError,
    services::settlements::{OpenItemInput, OpenItemListFilter},
};
use chrono::NaiveDate;
use common::TestApp;
use rust_decimal_macros::dec;

fn item(counterparty: &str, amount: rust_decimal::Decimal) -> OpenItemInput {
    OpenItemInput {
        counterparty: counterparty.into(),
        description: None,
        amount,
        due_date: NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
    }
}

#[tokio::test]
async fn partial_payments_settle_a_receivable() {
    let app = TestApp::new().await;
    let receivable = app
        .state
        .services
        .receivables
        .create_receivable(item("大安建設", dec!(1000)))
        .await
        .expect("create failed");
    assert_eq!(receivable.status, SettlementStatus::Pending);

    let after_first = app
        .state
        .services
        .receivables
        .record_payment(receivable.id, dec!(400))
        .await
        .expect("payment failed");
    assert_eq!(after_first.payment_amount, dec!(400));
    assert_eq!(after_first.remaining_amount, dec!(600));
    assert_eq!(after_first.status, SettlementStatus::Partial);

    let after_second = app
        .state
        .services
        .receivables
        .record_payment(receivable.id, dec!(600))
        .await
        .expect("payment failed");
    assert_eq!(after_second.remaining_amount, dec!(0));
    assert_eq!(after_second.status, SettlementStatus::Paid);

    // A settled item takes no further payments.
    let err = app
        .state
        .services
        .receivables
        .record_payment(receivable.id, dec!(1))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn overpayment_is_rejected() {
    let app = TestApp::new().await;
    let receivable = app
        .state
        .services
        .receivables
        .create_receivable(item("信義營造", dec!(1000)))
        .await
        .expect("create failed");

    let err = app
        .state
        .services
        .receivables
        .record_payment(receivable.id, dec!(1100))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    // The failed attempt changed nothing.
    let unchanged = app
        .state
        .services
        .receivables
        .get_receivable(receivable.id)
        .await
        .expect("get failed");
    assert_eq!(unchanged.payment_amount, dec!(0));
    assert_eq!(unchanged.status, SettlementStatus::Pending);
}

#[tokio::test]
async fn delete_is_refused_after_a_payment() {
    let app = TestApp::new().await;
    let payable = app
        .state
        .services
        .payables
        .create_payable(item("物業管理公司", dec!(500)))
        .await
        .expect("create failed");

    app.state
        .services
        .payables
        .record_payment(payable.id, dec!(100))
        .await
        .expect("payment failed");

    let err = app
        .state
        .services
        .payables
        .delete_payable(payable.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn status_filter_narrows_the_list() {
    let app = TestApp::new().await;
    let services = &app.state.services;
    let a = services
        .receivables
        .create_receivable(item("甲公司", dec!(100)))
        .await
        .expect("create failed");
    services
        .receivables
        .create_receivable(item("乙公司", dec!(200)))
        .await
        .expect("create failed");
    services
        .receivables
        .record_payment(a.id, dec!(100))
        .await
        .expect("payment failed");

    let (paid, total) = services
        .receivables
        .list_receivables(
            OpenItemListFilter {
                status: Some(SettlementStatus::Paid),
                counterparty: None,
                due_before: None,
            },
            1,
            20,
        )
        .await
        .expect("list failed");
    assert_eq!(total, 1);
    assert_eq!(paid[0].counterparty, "甲公司");
}
