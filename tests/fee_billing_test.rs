mod common;

use backoffice_api::{
    entities::{fee_invoice::InvoiceStatus, fee_setting::FeeFrequency, user::UserRole},
    errors::ServiceError,
    services::{
        fees::{FeeSettingInput, InvoiceListFilter},
        users::UserInput,
    },
};
use common::TestApp;
use rust_decimal_macros::dec;
use uuid::Uuid;

async fn seed_member(app: &TestApp, email: &str, name: &str) -> Uuid {
    app.state
        .services
        .users
        .create_user(UserInput {
            email: email.into(),
            name: name.into(),
            phone: None,
            role: UserRole::Member,
        })
        .await
        .expect("member creation failed")
        .id
}

#[tokio::test]
async fn invoice_generation_is_idempotent_per_period() {
    let app = TestApp::new().await;
    let fees = &app.state.services.fees;

    seed_member(&app, "mei@example.com", "王小美").await;
    seed_member(&app, "chen@example.com", "陳大明").await;
    // Staff are not billed.
    app.state
        .services
        .users
        .create_user(UserInput {
            email: "staff@example.com".into(),
            name: "行政人員".into(),
            phone: None,
            role: UserRole::Staff,
        })
        .await
        .expect("staff creation failed");

    let setting = fees
        .create_setting(FeeSettingInput {
            name: "常年會費".into(),
            amount: dec!(1200),
            frequency: FeeFrequency::Annual,
        })
        .await
        .expect("setting creation failed");

    let first = fees
        .generate_invoices(setting.id, "2026".into())
        .await
        .expect("generation failed");
    assert_eq!(first.generated, 2);
    assert_eq!(first.skipped, 0);

    // A new member joins, then the run is repeated. Only the newcomer
    // gets an invoice.
    seed_member(&app, "lin@example.com", "林新人").await;
    let second = fees
        .generate_invoices(setting.id, "2026".into())
        .await
        .expect("second generation failed");
    assert_eq!(second.generated, 1);
    assert_eq!(second.skipped, 2);

    let (invoices, total) = fees
        .list_invoices(
            InvoiceListFilter {
                member_id: None,
                status: Some(InvoiceStatus::Unpaid),
                period: Some("2026".into()),
            },
            1,
            20,
        )
        .await
        .expect("list failed");
    assert_eq!(total, 3);
    assert!(invoices.iter().all(|i| i.amount == dec!(1200)));
}

#[tokio::test]
async fn inactive_setting_refuses_generation() {
    let app = TestApp::new().await;
    let fees = &app.state.services.fees;

    let setting = fees
        .create_setting(FeeSettingInput {
            name: "停辦費用".into(),
            amount: dec!(500),
            frequency: FeeFrequency::Monthly,
        })
        .await
        .expect("setting creation failed");
    fees.deactivate_setting(setting.id)
        .await
        .expect("deactivation failed");

    let err = fees
        .generate_invoices(setting.id, "2026-08".into())
        .await
        .expect_err("generation should be refused");
    assert!(matches!(err, ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn paid_and_waived_invoices_are_terminal() {
    let app = TestApp::new().await;
    let fees = &app.state.services.fees;

    seed_member(&app, "mei@example.com", "王小美").await;
    let setting = fees
        .create_setting(FeeSettingInput {
            name: "月費".into(),
            amount: dec!(300),
            frequency: FeeFrequency::Monthly,
        })
        .await
        .expect("setting creation failed");
    fees.generate_invoices(setting.id, "2026-07".into())
        .await
        .expect("generation failed");
    fees.generate_invoices(setting.id, "2026-08".into())
        .await
        .expect("generation failed");

    let (invoices, _) = fees
        .list_invoices(
            InvoiceListFilter {
                member_id: None,
                status: None,
                period: None,
            },
            1,
            20,
        )
        .await
        .expect("list failed");
    assert_eq!(invoices.len(), 2);

    let paid = fees
        .pay_invoice(invoices[0].id)
        .await
        .expect("payment failed");
    assert_eq!(paid.status, InvoiceStatus::Paid);
    assert!(paid.paid_at.is_some());

    let waived = fees
        .waive_invoice(invoices[1].id)
        .await
        .expect("waiver failed");
    assert_eq!(waived.status, InvoiceStatus::Waived);
    assert!(waived.paid_at.is_none());

    // Neither can change state again.
    let err = fees
        .waive_invoice(paid.id)
        .await
        .expect_err("paid invoice cannot be waived");
    assert!(matches!(err, ServiceError::InvalidOperation(_)));
    let err = fees
        .pay_invoice(waived.id)
        .await
        .expect_err("waived invoice cannot be paid");
    assert!(matches!(err, ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn member_summary_splits_billed_paid_and_outstanding() {
    let app = TestApp::new().await;
    let fees = &app.state.services.fees;

    let member_id = seed_member(&app, "mei@example.com", "王小美").await;
    let setting = fees
        .create_setting(FeeSettingInput {
            name: "月費".into(),
            amount: dec!(300),
            frequency: FeeFrequency::Monthly,
        })
        .await
        .expect("setting creation failed");
    for period in ["2026-06", "2026-07", "2026-08"] {
        fees.generate_invoices(setting.id, period.into())
            .await
            .expect("generation failed");
    }

    let (invoices, _) = fees
        .list_invoices(
            InvoiceListFilter {
                member_id: Some(member_id),
                status: None,
                period: None,
            },
            1,
            20,
        )
        .await
        .expect("list failed");
    assert_eq!(invoices.len(), 3);
    fees.pay_invoice(invoices[0].id).await.expect("pay failed");
    fees.waive_invoice(invoices[1].id)
        .await
        .expect("waive failed");

    let summary = fees
        .member_summary(member_id)
        .await
        .expect("summary failed");
    assert_eq!(summary.total_billed, dec!(900));
    assert_eq!(summary.total_paid, dec!(300));
    assert_eq!(summary.total_waived, dec!(300));
    assert_eq!(summary.outstanding, dec!(300));
    assert_eq!(summary.unpaid_invoices.len(), 1);

    let err = fees
        .member_summary(Uuid::new_v4())
        .await
        .expect_err("unknown member should be rejected");
    assert!(matches!(err, ServiceError::NotFound(_)));
}
