mod common;

use backoffice_api::{
    entities::{
        activity_registration::{self, RegistrationStatus},
        user::UserRole,
    },
    errors::ServiceError,
    services::{activities::ActivityInput, users::UserInput},
};
use chrono::{Duration, Utc};
use common::TestApp;
use sea_orm::{ActiveModelTrait, Set, SqlErr};
use uuid::Uuid;

fn open_activity(capacity: i32) -> ActivityInput {
    ActivityInput {
        title: "年度會員大會".into(),
        description: Some("含午餐".into()),
        location: Some("台北市大安區".into()),
        starts_at: Utc::now() + Duration::days(14),
        registration_deadline: Utc::now() + Duration::days(7),
        capacity,
        is_published: true,
    }
}

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
async fn capacity_and_duplicate_rules_gate_registration() {
    let app = TestApp::new().await;
    let activities = &app.state.services.activities;

    let activity = activities
        .create_activity(open_activity(2))
        .await
        .expect("activity creation failed");
    let alice = seed_member(&app, "a@example.com", "王小美").await;
    let bob = seed_member(&app, "b@example.com", "陳大明").await;
    let carol = seed_member(&app, "c@example.com", "林新人").await;

    activities
        .register(activity.id, alice)
        .await
        .expect("first registration failed");
    let err = activities
        .register(activity.id, alice)
        .await
        .expect_err("duplicate registration should be refused");
    assert!(matches!(err, ServiceError::Conflict(_)));

    activities
        .register(activity.id, bob)
        .await
        .expect("second registration failed");
    let err = activities
        .register(activity.id, carol)
        .await
        .expect_err("full activity should refuse");
    assert!(matches!(err, ServiceError::InvalidOperation(_)));

    // Cancelling frees a seat and the row survives for the audit trail.
    let cancelled = activities
        .cancel_registration(activity.id, alice)
        .await
        .expect("cancellation failed");
    assert_eq!(cancelled.status, RegistrationStatus::Cancelled);
    activities
        .register(activity.id, carol)
        .await
        .expect("freed seat should accept a new registration");

    let rows = activities
        .list_registrations(activity.id, true)
        .await
        .expect("list failed");
    assert_eq!(rows.len(), 3);
    let active = activities
        .list_registrations(activity.id, false)
        .await
        .expect("list failed");
    assert_eq!(active.len(), 2);
}

#[tokio::test]
async fn duplicate_live_registration_is_rejected_by_the_database() {
    let app = TestApp::new().await;
    let activities = &app.state.services.activities;

    let activity = activities
        .create_activity(open_activity(10))
        .await
        .expect("activity creation failed");
    let member = seed_member(&app, "a@example.com", "王小美").await;
    activities
        .register(activity.id, member)
        .await
        .expect("registration failed");

    // Writing a second live row directly, sidestepping the service's
    // duplicate check, must hit the partial unique index.
    let raw = activity_registration::ActiveModel {
        id: Set(Uuid::new_v4()),
        activity_id: Set(activity.id),
        member_id: Set(member),
        status: Set(RegistrationStatus::Registered),
        created_at: Set(Utc::now()),
    };
    let err = raw
        .insert(&*app.state.db)
        .await
        .expect_err("duplicate row should violate the index");
    assert!(matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_))
    ));

    // A cancelled row does not occupy the slot.
    activities
        .cancel_registration(activity.id, member)
        .await
        .expect("cancellation failed");
    activities
        .register(activity.id, member)
        .await
        .expect("re-registration after cancel should succeed");
}

#[tokio::test]
async fn deadline_and_publication_gate_registration() {
    let app = TestApp::new().await;
    let activities = &app.state.services.activities;
    let member = seed_member(&app, "a@example.com", "王小美").await;

    let mut input = open_activity(10);
    input.starts_at = Utc::now() + Duration::days(1);
    input.registration_deadline = Utc::now() - Duration::hours(1);
    let expired = activities
        .create_activity(input)
        .await
        .expect("activity creation failed");
    let err = activities
        .register(expired.id, member)
        .await
        .expect_err("past deadline should refuse");
    assert!(matches!(err, ServiceError::InvalidOperation(_)));

    let mut input = open_activity(10);
    input.is_published = false;
    let draft = activities
        .create_activity(input)
        .await
        .expect("activity creation failed");
    let err = activities
        .register(draft.id, member)
        .await
        .expect_err("unpublished activity should look absent");
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn capacity_cannot_drop_below_headcount() {
    let app = TestApp::new().await;
    let activities = &app.state.services.activities;

    let activity = activities
        .create_activity(open_activity(5))
        .await
        .expect("activity creation failed");
    for (email, name) in [("a@example.com", "甲"), ("b@example.com", "乙")] {
        let member = seed_member(&app, email, name).await;
        activities
            .register(activity.id, member)
            .await
            .expect("registration failed");
    }

    let mut shrunk = open_activity(1);
    shrunk.title = activity.title.clone();
    let err = activities
        .update_activity(activity.id, shrunk)
        .await
        .expect_err("capacity below headcount should refuse");
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let mut ok = open_activity(2);
    ok.title = activity.title.clone();
    let updated = activities
        .update_activity(activity.id, ok)
        .await
        .expect("capacity equal to headcount is allowed");
    assert_eq!(updated.capacity, 2);

    let err = activities
        .delete_activity(activity.id)
        .await
        .expect_err("activity with registrations cannot be deleted");
    assert!(matches!(err, ServiceError::InvalidOperation(_)));
}
