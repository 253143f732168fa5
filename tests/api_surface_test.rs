mod common;

use axum::http::{Method, StatusCode};
use common::{make_token, TestApp};
use serde_json::json;

#[tokio::test]
async fn admin_routes_require_an_admin_token() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request(Method::GET, "/api/v1/accounting-accounts", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let member_token = make_token(&["member"]);
    let (status, _) = app
        .request(
            Method::GET,
            "/api/v1/accounting-accounts",
            None,
            Some(&member_token),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .admin(Method::GET, "/api/v1/accounting-accounts", None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn account_crud_round_trip_over_http() {
    let app = TestApp::new().await;

    let body = json!({
        "account_code": "1101",
        "account_name": "現金",
        "account_type": "current_asset"
    });
    let (status, created) = app
        .admin(
            Method::POST,
            "/api/v1/accounting-accounts",
            Some(body.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["account_code"], "1101");
    let id = created["id"].as_str().expect("missing id").to_string();

    // Same code again collides.
    let (status, err) = app
        .admin(Method::POST, "/api/v1/accounting-accounts", Some(body))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(err["message"].as_str().is_some());

    let (status, fetched) = app
        .admin(
            Method::GET,
            &format!("/api/v1/accounting-accounts/{}", id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["account_name"], "現金");

    let (status, updated) = app
        .admin(
            Method::PUT,
            &format!("/api/v1/accounting-accounts/{}", id),
            Some(json!({"account_name": "零用金"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["account_name"], "零用金");

    let (status, listed) = app
        .admin(Method::GET, "/api/v1/accounting-accounts?search=零用", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["pagination"]["total"], 1);
    assert_eq!(listed["items"][0]["id"].as_str(), Some(id.as_str()));

    let (status, _) = app
        .admin(
            Method::DELETE,
            &format!("/api/v1/accounting-accounts/{}", id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Soft-deleted accounts drop out of the default listing.
    let (status, listed) = app
        .admin(Method::GET, "/api/v1/accounting-accounts", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["pagination"]["total"], 0);
}

#[tokio::test]
async fn journal_update_can_clear_optional_fields() {
    let app = TestApp::new().await;

    let mut account_ids = Vec::new();
    for (code, name, kind) in [("1101", "現金", "current_asset"), ("4101", "會費收入", "revenue")] {
        let (status, created) = app
            .admin(
                Method::POST,
                "/api/v1/accounting-accounts",
                Some(json!({
                    "account_code": code,
                    "account_name": name,
                    "account_type": kind
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        account_ids.push(created["id"].as_str().unwrap().to_string());
    }
    let (status, category) = app
        .admin(
            Method::POST,
            "/api/v1/accounting-categories",
            Some(json!({"name": "會費"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, entry) = app
        .admin(
            Method::POST,
            "/api/v1/accounting-journal",
            Some(json!({
                "journal_number": "J-0001",
                "journal_date": "2026-08-01",
                "debit_account_id": account_ids[0],
                "credit_account_id": account_ids[1],
                "amount": "1000",
                "category_id": category["id"],
                "description": "八月會費"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let entry_id = entry["id"].as_str().unwrap().to_string();

    // Omitted fields are left untouched.
    let (status, updated) = app
        .admin(
            Method::PUT,
            &format!("/api/v1/accounting-journal/{}", entry_id),
            Some(json!({"description": "八月常年會費"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "八月常年會費");
    assert_eq!(updated["category_id"], category["id"]);

    // The clear flags blank them out.
    let (status, cleared) = app
        .admin(
            Method::PUT,
            &format!("/api/v1/accounting-journal/{}", entry_id),
            Some(json!({"clear_description": true, "clear_category": true})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["description"].is_null());
    assert!(cleared["category_id"].is_null());
}

#[tokio::test]
async fn public_investment_listing_needs_no_token() {
    let app = TestApp::new().await;

    let open_public = json!({
        "title": "西屯商辦出租案",
        "description": "年化報酬約5%",
        "min_amount": "100000",
        "expected_return_rate": "0.05",
        "status": "open",
        "is_public": true
    });
    let (status, created) = app
        .admin(Method::POST, "/api/v1/investments", Some(open_public))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let public_id = created["id"].as_str().expect("missing id").to_string();

    let hidden = json!({
        "title": "內部評估中案件",
        "min_amount": "50000",
        "expected_return_rate": "0.03",
        "status": "draft",
        "is_public": false
    });
    let (status, _) = app
        .admin(Method::POST, "/api/v1/investments", Some(hidden))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, listed) = app
        .request(Method::GET, "/api/v1/investments/public", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["pagination"]["total"], 1);
    assert_eq!(listed["items"][0]["title"], "西屯商辦出租案");

    let (status, inquiry) = app
        .request(
            Method::POST,
            &format!("/api/v1/investments/{}/inquiries", public_id),
            Some(json!({
                "name": "張先生",
                "email": "chang@example.com",
                "message": "想了解最低投資額"
            })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(inquiry["email"], "chang@example.com");

    let (status, inquiries) = app
        .admin(Method::GET, "/api/v1/investments/inquiries", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inquiries["pagination"]["total"], 1);
}

#[tokio::test]
async fn health_endpoints_answer_without_auth() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.request(Method::GET, "/status", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], true);
}
