use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use backoffice_api::{
    auth::{AuthVerifier, Claims},
    config::AppConfig,
    db::{self, DbConfig},
    AppState,
};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_purposes_only_32chars";

/// Test harness backed by an in-memory SQLite database with a single
/// connection so every query sees the same schema.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    admin_token: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = db::establish_connection_with_config(&DbConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
        })
        .await
        .expect("failed to open test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");

        let cfg = AppConfig::new(
            "sqlite::memory:",
            TEST_JWT_SECRET,
            "127.0.0.1",
            0,
            "test",
        );
        let state = AppState::new(Arc::new(pool), cfg);

        let verifier = Arc::new(AuthVerifier::new(TEST_JWT_SECRET));
        let router = backoffice_api::app_routes()
            .layer(axum::middleware::from_fn_with_state(
                verifier,
                |axum::extract::State(verifier): axum::extract::State<Arc<AuthVerifier>>,
                 mut req: axum::http::Request<Body>,
                 next: axum::middleware::Next| async move {
                    req.extensions_mut().insert(verifier);
                    next.run(req).await
                },
            ))
            .with_state(state.clone());

        let admin_token = make_token(&["admin"]);
        Self {
            router,
            state,
            admin_token,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Shorthand for an admin-authenticated request.
    pub async fn admin(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let token = self.admin_token.clone();
        self.request(method, uri, body, Some(&token)).await
    }
}

pub fn make_token(roles: &[&str]) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: "test-user".into(),
        name: Some("Test Operator".into()),
        email: Some("operator@example.com".into()),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        exp: (now + 3600) as usize,
        iat: now as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode token")
}
