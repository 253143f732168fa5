pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod openapi;
pub mod services;

use crate::auth::AuthRouterExt;
use axum::Router;
use std::sync::Arc;

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<db::DbPool>,
    pub config: Arc<config::AppConfig>,
    pub services: services::AppServices,
}

impl AppState {
    pub fn new(db: Arc<db::DbPool>, config: config::AppConfig) -> Self {
        let services = services::AppServices::new(db.clone());
        Self {
            db,
            config: Arc::new(config),
            services,
        }
    }
}

/// Builds the `/api/v1` router.
///
/// Accounting, fee, rental, profit-sharing, roster, and anomaly mutations
/// require the `admin` role; activity registration and read endpoints accept
/// any authenticated caller; the investment storefront is unauthenticated.
pub fn api_v1_routes() -> Router<AppState> {
    let admin = Router::new()
        .nest("/accounting-accounts", handlers::accounts::routes())
        .nest("/accounting-categories", handlers::categories::routes())
        .nest("/accounting-journal", handlers::journal::routes())
        .nest("/accounting-reports", handlers::reports::routes())
        .nest(
            "/accounting-monthly-closings",
            handlers::closings::routes(),
        )
        .nest(
            "/accounting-receivables",
            handlers::settlements::receivable_routes(),
        )
        .nest(
            "/accounting-payables",
            handlers::settlements::payable_routes(),
        )
        .nest("/investments", handlers::investments::routes())
        .nest("/rentals", handlers::rentals::routes())
        .nest("/profit-sharing", handlers::profit_sharing::routes())
        .nest("/fees", handlers::fees::routes())
        .nest("/users", handlers::users::routes())
        .nest("/companies", handlers::companies::routes())
        .nest("/anomalies", handlers::anomalies::routes())
        .with_role("admin");

    let authenticated = Router::new()
        .nest("/activities", handlers::activities::routes())
        .with_auth();

    let public = Router::new().nest("/investments", handlers::investments::public_routes());

    Router::new().merge(admin).merge(authenticated).merge(public)
}

/// Root router: health endpoints, versioned API, OpenAPI UI.
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(handlers::health::routes())
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_routes())
}
