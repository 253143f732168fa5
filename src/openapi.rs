use crate::AppState;
use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Back-office API",
        version = env!("CARGO_PKG_VERSION"),
        description = r#"
Administrative API for a membership and investment organization: chart of
accounts, double-entry journal, financial reports, month-end closings,
receivables/payables, investment listings, rentals, profit sharing,
membership fees, and activities.

All endpoints except `/health`, `/status`, the public investment listing,
and inquiry submission require a bearer token from the identity service:

```
Authorization: Bearer <jwt>
```

List endpoints take `page`/`limit` (defaults 1/20, max 100) and return
`{ items, pagination: { page, limit, total, total_pages } }`.
        "#
    ),
    servers(
        (url = "http://localhost:8080/api/v1", description = "Local development")
    ),
    tags(
        (name = "Accounting", description = "Accounts, categories, journal, reports, closings"),
        (name = "Settlements", description = "Receivables and payables"),
        (name = "Investments", description = "Listings and public inquiries"),
        (name = "Rentals", description = "Properties and rent collection"),
        (name = "ProfitSharing", description = "Profit distribution projects"),
        (name = "Fees", description = "Membership fee settings and invoices"),
        (name = "Activities", description = "Events and registrations"),
        (name = "Roster", description = "Users and companies"),
        (name = "Anomalies", description = "Irregularity tracking"),
        (name = "Health", description = "Liveness and readiness")
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::common::PaginationMeta,
        crate::handlers::accounts::CreateAccountRequest,
        crate::handlers::accounts::UpdateAccountRequest,
        crate::handlers::categories::CreateCategoryRequest,
        crate::handlers::categories::UpdateCategoryRequest,
        crate::handlers::journal::CreateJournalEntryRequest,
        crate::handlers::journal::UpdateJournalEntryRequest,
        crate::handlers::closings::CloseMonthRequest,
        crate::handlers::closings::UpdateClosingRequest,
        crate::handlers::settlements::OpenItemRequest,
        crate::handlers::settlements::PaymentRequest,
        crate::handlers::investments::InvestmentRequest,
        crate::handlers::investments::InquiryRequest,
        crate::handlers::rentals::PropertyRequest,
        crate::handlers::rentals::RentalPaymentRequest,
        crate::handlers::profit_sharing::ProjectRequest,
        crate::handlers::profit_sharing::DistributionRequest,
        crate::handlers::fees::FeeSettingRequest,
        crate::handlers::fees::GenerateInvoicesRequest,
        crate::handlers::activities::ActivityRequest,
        crate::handlers::activities::RegistrationRequest,
        crate::handlers::users::UserRequest,
        crate::handlers::companies::CompanyRequest,
        crate::handlers::anomalies::ReportAnomalyRequest,
        crate::services::closings::PeriodTotals,
        crate::services::closings::ClosingEligibility,
        crate::services::fees::GenerateResult,
        crate::services::fees::MemberFeeSummary,
        crate::services::rentals::RentalYearSummary,
        crate::services::rentals::RentalMonthEntry,
    ))
)]
pub struct ApiDoc;

pub fn swagger_routes() -> Router<AppState> {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
