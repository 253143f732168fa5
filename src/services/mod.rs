pub mod accounts;
pub mod activities;
pub mod anomalies;
pub mod categories;
pub mod closings;
pub mod companies;
pub mod fees;
pub mod investments;
pub mod journal;
pub mod profit_sharing;
pub mod rentals;
pub mod reports;
pub mod settlements;
pub mod users;

use crate::db::DbPool;
use std::sync::Arc;

pub use accounts::AccountService;
pub use activities::ActivityService;
pub use anomalies::AnomalyService;
pub use categories::CategoryService;
pub use closings::ClosingService;
pub use companies::CompanyService;
pub use fees::FeeService;
pub use investments::InvestmentService;
pub use journal::JournalService;
pub use profit_sharing::ProfitSharingService;
pub use rentals::RentalService;
pub use reports::ReportService;
pub use settlements::{PayableService, ReceivableService};
pub use users::UserService;

/// Container wiring every service to the shared connection pool. Cloned
/// freely into handlers; each service only holds an `Arc<DbPool>`.
#[derive(Clone)]
pub struct AppServices {
    pub accounts: AccountService,
    pub categories: CategoryService,
    pub journal: JournalService,
    pub reports: ReportService,
    pub closings: ClosingService,
    pub receivables: ReceivableService,
    pub payables: PayableService,
    pub investments: InvestmentService,
    pub rentals: RentalService,
    pub profit_sharing: ProfitSharingService,
    pub fees: FeeService,
    pub activities: ActivityService,
    pub users: UserService,
    pub companies: CompanyService,
    pub anomalies: AnomalyService,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            accounts: AccountService::new(db_pool.clone()),
            categories: CategoryService::new(db_pool.clone()),
            journal: JournalService::new(db_pool.clone()),
            reports: ReportService::new(db_pool.clone()),
            closings: ClosingService::new(db_pool.clone()),
            receivables: ReceivableService::new(db_pool.clone()),
            payables: PayableService::new(db_pool.clone()),
            investments: InvestmentService::new(db_pool.clone()),
            rentals: RentalService::new(db_pool.clone()),
            profit_sharing: ProfitSharingService::new(db_pool.clone()),
            fees: FeeService::new(db_pool.clone()),
            activities: ActivityService::new(db_pool.clone()),
            users: UserService::new(db_pool.clone()),
            companies: CompanyService::new(db_pool.clone()),
            anomalies: AnomalyService::new(db_pool),
        }
    }
}
