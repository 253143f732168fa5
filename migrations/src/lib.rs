pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_accounting_tables;
mod m20260301_000002_create_receivables_payables;
mod m20260301_000003_create_members_companies;
mod m20260301_000004_create_investments;
mod m20260301_000005_create_rentals;
mod m20260301_000006_create_profit_sharing;
mod m20260301_000007_create_fees;
mod m20260301_000008_create_activities;
mod m20260301_000009_create_anomalies;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_accounting_tables::Migration),
            Box::new(m20260301_000002_create_receivables_payables::Migration),
            Box::new(m20260301_000003_create_members_companies::Migration),
            Box::new(m20260301_000004_create_investments::Migration),
            Box::new(m20260301_000005_create_rentals::Migration),
            Box::new(m20260301_000006_create_profit_sharing::Migration),
            Box::new(m20260301_000007_create_fees::Migration),
            Box::new(m20260301_000008_create_activities::Migration),
            Box::new(m20260301_000009_create_anomalies::Migration),
        ]
    }
}
