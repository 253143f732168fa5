use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn ledger_table(table: impl Iden + 'static) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(ColumnDef::new(OpenItems::Id).uuid().primary_key().not_null())
        .col(ColumnDef::new(OpenItems::Counterparty).string().not_null())
        .col(ColumnDef::new(OpenItems::Description).text().null())
        .col(ColumnDef::new(OpenItems::Amount).decimal().not_null())
        .col(
            ColumnDef::new(OpenItems::PaymentAmount)
                .decimal()
                .not_null()
                .default(0.0),
        )
        .col(ColumnDef::new(OpenItems::RemainingAmount).decimal().not_null())
        .col(ColumnDef::new(OpenItems::DueDate).date().not_null())
        .col(
            ColumnDef::new(OpenItems::Status)
                .string()
                .not_null()
                .default("pending"),
        )
        .col(ColumnDef::new(OpenItems::CreatedAt).timestamp().not_null())
        .col(ColumnDef::new(OpenItems::UpdatedAt).timestamp().null())
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(ledger_table(AccountingReceivables::Table))
            .await?;
        manager
            .create_table(ledger_table(AccountingPayables::Table))
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccountingPayables::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccountingReceivables::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AccountingReceivables {
    Table,
}

#[derive(DeriveIden)]
pub enum AccountingPayables {
    Table,
}

/// Shared column set: receivables and payables carry the same shape.
#[derive(DeriveIden)]
enum OpenItems {
    Id,
    Counterparty,
    Description,
    Amount,
    PaymentAmount,
    RemainingAmount,
    DueDate,
    Status,
    CreatedAt,
    UpdatedAt,
}
