use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccountingAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccountingAccounts::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountingAccounts::AccountCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AccountingAccounts::AccountName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountingAccounts::AccountType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AccountingAccounts::ParentAccountId).uuid().null())
                    .col(
                        ColumnDef::new(AccountingAccounts::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AccountingAccounts::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AccountingAccounts::UpdatedAt).timestamp().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccountingCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccountingCategories::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountingCategories::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AccountingCategories::Description).text().null())
                    .col(
                        ColumnDef::new(AccountingCategories::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AccountingCategories::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccountingJournal::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccountingJournal::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountingJournal::JournalNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AccountingJournal::JournalDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountingJournal::DebitAccountId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountingJournal::CreditAccountId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AccountingJournal::Amount).decimal().not_null())
                    .col(ColumnDef::new(AccountingJournal::CategoryId).uuid().null())
                    .col(ColumnDef::new(AccountingJournal::Description).text().null())
                    .col(
                        ColumnDef::new(AccountingJournal::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_debit_account")
                            .from(AccountingJournal::Table, AccountingJournal::DebitAccountId)
                            .to(AccountingAccounts::Table, AccountingAccounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_credit_account")
                            .from(AccountingJournal::Table, AccountingJournal::CreditAccountId)
                            .to(AccountingAccounts::Table, AccountingAccounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_category")
                            .from(AccountingJournal::Table, AccountingJournal::CategoryId)
                            .to(AccountingCategories::Table, AccountingCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_date")
                    .table(AccountingJournal::Table)
                    .col(AccountingJournal::JournalDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccountingMonthlyClosings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccountingMonthlyClosings::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountingMonthlyClosings::ClosingYear)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountingMonthlyClosings::ClosingMonth)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountingMonthlyClosings::TotalDebit)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountingMonthlyClosings::TotalCredit)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountingMonthlyClosings::Balance)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountingMonthlyClosings::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountingMonthlyClosings::ClosedBy)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountingMonthlyClosings::ClosedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AccountingMonthlyClosings::Notes).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_monthly_closings_period")
                    .table(AccountingMonthlyClosings::Table)
                    .col(AccountingMonthlyClosings::ClosingYear)
                    .col(AccountingMonthlyClosings::ClosingMonth)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccountingMonthlyClosings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccountingJournal::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccountingCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccountingAccounts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AccountingAccounts {
    Table,
    Id,
    AccountCode,
    AccountName,
    AccountType,
    ParentAccountId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum AccountingCategories {
    Table,
    Id,
    Name,
    Description,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum AccountingJournal {
    Table,
    Id,
    JournalNumber,
    JournalDate,
    DebitAccountId,
    CreditAccountId,
    Amount,
    CategoryId,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum AccountingMonthlyClosings {
    Table,
    Id,
    ClosingYear,
    ClosingMonth,
    TotalDebit,
    TotalCredit,
    Balance,
    Status,
    ClosedBy,
    ClosedAt,
    Notes,
}
