use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RentalProperties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RentalProperties::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RentalProperties::Name).string().not_null())
                    .col(ColumnDef::new(RentalProperties::Address).string().not_null())
                    .col(
                        ColumnDef::new(RentalProperties::MonthlyRent)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RentalProperties::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(RentalProperties::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RentalProperties::UpdatedAt).timestamp().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RentalPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RentalPayments::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RentalPayments::PropertyId).uuid().not_null())
                    .col(
                        ColumnDef::new(RentalPayments::PeriodYear)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RentalPayments::PeriodMonth)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RentalPayments::Amount).decimal().not_null())
                    .col(ColumnDef::new(RentalPayments::PaidAt).timestamp().not_null())
                    .col(ColumnDef::new(RentalPayments::Notes).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rental_payment_property")
                            .from(RentalPayments::Table, RentalPayments::PropertyId)
                            .to(RentalProperties::Table, RentalProperties::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rental_payments_period")
                    .table(RentalPayments::Table)
                    .col(RentalPayments::PropertyId)
                    .col(RentalPayments::PeriodYear)
                    .col(RentalPayments::PeriodMonth)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RentalPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RentalProperties::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum RentalProperties {
    Table,
    Id,
    Name,
    Address,
    MonthlyRent,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum RentalPayments {
    Table,
    Id,
    PropertyId,
    PeriodYear,
    PeriodMonth,
    Amount,
    PaidAt,
    Notes,
}
