use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FeeSettings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FeeSettings::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(FeeSettings::Name).string().not_null())
                    .col(ColumnDef::new(FeeSettings::Amount).decimal().not_null())
                    .col(ColumnDef::new(FeeSettings::Frequency).string().not_null())
                    .col(
                        ColumnDef::new(FeeSettings::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(FeeSettings::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(FeeSettings::UpdatedAt).timestamp().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FeeInvoices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FeeInvoices::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(FeeInvoices::MemberId).uuid().not_null())
                    .col(ColumnDef::new(FeeInvoices::FeeSettingId).uuid().not_null())
                    .col(ColumnDef::new(FeeInvoices::Period).string().not_null())
                    .col(ColumnDef::new(FeeInvoices::Amount).decimal().not_null())
                    .col(
                        ColumnDef::new(FeeInvoices::Status)
                            .string()
                            .not_null()
                            .default("unpaid"),
                    )
                    .col(ColumnDef::new(FeeInvoices::PaidAt).timestamp().null())
                    .col(ColumnDef::new(FeeInvoices::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fee_invoice_setting")
                            .from(FeeInvoices::Table, FeeInvoices::FeeSettingId)
                            .to(FeeSettings::Table, FeeSettings::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fee_invoices_member_setting_period")
                    .table(FeeInvoices::Table)
                    .col(FeeInvoices::MemberId)
                    .col(FeeInvoices::FeeSettingId)
                    .col(FeeInvoices::Period)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeeInvoices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeeSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum FeeSettings {
    Table,
    Id,
    Name,
    Amount,
    Frequency,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum FeeInvoices {
    Table,
    Id,
    MemberId,
    FeeSettingId,
    Period,
    Amount,
    Status,
    PaidAt,
    CreatedAt,
}
