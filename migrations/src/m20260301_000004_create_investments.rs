use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Investments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Investments::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Investments::Title).string().not_null())
                    .col(ColumnDef::new(Investments::Description).text().null())
                    .col(ColumnDef::new(Investments::MinAmount).decimal().not_null())
                    .col(
                        ColumnDef::new(Investments::ExpectedReturnRate)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Investments::Status)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Investments::IsPublic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Investments::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Investments::UpdatedAt).timestamp().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InvestmentInquiries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvestmentInquiries::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentInquiries::InvestmentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InvestmentInquiries::Name).string().not_null())
                    .col(ColumnDef::new(InvestmentInquiries::Email).string().not_null())
                    .col(ColumnDef::new(InvestmentInquiries::Phone).string().null())
                    .col(ColumnDef::new(InvestmentInquiries::Message).text().null())
                    .col(
                        ColumnDef::new(InvestmentInquiries::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inquiry_investment")
                            .from(InvestmentInquiries::Table, InvestmentInquiries::InvestmentId)
                            .to(Investments::Table, Investments::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InvestmentInquiries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Investments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Investments {
    Table,
    Id,
    Title,
    Description,
    MinAmount,
    ExpectedReturnRate,
    Status,
    IsPublic,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum InvestmentInquiries {
    Table,
    Id,
    InvestmentId,
    Name,
    Email,
    Phone,
    Message,
    CreatedAt,
}
