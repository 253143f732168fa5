use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProfitSharingProjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProfitSharingProjects::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProfitSharingProjects::Name).string().not_null())
                    .col(
                        ColumnDef::new(ProfitSharingProjects::TotalProfit)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfitSharingProjects::PeriodStart)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfitSharingProjects::PeriodEnd)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfitSharingProjects::Status)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(ProfitSharingProjects::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfitSharingProjects::UpdatedAt)
                            .timestamp()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProfitSharingDistributions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProfitSharingDistributions::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfitSharingDistributions::ProjectId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfitSharingDistributions::MemberId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfitSharingDistributions::ShareRatio)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfitSharingDistributions::Amount)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfitSharingDistributions::IsPaid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ProfitSharingDistributions::PaidAt)
                            .timestamp()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_distribution_project")
                            .from(
                                ProfitSharingDistributions::Table,
                                ProfitSharingDistributions::ProjectId,
                            )
                            .to(ProfitSharingProjects::Table, ProfitSharingProjects::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ProfitSharingDistributions::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(ProfitSharingProjects::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ProfitSharingProjects {
    Table,
    Id,
    Name,
    TotalProfit,
    PeriodStart,
    PeriodEnd,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum ProfitSharingDistributions {
    Table,
    Id,
    ProjectId,
    MemberId,
    ShareRatio,
    Amount,
    IsPaid,
    PaidAt,
}
