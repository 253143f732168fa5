use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Anomalies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Anomalies::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Anomalies::Source).string().not_null())
                    .col(ColumnDef::new(Anomalies::Severity).string().not_null())
                    .col(ColumnDef::new(Anomalies::Description).text().not_null())
                    .col(
                        ColumnDef::new(Anomalies::Status)
                            .string()
                            .not_null()
                            .default("open"),
                    )
                    .col(ColumnDef::new(Anomalies::ResolvedAt).timestamp().null())
                    .col(ColumnDef::new(Anomalies::ResolvedBy).string().null())
                    .col(ColumnDef::new(Anomalies::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Anomalies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Anomalies {
    Table,
    Id,
    Source,
    Severity,
    Description,
    Status,
    ResolvedAt,
    ResolvedBy,
    CreatedAt,
}
