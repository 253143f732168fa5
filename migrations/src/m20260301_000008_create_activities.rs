use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Activities::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Activities::Title).string().not_null())
                    .col(ColumnDef::new(Activities::Description).text().null())
                    .col(ColumnDef::new(Activities::Location).string().null())
                    .col(ColumnDef::new(Activities::StartsAt).timestamp().not_null())
                    .col(
                        ColumnDef::new(Activities::RegistrationDeadline)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Activities::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(Activities::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Activities::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Activities::UpdatedAt).timestamp().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActivityRegistrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityRegistrations::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ActivityRegistrations::ActivityId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ActivityRegistrations::MemberId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ActivityRegistrations::Status)
                            .string()
                            .not_null()
                            .default("registered"),
                    )
                    .col(
                        ColumnDef::new(ActivityRegistrations::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_registration_activity")
                            .from(
                                ActivityRegistrations::Table,
                                ActivityRegistrations::ActivityId,
                            )
                            .to(Activities::Table, Activities::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Partial unique index: one live registration per member per
        // activity; cancelled rows stay behind for the audit trail. Raw SQL
        // because the index builder has no WHERE clause support.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX idx_registrations_active \
                 ON activity_registrations (activity_id, member_id) \
                 WHERE status = 'registered'",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityRegistrations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Activities {
    Table,
    Id,
    Title,
    Description,
    Location,
    StartsAt,
    RegistrationDeadline,
    Capacity,
    IsPublished,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum ActivityRegistrations {
    Table,
    Id,
    ActivityId,
    MemberId,
    Status,
    CreatedAt,
}
