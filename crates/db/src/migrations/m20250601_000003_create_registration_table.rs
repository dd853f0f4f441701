//! Create registration table migration.

use sea_orm_migration::prelude::*;

use super::m20250601_000001_create_user_table::User;
use super::m20250601_000002_create_institution_table::Institution;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Registration::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Registration::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Registration::InstitutionId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Registration::InstitutionName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Registration::LicenseNumber)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Registration::Status)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Registration::CreatedByUserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Registration::UpdatedByUserId).string_len(32))
                    .col(ColumnDef::new(Registration::SubmittedToUserId).string_len(32))
                    .col(
                        ColumnDef::new(Registration::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Registration::SubmittedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Registration::ApprovedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Registration::AuditedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Registration::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_registration_institution")
                            .from(Registration::Table, Registration::InstitutionId)
                            .to(Institution::Table, Institution::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_registration_created_by")
                            .from(Registration::Table, Registration::CreatedByUserId)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: institution_id (for institution listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_registration_institution_id")
                    .table(Registration::Table)
                    .col(Registration::InstitutionId)
                    .to_owned(),
            )
            .await?;

        // Index: status (for work queues)
        manager
            .create_index(
                Index::create()
                    .name("idx_registration_status")
                    .table(Registration::Table)
                    .col(Registration::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Registration::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Registration {
    Table,
    Id,
    InstitutionId,
    InstitutionName,
    LicenseNumber,
    Status,
    CreatedByUserId,
    UpdatedByUserId,
    SubmittedToUserId,
    CreatedAt,
    SubmittedAt,
    ApprovedAt,
    AuditedAt,
    Version,
}
