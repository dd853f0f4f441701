//! Create status audit log table migration.

use sea_orm_migration::prelude::*;

use super::m20250601_000001_create_user_table::User;
use super::m20250601_000003_create_registration_table::Registration;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StatusAuditLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StatusAuditLog::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StatusAuditLog::RegistrationId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StatusAuditLog::Status)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(StatusAuditLog::Outcome).json_binary())
                    .col(
                        ColumnDef::new(StatusAuditLog::PerformedByUserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(StatusAuditLog::Remarks).text())
                    .col(
                        ColumnDef::new(StatusAuditLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_status_audit_log_registration")
                            .from(StatusAuditLog::Table, StatusAuditLog::RegistrationId)
                            .to(Registration::Table, Registration::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_status_audit_log_performed_by")
                            .from(StatusAuditLog::Table, StatusAuditLog::PerformedByUserId)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (registration_id, created_at) (history is read newest first)
        manager
            .create_index(
                Index::create()
                    .name("idx_status_audit_log_registration_created")
                    .table(StatusAuditLog::Table)
                    .col(StatusAuditLog::RegistrationId)
                    .col(StatusAuditLog::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StatusAuditLog::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum StatusAuditLog {
    Table,
    Id,
    RegistrationId,
    Status,
    Outcome,
    PerformedByUserId,
    Remarks,
    CreatedAt,
}
