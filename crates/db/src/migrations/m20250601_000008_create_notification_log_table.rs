//! Create notification log table migration.

use sea_orm_migration::prelude::*;

use super::m20250601_000007_create_notification_table::Notification;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NotificationLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationLog::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationLog::NotificationId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationLog::Channel)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(NotificationLog::Success).boolean().not_null())
                    .col(ColumnDef::new(NotificationLog::Response).text())
                    .col(
                        ColumnDef::new(NotificationLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_log_notification")
                            .from(NotificationLog::Table, NotificationLog::NotificationId)
                            .to(Notification::Table, Notification::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notification_log_notification_id")
                    .table(NotificationLog::Table)
                    .col(NotificationLog::NotificationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NotificationLog::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum NotificationLog {
    Table,
    Id,
    NotificationId,
    Channel,
    Success,
    Response,
    CreatedAt,
}
