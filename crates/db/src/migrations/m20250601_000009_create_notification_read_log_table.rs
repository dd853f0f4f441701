//! Create notification read log table migration.

use sea_orm_migration::prelude::*;

use super::m20250601_000001_create_user_table::User;
use super::m20250601_000007_create_notification_table::Notification;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NotificationReadLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationReadLog::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationReadLog::NotificationId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationReadLog::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationReadLog::ReadAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_read_log_notification")
                            .from(
                                NotificationReadLog::Table,
                                NotificationReadLog::NotificationId,
                            )
                            .to(Notification::Table, Notification::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_read_log_user")
                            .from(NotificationReadLog::Table, NotificationReadLog::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (notification_id, user_id) (read state is an existence query)
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_read_log_notification_user")
                    .table(NotificationReadLog::Table)
                    .col(NotificationReadLog::NotificationId)
                    .col(NotificationReadLog::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NotificationReadLog::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum NotificationReadLog {
    Table,
    Id,
    NotificationId,
    UserId,
    ReadAt,
}
