//! Create notification table migration.

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
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notification::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notification::RegistrationId).string_len(32))
                    .col(
                        ColumnDef::new(Notification::EventType)
                            .string_len(48)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notification::RecipientUserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notification::TriggeredByUserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notification::Message).text().not_null())
                    .col(
                        ColumnDef::new(Notification::Channel)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notification::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notification::EntityName)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notification::EntityId).string_len(32))
                    .col(
                        ColumnDef::new(Notification::RetryCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Notification::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_registration")
                            .from(Notification::Table, Notification::RegistrationId)
                            .to(Registration::Table, Registration::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_recipient")
                            .from(Notification::Table, Notification::RecipientUserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: recipient_user_id (for inbox listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_recipient_user_id")
                    .table(Notification::Table)
                    .col(Notification::RecipientUserId)
                    .to_owned(),
            )
            .await?;

        // Index: status (for the retry/outbox sweeps)
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_status")
                    .table(Notification::Table)
                    .col(Notification::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Notification {
    Table,
    Id,
    RegistrationId,
    EventType,
    RecipientUserId,
    TriggeredByUserId,
    Message,
    Channel,
    Status,
    EntityName,
    EntityId,
    RetryCount,
    CreatedAt,
}
