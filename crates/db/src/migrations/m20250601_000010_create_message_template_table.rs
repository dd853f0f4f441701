//! Create message template table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MessageTemplate::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MessageTemplate::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MessageTemplate::Name)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MessageTemplate::Channel)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MessageTemplate::Subject).string_len(256))
                    .col(ColumnDef::new(MessageTemplate::Body).text().not_null())
                    .col(
                        ColumnDef::new(MessageTemplate::Locale)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MessageTemplate::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(MessageTemplate::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (name, channel, locale) (template resolution path)
        manager
            .create_index(
                Index::create()
                    .name("idx_message_template_name_channel_locale")
                    .table(MessageTemplate::Table)
                    .col(MessageTemplate::Name)
                    .col(MessageTemplate::Channel)
                    .col(MessageTemplate::Locale)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MessageTemplate::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum MessageTemplate {
    Table,
    Id,
    Name,
    Channel,
    Subject,
    Body,
    Locale,
    IsActive,
    CreatedAt,
}
