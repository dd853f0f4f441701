//! Create registration document table migration.

use sea_orm_migration::prelude::*;

use super::m20250601_000003_create_registration_table::Registration;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RegistrationDocument::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RegistrationDocument::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RegistrationDocument::RegistrationId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RegistrationDocument::Title)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RegistrationDocument::FileKey)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RegistrationDocument::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_registration_document_registration")
                            .from(
                                RegistrationDocument::Table,
                                RegistrationDocument::RegistrationId,
                            )
                            .to(Registration::Table, Registration::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_registration_document_registration_id")
                    .table(RegistrationDocument::Table)
                    .col(RegistrationDocument::RegistrationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RegistrationDocument::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum RegistrationDocument {
    Table,
    Id,
    RegistrationId,
    Title,
    FileKey,
    CreatedAt,
}
