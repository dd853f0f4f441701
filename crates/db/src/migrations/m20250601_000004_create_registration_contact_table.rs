//! Create registration contact table migration.

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
                    .table(RegistrationContact::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RegistrationContact::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RegistrationContact::RegistrationId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RegistrationContact::FullName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(RegistrationContact::Email).string_len(256))
                    .col(ColumnDef::new(RegistrationContact::Phone).string_len(32))
                    .col(
                        ColumnDef::new(RegistrationContact::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_registration_contact_registration")
                            .from(
                                RegistrationContact::Table,
                                RegistrationContact::RegistrationId,
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
                    .name("idx_registration_contact_registration_id")
                    .table(RegistrationContact::Table)
                    .col(RegistrationContact::RegistrationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RegistrationContact::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum RegistrationContact {
    Table,
    Id,
    RegistrationId,
    FullName,
    Email,
    Phone,
    CreatedAt,
}
