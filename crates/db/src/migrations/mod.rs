//! Database migrations.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_user_table;
mod m20250601_000002_create_institution_table;
mod m20250601_000003_create_registration_table;
mod m20250601_000004_create_registration_contact_table;
mod m20250601_000005_create_registration_document_table;
mod m20250601_000006_create_status_audit_log_table;
mod m20250601_000007_create_notification_table;
mod m20250601_000008_create_notification_log_table;
mod m20250601_000009_create_notification_read_log_table;
mod m20250601_000010_create_message_template_table;

/// Workspace migrator.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_user_table::Migration),
            Box::new(m20250601_000002_create_institution_table::Migration),
            Box::new(m20250601_000003_create_registration_table::Migration),
            Box::new(m20250601_000004_create_registration_contact_table::Migration),
            Box::new(m20250601_000005_create_registration_document_table::Migration),
            Box::new(m20250601_000006_create_status_audit_log_table::Migration),
            Box::new(m20250601_000007_create_notification_table::Migration),
            Box::new(m20250601_000008_create_notification_log_table::Migration),
            Box::new(m20250601_000009_create_notification_read_log_table::Migration),
            Box::new(m20250601_000010_create_message_template_table::Migration),
        ]
    }
}
