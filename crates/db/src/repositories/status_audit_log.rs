//! Status audit log repository.
//!
//! Append-only by construction: no update or delete is exposed.

use std::sync::Arc;

use crate::entities::{StatusAuditLog, status_audit_log};
use licreg_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

/// Status audit log repository for database operations.
#[derive(Clone)]
pub struct StatusAuditLogRepository {
    db: Arc<DatabaseConnection>,
}

impl StatusAuditLogRepository {
    /// Create a new status audit log repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append an audit entry.
    pub async fn append(
        &self,
        model: status_audit_log::ActiveModel,
    ) -> AppResult<status_audit_log::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Append an audit entry on the given connection (transactional).
    pub async fn append_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: status_audit_log::ActiveModel,
    ) -> AppResult<status_audit_log::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all entries for a registration, most recent first.
    pub async fn find_by_registration(
        &self,
        registration_id: &str,
    ) -> AppResult<Vec<status_audit_log::Model>> {
        StatusAuditLog::find()
            .filter(status_audit_log::Column::RegistrationId.eq(registration_id))
            .order_by_desc(status_audit_log::Column::CreatedAt)
            .order_by_desc(status_audit_log::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count entries for a registration.
    pub async fn count_by_registration(&self, registration_id: &str) -> AppResult<u64> {
        StatusAuditLog::find()
            .filter(status_audit_log::Column::RegistrationId.eq(registration_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
