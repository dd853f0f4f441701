//! Registration repository.

use std::sync::Arc;

use crate::entities::{
    Registration, RegistrationContact, RegistrationDocument, registration, registration_contact,
    registration_document,
};
use licreg_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Timestamp fields a transition may stamp; `None` leaves a field as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionStamps {
    /// Submission time, stamped when entering Submitted.
    pub submitted_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    /// Approval time, stamped when entering Approved.
    pub approved_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    /// Audit time, stamped when review was entered via an audit.
    pub audited_at: Option<chrono::DateTime<chrono::FixedOffset>>,
}

/// Registration repository for database operations.
#[derive(Clone)]
pub struct RegistrationRepository {
    db: Arc<DatabaseConnection>,
}

impl RegistrationRepository {
    /// Create a new registration repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a registration by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<registration::Model>> {
        Registration::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new registration.
    pub async fn create(&self, model: registration::ActiveModel) -> AppResult<registration::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new registration on the given connection (transactional).
    pub async fn create_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: registration::ActiveModel,
    ) -> AppResult<registration::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Apply a status transition with an optimistic-concurrency check.
    ///
    /// The update is filtered on the version the caller read; zero rows
    /// affected means another writer got there first and nothing was
    /// changed. Only timestamps passed as `Some` are stamped.
    pub async fn apply_transition_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        current: &registration::Model,
        target: registration::RegistrationStatus,
        performed_by_user_id: &str,
        stamps: TransitionStamps,
    ) -> AppResult<u64> {
        let mut update = Registration::update_many()
            .col_expr(registration::Column::Status, Expr::value(target))
            .col_expr(
                registration::Column::UpdatedByUserId,
                Expr::value(Some(performed_by_user_id.to_string())),
            )
            .col_expr(
                registration::Column::Version,
                Expr::value(current.version + 1),
            );

        if let Some(at) = stamps.submitted_at {
            update = update.col_expr(registration::Column::SubmittedAt, Expr::value(Some(at)));
        }
        if let Some(at) = stamps.approved_at {
            update = update.col_expr(registration::Column::ApprovedAt, Expr::value(Some(at)));
        }
        if let Some(at) = stamps.audited_at {
            update = update.col_expr(registration::Column::AuditedAt, Expr::value(Some(at)));
        }

        let result = update
            .filter(registration::Column::Id.eq(current.id.as_str()))
            .filter(registration::Column::Version.eq(current.version))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Get registrations for an institution (paginated, newest first).
    pub async fn find_by_institution(
        &self,
        institution_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<registration::Model>> {
        Registration::find()
            .filter(registration::Column::InstitutionId.eq(institution_id))
            .order_by_desc(registration::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get registrations in a given status (paginated, newest first).
    pub async fn find_by_status(
        &self,
        status: registration::RegistrationStatus,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<registration::Model>> {
        Registration::find()
            .filter(registration::Column::Status.eq(status))
            .order_by_desc(registration::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count contacts attached to a registration.
    pub async fn count_contacts(&self, registration_id: &str) -> AppResult<u64> {
        RegistrationContact::find()
            .filter(registration_contact::Column::RegistrationId.eq(registration_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count documents linked to a registration.
    pub async fn count_documents(&self, registration_id: &str) -> AppResult<u64> {
        RegistrationDocument::find()
            .filter(registration_document::Column::RegistrationId.eq(registration_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
