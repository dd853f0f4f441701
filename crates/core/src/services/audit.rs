//! Status history service over the append-only audit log.

use licreg_common::{AppError, AppResult, IdGenerator};
use licreg_db::entities::registration::RegistrationStatus;
use licreg_db::entities::status_audit_log::{self, LogOutcome};
use licreg_db::repositories::StatusAuditLogRepository;
use sea_orm::{ConnectionTrait, Set};

/// Service exposing the append and read surface of the status history.
///
/// There is deliberately no update or delete here; a transition appends
/// one immutable row and that row is the record.
#[derive(Clone)]
pub struct StatusAuditLogService {
    repo: StatusAuditLogRepository,
    id_gen: IdGenerator,
}

impl StatusAuditLogService {
    /// Create a new status audit log service.
    #[must_use]
    pub const fn new(repo: StatusAuditLogRepository) -> Self {
        Self {
            repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Append one history row for a registration.
    pub async fn append(
        &self,
        registration_id: &str,
        status: RegistrationStatus,
        outcome: Option<LogOutcome>,
        performed_by_user_id: &str,
        remarks: Option<&str>,
    ) -> AppResult<status_audit_log::Model> {
        let model = self.build(registration_id, status, outcome, performed_by_user_id, remarks)?;
        self.repo.append(model).await
    }

    /// Append one history row on the given connection (transactional).
    pub async fn append_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        registration_id: &str,
        status: RegistrationStatus,
        outcome: Option<LogOutcome>,
        performed_by_user_id: &str,
        remarks: Option<&str>,
    ) -> AppResult<status_audit_log::Model> {
        let model = self.build(registration_id, status, outcome, performed_by_user_id, remarks)?;
        self.repo.append_in(conn, model).await
    }

    /// Full history for a registration, most recent first.
    pub async fn history(&self, registration_id: &str) -> AppResult<Vec<status_audit_log::Model>> {
        if registration_id.is_empty() {
            return Err(AppError::InvalidArgument(
                "registration id must not be empty".to_string(),
            ));
        }
        self.repo.find_by_registration(registration_id).await
    }

    /// Number of history rows for a registration.
    pub async fn count(&self, registration_id: &str) -> AppResult<u64> {
        self.repo.count_by_registration(registration_id).await
    }

    fn build(
        &self,
        registration_id: &str,
        status: RegistrationStatus,
        outcome: Option<LogOutcome>,
        performed_by_user_id: &str,
        remarks: Option<&str>,
    ) -> AppResult<status_audit_log::ActiveModel> {
        if registration_id.is_empty() {
            return Err(AppError::InvalidArgument(
                "registration id must not be empty".to_string(),
            ));
        }
        if performed_by_user_id.is_empty() {
            return Err(AppError::InvalidArgument(
                "performing user id must not be empty".to_string(),
            ));
        }

        Ok(status_audit_log::ActiveModel {
            id: Set(self.id_gen.generate()),
            registration_id: Set(registration_id.to_string()),
            status: Set(status),
            outcome: Set(outcome),
            performed_by_user_id: Set(performed_by_user_id.to_string()),
            remarks: Set(remarks.map(String::from)),
            created_at: Set(chrono::Utc::now().into()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use licreg_db::entities::status_audit_log::{ApprovalStatus, LogOutcome};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_append_rejects_empty_registration_id() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = StatusAuditLogService::new(StatusAuditLogRepository::new(db));

        let err = service
            .append("", RegistrationStatus::Draft, None, "maker1", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_append_stores_outcome() {
        let stored = status_audit_log::Model {
            id: "log1".to_string(),
            registration_id: "reg1".to_string(),
            status: RegistrationStatus::Approved,
            outcome: Some(LogOutcome::Approved(ApprovalStatus::Granted)),
            performed_by_user_id: "regulator1".to_string(),
            remarks: Some("all checks passed".to_string()),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .into_connection(),
        );
        let service = StatusAuditLogService::new(StatusAuditLogRepository::new(db));

        let row = service
            .append(
                "reg1",
                RegistrationStatus::Approved,
                Some(LogOutcome::Approved(ApprovalStatus::Granted)),
                "regulator1",
                Some("all checks passed"),
            )
            .await
            .unwrap();

        assert_eq!(row.status, RegistrationStatus::Approved);
        assert_eq!(row.outcome, Some(LogOutcome::Approved(ApprovalStatus::Granted)));
    }

    #[tokio::test]
    async fn test_history_rejects_empty_id() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = StatusAuditLogService::new(StatusAuditLogRepository::new(db));

        let err = service.history("").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }
}
