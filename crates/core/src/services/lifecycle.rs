//! Registration lifecycle service.
//!
//! Owns status transitions: validates the edge against the workflow
//! rules, applies the change with an optimistic-concurrency check, and
//! writes the audit row plus any pending notifications in the same
//! transaction. Delivery happens after commit and can never undo a
//! committed transition.

use std::sync::Arc;

use licreg_common::{AppError, AppResult, IdGenerator};
use licreg_db::entities::registration::{self, RegistrationStatus};
use licreg_db::entities::status_audit_log::LogOutcome;
use licreg_db::repositories::{
    InstitutionRepository, RegistrationRepository, TransitionStamps, UserRepository,
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};

use crate::services::audit::StatusAuditLogService;
use crate::services::dispatcher::{NotificationDispatcher, SendRequest};
use crate::services::workflow;

/// Registration lifecycle service.
#[derive(Clone)]
pub struct RegistrationLifecycle {
    db: Arc<DatabaseConnection>,
    registration_repo: RegistrationRepository,
    institution_repo: InstitutionRepository,
    user_repo: UserRepository,
    audit: StatusAuditLogService,
    dispatcher: NotificationDispatcher,
    id_gen: IdGenerator,
}

impl RegistrationLifecycle {
    /// Create a new lifecycle service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        registration_repo: RegistrationRepository,
        institution_repo: InstitutionRepository,
        user_repo: UserRepository,
        audit: StatusAuditLogService,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            db,
            registration_repo,
            institution_repo,
            user_repo,
            audit,
            dispatcher,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a registration in Draft for an institution.
    ///
    /// Institution name and license number are copied onto the
    /// registration as snapshots. The creation itself is the first
    /// history row.
    pub async fn create_draft(
        &self,
        institution_id: &str,
        created_by_user_id: &str,
    ) -> AppResult<registration::Model> {
        let institution = self
            .institution_repo
            .find_by_id(institution_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("institution not found: {institution_id}")))?;

        let model = registration::ActiveModel {
            id: Set(self.id_gen.generate()),
            institution_id: Set(institution.id.clone()),
            institution_name: Set(institution.name.clone()),
            license_number: Set(institution.license_number.clone()),
            status: Set(RegistrationStatus::Draft),
            created_by_user_id: Set(created_by_user_id.to_string()),
            updated_by_user_id: Set(None),
            submitted_to_user_id: Set(None),
            created_at: Set(chrono::Utc::now().into()),
            submitted_at: Set(None),
            approved_at: Set(None),
            audited_at: Set(None),
            version: Set(0),
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let created = self.registration_repo.create_in(&txn, model).await?;
        self.audit
            .append_in(
                &txn,
                &created.id,
                RegistrationStatus::Draft,
                None,
                created_by_user_id,
                None,
            )
            .await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            registration_id = %created.id,
            institution_id = %institution.id,
            "Registration created in draft"
        );

        Ok(created)
    }

    /// Move a registration to `target`.
    ///
    /// Validates the edge, applies the status change with a version
    /// check, stamps the relevant timestamp, appends one audit row, and
    /// queues notifications for the mapped event, all in one transaction.
    /// Approval additionally activates the owning institution and its
    /// primary user before any notification goes out.
    pub async fn transition(
        &self,
        registration_id: &str,
        target: RegistrationStatus,
        performed_by_user_id: &str,
        remarks: Option<&str>,
        outcome: Option<LogOutcome>,
    ) -> AppResult<registration::Model> {
        if registration_id.is_empty() {
            return Err(AppError::InvalidArgument(
                "registration id must not be empty".to_string(),
            ));
        }

        let current = self
            .registration_repo
            .find_by_id(registration_id)
            .await?
            .ok_or_else(|| AppError::RegistrationNotFound(registration_id.to_string()))?;

        if !workflow::is_legal_transition(current.status, target) {
            return Err(AppError::InvalidTransition {
                from: current.status.as_str().to_string(),
                to: target.as_str().to_string(),
            });
        }

        // Approval activates the institution; fetch it before opening the
        // transaction so a missing row fails fast.
        let institution = if target == RegistrationStatus::Approved {
            Some(
                self.institution_repo
                    .find_by_id(&current.institution_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!(
                            "institution not found: {}",
                            current.institution_id
                        ))
                    })?,
            )
        } else {
            None
        };

        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();
        let stamps = TransitionStamps {
            submitted_at: (target == RegistrationStatus::Submitted).then_some(now),
            approved_at: (target == RegistrationStatus::Approved).then_some(now),
            audited_at: (target == RegistrationStatus::UnderReview
                && matches!(outcome, Some(LogOutcome::Audited(_))))
            .then_some(now),
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let rows = self
            .registration_repo
            .apply_transition_in(&txn, &current, target, performed_by_user_id, stamps)
            .await?;

        if rows == 0 {
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Err(AppError::Conflict(format!(
                "registration {registration_id} was modified concurrently"
            )));
        }

        self.audit
            .append_in(
                &txn,
                registration_id,
                target,
                outcome,
                performed_by_user_id,
                remarks,
            )
            .await?;

        if let Some(institution) = &institution {
            self.institution_repo.activate_in(&txn, &institution.id).await?;
            if let Some(primary_user_id) = &institution.primary_user_id {
                self.user_repo.activate_in(&txn, primary_user_id).await?;
            }
        }

        let mut queued = Vec::new();
        if let Some(event) = workflow::event_for_status(target) {
            for recipient in recipients_for(&current, target, performed_by_user_id) {
                let request = SendRequest::new(event, performed_by_user_id, &recipient)
                    .with_registration(registration_id);
                queued.push(self.dispatcher.enqueue_in(&txn, &request).await?);
            }
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            registration_id = %registration_id,
            from = current.status.as_str(),
            to = target.as_str(),
            performed_by = %performed_by_user_id,
            "Registration transitioned"
        );

        // Deliver after commit; a failed delivery is recorded on the
        // notification and retried later, never bubbled to the caller.
        for pending in queued {
            if let Err(e) = self.dispatcher.dispatch(pending).await {
                tracing::warn!(
                    registration_id = %registration_id,
                    error = %e,
                    "Post-transition notification dispatch failed"
                );
            }
        }

        let mut updated = current;
        updated.status = target;
        updated.updated_by_user_id = Some(performed_by_user_id.to_string());
        updated.version += 1;
        if let Some(at) = stamps.submitted_at {
            updated.submitted_at = Some(at);
        }
        if let Some(at) = stamps.approved_at {
            updated.approved_at = Some(at);
        }
        if let Some(at) = stamps.audited_at {
            updated.audited_at = Some(at);
        }

        Ok(updated)
    }

    /// Fetch a registration.
    pub async fn get(&self, registration_id: &str) -> AppResult<registration::Model> {
        self.registration_repo
            .find_by_id(registration_id)
            .await?
            .ok_or_else(|| AppError::RegistrationNotFound(registration_id.to_string()))
    }
}

/// Recipients for the notification announcing entry into `target`.
///
/// Review verdicts notify the originating maker unless they performed
/// the transition themselves; other events have no resolved recipients
/// yet.
fn recipients_for(
    registration: &registration::Model,
    target: RegistrationStatus,
    performed_by_user_id: &str,
) -> Vec<String> {
    let action = match target {
        RegistrationStatus::Approved => workflow::Action::Approve,
        RegistrationStatus::Rejected => workflow::Action::Reject,
        RegistrationStatus::ReturnedForEdit => workflow::Action::ReturnForEdit,
        RegistrationStatus::Submitted => workflow::Action::Submit,
        RegistrationStatus::FinalSubmission => workflow::Action::FinalSubmission,
        RegistrationStatus::Archived => workflow::Action::Archive,
        RegistrationStatus::Draft | RegistrationStatus::UnderReview => return Vec::new(),
    };

    workflow::notification_recipients(
        action,
        &registration.created_by_user_id,
        performed_by_user_id,
    )
}
