//! Action hint engine.
//!
//! Advisory layer for UI callers: which actions a user may take on a
//! registration right now, what is missing before submission, and who a
//! given action would notify. All answers are projections of the
//! workflow rules plus read-only lookups; nothing here mutates state.

use licreg_common::{AppError, AppResult};
use licreg_db::entities::registration::{self, RegistrationStatus};
use licreg_db::entities::user::Role;
use licreg_db::repositories::{RegistrationRepository, UserRepository};

use crate::services::localization::Localizer;
use crate::services::workflow::{self, Action};

/// Role-aware advisory service.
#[derive(Clone)]
pub struct ActionHintEngine {
    registration_repo: RegistrationRepository,
    user_repo: UserRepository,
    localizer: Localizer,
    locale: String,
}

impl ActionHintEngine {
    /// Create a new hint engine.
    #[must_use]
    pub fn new(
        registration_repo: RegistrationRepository,
        user_repo: UserRepository,
        locale: &str,
    ) -> Self {
        Self {
            registration_repo,
            user_repo,
            localizer: Localizer::new(),
            locale: locale.to_string(),
        }
    }

    /// Actions `role` may take on the registration in its current status.
    #[must_use]
    pub fn available_actions(
        &self,
        registration: &registration::Model,
        role: Role,
    ) -> Vec<Action> {
        workflow::available_actions(role, registration.status)
    }

    /// Resolve a user's role, then compute their available actions.
    pub async fn available_actions_for_user(
        &self,
        registration: &registration::Model,
        user_id: &str,
    ) -> AppResult<Vec<Action>> {
        let role = self
            .user_repo
            .resolve_role(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user not found: {user_id}")))?;

        Ok(workflow::available_actions(role, registration.status))
    }

    /// Statuses `role` may move a registration in `status` to.
    #[must_use]
    pub fn next_statuses(&self, status: RegistrationStatus, role: Role) -> Vec<RegistrationStatus> {
        workflow::next_statuses(role, status)
    }

    /// Pre-submission deficiency hints for a registration.
    ///
    /// An empty list means ready to submit. Missing contacts or documents
    /// are reported as localized strings, never as errors.
    pub async fn validation_hints(&self, registration_id: &str) -> AppResult<Vec<String>> {
        if registration_id.is_empty() {
            return Err(AppError::InvalidArgument(
                "registration id must not be empty".to_string(),
            ));
        }

        let mut hints = Vec::new();
        let no_tokens = std::collections::HashMap::new();

        if self.registration_repo.count_contacts(registration_id).await? == 0 {
            hints.push(
                self.localizer
                    .message(&self.locale, "hint.missingContact", &no_tokens),
            );
        }

        if self.registration_repo.count_documents(registration_id).await? == 0 {
            hints.push(
                self.localizer
                    .message(&self.locale, "hint.missingDocument", &no_tokens),
            );
        }

        Ok(hints)
    }

    /// Users an action on this registration should notify.
    #[must_use]
    pub fn notification_recipients(
        &self,
        registration: &registration::Model,
        action: Action,
        performed_by_user_id: &str,
    ) -> Vec<String> {
        workflow::notification_recipients(
            action,
            &registration.created_by_user_id,
            performed_by_user_id,
        )
    }
}
