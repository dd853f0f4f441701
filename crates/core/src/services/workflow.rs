//! Workflow rules: the single transition table driving both enforcement
//! and action hints.
//!
//! Every legal status change is one [`TransitionRule`] in [`RULES`]. The
//! lifecycle validates against it, the hint engine projects it per role,
//! and the event map below decides which notification (if any) announces
//! a transition. There is no second table to keep in sync.

use licreg_db::entities::notification::{EntityName, EventType};
use licreg_db::entities::registration::RegistrationStatus;
use licreg_db::entities::user::Role;

/// Named workflow actions a user can take on a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Submit,
    Validate,
    Approve,
    Reject,
    ReturnForEdit,
    Audit,
    Archive,
    FinalSubmission,
}

impl Action {
    /// Stable lowerCamelCase name for API payloads and logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Validate => "validate",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::ReturnForEdit => "returnForEdit",
            Self::Audit => "audit",
            Self::Archive => "archive",
            Self::FinalSubmission => "finalSubmission",
        }
    }
}

/// One legal edge of the state machine.
#[derive(Debug, Clone, Copy)]
pub struct TransitionRule {
    /// The action a caller names when taking this edge.
    pub action: Action,
    /// Status the registration must currently be in.
    pub from: RegistrationStatus,
    /// Status the registration moves to.
    pub to: RegistrationStatus,
    /// Roles allowed to take this edge. Admin is implicitly allowed on
    /// every rule and is not listed.
    pub roles: &'static [Role],
}

impl TransitionRule {
    /// Whether `role` may take this edge.
    #[must_use]
    pub fn allows(&self, role: Role) -> bool {
        role == Role::Admin || self.roles.contains(&role)
    }
}

/// The complete legal-transition table.
pub const RULES: &[TransitionRule] = &[
    TransitionRule {
        action: Action::Submit,
        from: RegistrationStatus::Draft,
        to: RegistrationStatus::Submitted,
        roles: &[Role::Maker],
    },
    TransitionRule {
        action: Action::Submit,
        from: RegistrationStatus::ReturnedForEdit,
        to: RegistrationStatus::Submitted,
        roles: &[Role::Maker],
    },
    TransitionRule {
        action: Action::Validate,
        from: RegistrationStatus::Submitted,
        to: RegistrationStatus::UnderReview,
        roles: &[Role::Checker],
    },
    // Audit enters review as well, stamping the audited timestamp.
    TransitionRule {
        action: Action::Audit,
        from: RegistrationStatus::Submitted,
        to: RegistrationStatus::UnderReview,
        roles: &[],
    },
    TransitionRule {
        action: Action::ReturnForEdit,
        from: RegistrationStatus::Submitted,
        to: RegistrationStatus::ReturnedForEdit,
        roles: &[Role::Checker],
    },
    TransitionRule {
        action: Action::Approve,
        from: RegistrationStatus::UnderReview,
        to: RegistrationStatus::Approved,
        roles: &[Role::Regulator],
    },
    TransitionRule {
        action: Action::Reject,
        from: RegistrationStatus::UnderReview,
        to: RegistrationStatus::Rejected,
        roles: &[Role::Regulator],
    },
    TransitionRule {
        action: Action::ReturnForEdit,
        from: RegistrationStatus::UnderReview,
        to: RegistrationStatus::ReturnedForEdit,
        roles: &[Role::Regulator],
    },
    TransitionRule {
        action: Action::ReturnForEdit,
        from: RegistrationStatus::Rejected,
        to: RegistrationStatus::ReturnedForEdit,
        roles: &[],
    },
    TransitionRule {
        action: Action::Archive,
        from: RegistrationStatus::Draft,
        to: RegistrationStatus::Archived,
        roles: &[],
    },
    TransitionRule {
        action: Action::Archive,
        from: RegistrationStatus::Approved,
        to: RegistrationStatus::Archived,
        roles: &[],
    },
    TransitionRule {
        action: Action::FinalSubmission,
        from: RegistrationStatus::Approved,
        to: RegistrationStatus::FinalSubmission,
        roles: &[],
    },
];

/// Whether `from -> to` is a legal edge for any role.
#[must_use]
pub fn is_legal_transition(from: RegistrationStatus, to: RegistrationStatus) -> bool {
    RULES.iter().any(|r| r.from == from && r.to == to)
}

/// Whether a status has no outgoing edges.
#[must_use]
pub fn is_terminal(status: RegistrationStatus) -> bool {
    !RULES.iter().any(|r| r.from == status)
}

/// All statuses reachable from `from`, regardless of role.
#[must_use]
pub fn legal_targets(from: RegistrationStatus) -> Vec<RegistrationStatus> {
    let mut targets = Vec::new();
    for rule in RULES {
        if rule.from == from && !targets.contains(&rule.to) {
            targets.push(rule.to);
        }
    }
    targets
}

/// Actions `role` may currently take on a registration in `status`.
#[must_use]
pub fn available_actions(role: Role, status: RegistrationStatus) -> Vec<Action> {
    let mut actions = Vec::new();
    for rule in RULES {
        if rule.from == status && rule.allows(role) && !actions.contains(&rule.action) {
            actions.push(rule.action);
        }
    }
    actions
}

/// Statuses `role` may currently move a registration in `status` to.
///
/// Projection of the same rules as [`available_actions`], so hints can
/// never disagree with enforcement.
#[must_use]
pub fn next_statuses(role: Role, status: RegistrationStatus) -> Vec<RegistrationStatus> {
    let mut targets = Vec::new();
    for rule in RULES {
        if rule.from == status && rule.allows(role) && !targets.contains(&rule.to) {
            targets.push(rule.to);
        }
    }
    targets
}

/// The notification event announcing entry into `status`, if any.
///
/// Entering review is deliberately silent.
#[must_use]
pub const fn event_for_status(status: RegistrationStatus) -> Option<EventType> {
    match status {
        RegistrationStatus::Submitted => Some(EventType::RegistrationSubmitted),
        RegistrationStatus::Approved => Some(EventType::RegistrationApproved),
        RegistrationStatus::Rejected => Some(EventType::RegistrationRejected),
        RegistrationStatus::ReturnedForEdit => Some(EventType::RegistrationReturnedForEdit),
        RegistrationStatus::Archived => Some(EventType::RegistrationArchived),
        RegistrationStatus::FinalSubmission => Some(EventType::RegistrationFinalSubmission),
        RegistrationStatus::Draft | RegistrationStatus::UnderReview => None,
    }
}

/// UI grouping bucket for an event.
#[must_use]
pub const fn entity_bucket(event: EventType) -> EntityName {
    match event {
        EventType::RegistrationSubmitted
        | EventType::RegistrationApproved
        | EventType::RegistrationRejected
        | EventType::RegistrationReturnedForEdit
        | EventType::RegistrationArchived
        | EventType::RegistrationFinalSubmission => EntityName::Registration,
        EventType::UserCreated => EntityName::User,
        EventType::RoleAssigned => EntityName::Role,
        EventType::GeneralAnnouncement => EntityName::General,
    }
}

/// Users to notify when `action` is taken on a registration.
///
/// Review verdicts go back to the originating maker unless the maker is
/// the actor. Recipients for Submit and FinalSubmission are intentionally
/// unresolved pending a business rule.
// TODO: confirm whether Submit should notify the checker the registration
// was submitted to, then resolve it here.
#[must_use]
pub fn notification_recipients(
    action: Action,
    created_by_user_id: &str,
    performed_by_user_id: &str,
) -> Vec<String> {
    match action {
        Action::Approve | Action::Reject | Action::ReturnForEdit => {
            if created_by_user_id == performed_by_user_id {
                Vec::new()
            } else {
                vec![created_by_user_id.to_string()]
            }
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    const ALL_STATUSES: [RegistrationStatus; 8] = [
        RegistrationStatus::Draft,
        RegistrationStatus::Submitted,
        RegistrationStatus::UnderReview,
        RegistrationStatus::Approved,
        RegistrationStatus::Rejected,
        RegistrationStatus::ReturnedForEdit,
        RegistrationStatus::Archived,
        RegistrationStatus::FinalSubmission,
    ];

    fn expected_targets(from: RegistrationStatus) -> Vec<RegistrationStatus> {
        match from {
            RegistrationStatus::Draft => {
                vec![RegistrationStatus::Submitted, RegistrationStatus::Archived]
            }
            RegistrationStatus::Submitted => vec![
                RegistrationStatus::UnderReview,
                RegistrationStatus::ReturnedForEdit,
            ],
            RegistrationStatus::UnderReview => vec![
                RegistrationStatus::Approved,
                RegistrationStatus::Rejected,
                RegistrationStatus::ReturnedForEdit,
            ],
            RegistrationStatus::Approved => vec![
                RegistrationStatus::FinalSubmission,
                RegistrationStatus::Archived,
            ],
            RegistrationStatus::Rejected => vec![RegistrationStatus::ReturnedForEdit],
            RegistrationStatus::ReturnedForEdit => vec![RegistrationStatus::Submitted],
            RegistrationStatus::Archived | RegistrationStatus::FinalSubmission => vec![],
        }
    }

    #[test]
    fn test_every_status_pair_matches_transition_table() {
        for from in ALL_STATUSES {
            let expected = expected_targets(from);
            for to in ALL_STATUSES {
                assert_eq!(
                    is_legal_transition(from, to),
                    expected.contains(&to),
                    "unexpected legality for {} -> {}",
                    from.as_str(),
                    to.as_str()
                );
            }
        }
    }

    #[test]
    fn test_no_self_transitions() {
        for status in ALL_STATUSES {
            assert!(!is_legal_transition(status, status));
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(is_terminal(RegistrationStatus::Archived));
        assert!(is_terminal(RegistrationStatus::FinalSubmission));
        for status in ALL_STATUSES {
            if status != RegistrationStatus::Archived
                && status != RegistrationStatus::FinalSubmission
            {
                assert!(!is_terminal(status), "{} should not be terminal", status.as_str());
            }
        }
    }

    #[test]
    fn test_maker_submits_from_draft_and_returned() {
        assert_eq!(
            available_actions(Role::Maker, RegistrationStatus::Draft),
            vec![Action::Submit]
        );
        assert_eq!(
            available_actions(Role::Maker, RegistrationStatus::ReturnedForEdit),
            vec![Action::Submit]
        );
        assert!(available_actions(Role::Maker, RegistrationStatus::Submitted).is_empty());
        assert!(available_actions(Role::Maker, RegistrationStatus::UnderReview).is_empty());
    }

    #[test]
    fn test_checker_acts_on_submitted_only() {
        let actions = available_actions(Role::Checker, RegistrationStatus::Submitted);
        assert_eq!(actions, vec![Action::Validate, Action::ReturnForEdit]);
        assert!(available_actions(Role::Checker, RegistrationStatus::Draft).is_empty());
        assert!(available_actions(Role::Checker, RegistrationStatus::UnderReview).is_empty());
    }

    #[test]
    fn test_regulator_acts_on_under_review_only() {
        let actions = available_actions(Role::Regulator, RegistrationStatus::UnderReview);
        assert_eq!(
            actions,
            vec![Action::Approve, Action::Reject, Action::ReturnForEdit]
        );
        assert!(available_actions(Role::Regulator, RegistrationStatus::Submitted).is_empty());
    }

    #[test]
    fn test_admin_gets_every_legal_action() {
        for status in ALL_STATUSES {
            let targets = next_statuses(Role::Admin, status);
            assert_eq!(targets, legal_targets(status));
        }
        let draft_actions = available_actions(Role::Admin, RegistrationStatus::Draft);
        assert!(draft_actions.contains(&Action::Submit));
        assert!(draft_actions.contains(&Action::Archive));
    }

    #[test]
    fn test_hints_agree_with_enforcement() {
        // Anything offered as a next status must also pass validation.
        for role in Role::iter() {
            for status in ALL_STATUSES {
                for target in next_statuses(role, status) {
                    assert!(is_legal_transition(status, target));
                }
            }
        }
    }

    #[test]
    fn test_event_map() {
        assert_eq!(
            event_for_status(RegistrationStatus::Submitted),
            Some(EventType::RegistrationSubmitted)
        );
        assert_eq!(
            event_for_status(RegistrationStatus::Approved),
            Some(EventType::RegistrationApproved)
        );
        assert_eq!(event_for_status(RegistrationStatus::UnderReview), None);
        assert_eq!(event_for_status(RegistrationStatus::Draft), None);
    }

    #[test]
    fn test_entity_buckets() {
        assert_eq!(
            entity_bucket(EventType::RegistrationApproved),
            EntityName::Registration
        );
        assert_eq!(entity_bucket(EventType::UserCreated), EntityName::User);
        assert_eq!(entity_bucket(EventType::RoleAssigned), EntityName::Role);
        assert_eq!(
            entity_bucket(EventType::GeneralAnnouncement),
            EntityName::General
        );
    }

    #[test]
    fn test_recipients_for_review_verdicts() {
        let recipients = notification_recipients(Action::Approve, "maker1", "regulator1");
        assert_eq!(recipients, vec!["maker1".to_string()]);

        // Actor approving their own registration gets no self-notification.
        assert!(notification_recipients(Action::Reject, "maker1", "maker1").is_empty());
    }

    #[test]
    fn test_full_review_walk() {
        // Maker submits, checker validates, regulator approves; a step
        // back to draft is never offered or accepted afterwards.
        let mut status = RegistrationStatus::Draft;
        let steps = [
            (Role::Maker, RegistrationStatus::Submitted),
            (Role::Checker, RegistrationStatus::UnderReview),
            (Role::Regulator, RegistrationStatus::Approved),
        ];

        for (role, target) in steps {
            assert!(next_statuses(role, status).contains(&target));
            assert!(is_legal_transition(status, target));
            status = target;
        }

        assert!(!is_legal_transition(status, RegistrationStatus::Draft));
        for role in Role::iter() {
            assert!(!next_statuses(role, status).contains(&RegistrationStatus::Draft));
        }
    }

    #[test]
    fn test_recipients_unresolved_for_submit() {
        assert!(notification_recipients(Action::Submit, "maker1", "maker1").is_empty());
        assert!(notification_recipients(Action::FinalSubmission, "maker1", "admin1").is_empty());
    }
}
