//! Status audit log entity (append-only).

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::registration::RegistrationStatus;

/// Finer-grained verdict of a validation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationStatus {
    Passed,
    Failed,
}

/// Finer-grained verdict of an approval step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApprovalStatus {
    Granted,
    Conditional,
    Denied,
}

/// Finer-grained verdict of an audit step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuditStatus {
    Satisfactory,
    NeedsFollowUp,
    Unsatisfactory,
}

/// Tagged sub-outcome of a transition.
///
/// One history row can represent different kinds of decisions depending
/// on which step produced it; the variant says which. Stored as JSONB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(tag = "kind", content = "status", rename_all = "camelCase")]
pub enum LogOutcome {
    Submitted,
    Validated(ValidationStatus),
    Approved(ApprovalStatus),
    Audited(AuditStatus),
    Other,
}

/// One immutable fact per status change.
///
/// Rows are only ever inserted; no repository or service exposes an
/// update or delete for this table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "status_audit_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub registration_id: String,

    /// Status the registration ended up in
    pub status: RegistrationStatus,

    /// Sub-outcome of the step that produced this row, when any
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub outcome: Option<LogOutcome>,

    /// Actor who performed the transition
    pub performed_by_user_id: String,

    /// Free-text remarks
    #[sea_orm(column_type = "Text", nullable)]
    pub remarks: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::registration::Entity",
        from = "Column::RegistrationId",
        to = "super::registration::Column::Id",
        on_delete = "Cascade"
    )]
    Registration,
}

impl Related<super::registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registration.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_json_shape() {
        let outcome = LogOutcome::Validated(ValidationStatus::Passed);
        let json = serde_json::to_value(outcome).unwrap();
        assert_eq!(json["kind"], "validated");
        assert_eq!(json["status"], "passed");

        let back: LogOutcome = serde_json::from_value(json).unwrap();
        assert_eq!(back, outcome);
    }

    #[test]
    fn test_unit_outcome_json_shape() {
        let json = serde_json::to_value(LogOutcome::Submitted).unwrap();
        assert_eq!(json["kind"], "submitted");
    }
}
