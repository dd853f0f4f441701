//! Registration entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Registration workflow statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[derive(Default)]
pub enum RegistrationStatus {
    #[sea_orm(string_value = "draft")]
    #[default]
    Draft,
    #[sea_orm(string_value = "submitted")]
    Submitted,
    #[sea_orm(string_value = "underReview")]
    UnderReview,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "returnedForEdit")]
    ReturnedForEdit,
    #[sea_orm(string_value = "archived")]
    Archived,
    #[sea_orm(string_value = "finalSubmission")]
    FinalSubmission,
}

impl RegistrationStatus {
    /// Stable lowerCamelCase name, matching the stored string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::UnderReview => "underReview",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::ReturnedForEdit => "returnedForEdit",
            Self::Archived => "archived",
            Self::FinalSubmission => "finalSubmission",
        }
    }
}

/// A licensing registration.
///
/// Institution name and license number are snapshots copied at creation
/// and never re-derived from the institution row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registration")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub institution_id: String,

    /// Institution name snapshot
    pub institution_name: String,

    /// License number snapshot
    pub license_number: String,

    /// Current workflow status
    pub status: RegistrationStatus,

    /// Maker who created the registration
    pub created_by_user_id: String,

    /// Actor of the most recent transition
    #[sea_orm(nullable)]
    pub updated_by_user_id: Option<String>,

    /// Checker the registration was submitted to
    #[sea_orm(nullable)]
    pub submitted_to_user_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub submitted_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub approved_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub audited_at: Option<DateTimeWithTimeZone>,

    /// Optimistic-concurrency token; every transition bumps it and the
    /// update is filtered on the value read
    #[sea_orm(default_value = 0)]
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::institution::Entity",
        from = "Column::InstitutionId",
        to = "super::institution::Column::Id"
    )]
    Institution,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedByUserId",
        to = "super::user::Column::Id"
    )]
    CreatedBy,

    #[sea_orm(has_many = "super::status_audit_log::Entity")]
    StatusAuditLogs,
}

impl Related<super::institution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Institution.def()
    }
}

impl Related<super::status_audit_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatusAuditLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
