//! Notification entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Workflow and lifecycle events that produce notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(48))")]
pub enum EventType {
    #[sea_orm(string_value = "registrationSubmitted")]
    RegistrationSubmitted,
    #[sea_orm(string_value = "registrationApproved")]
    RegistrationApproved,
    #[sea_orm(string_value = "registrationRejected")]
    RegistrationRejected,
    #[sea_orm(string_value = "registrationReturnedForEdit")]
    RegistrationReturnedForEdit,
    #[sea_orm(string_value = "registrationArchived")]
    RegistrationArchived,
    #[sea_orm(string_value = "registrationFinalSubmission")]
    RegistrationFinalSubmission,
    #[sea_orm(string_value = "userCreated")]
    UserCreated,
    #[sea_orm(string_value = "roleAssigned")]
    RoleAssigned,
    #[sea_orm(string_value = "generalAnnouncement")]
    GeneralAnnouncement,
}

impl EventType {
    /// Template-name suffix, e.g. `Notification.RegistrationApproved`.
    #[must_use]
    pub const fn template_key(self) -> &'static str {
        match self {
            Self::RegistrationSubmitted => "RegistrationSubmitted",
            Self::RegistrationApproved => "RegistrationApproved",
            Self::RegistrationRejected => "RegistrationRejected",
            Self::RegistrationReturnedForEdit => "RegistrationReturnedForEdit",
            Self::RegistrationArchived => "RegistrationArchived",
            Self::RegistrationFinalSubmission => "RegistrationFinalSubmission",
            Self::UserCreated => "UserCreated",
            Self::RoleAssigned => "RoleAssigned",
            Self::GeneralAnnouncement => "GeneralAnnouncement",
        }
    }
}

/// Delivery channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum Channel {
    #[sea_orm(string_value = "inApp")]
    #[default]
    InApp,
    #[sea_orm(string_value = "email")]
    Email,
    #[sea_orm(string_value = "sms")]
    Sms,
    #[sea_orm(string_value = "push")]
    Push,
}

/// Delivery status of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum DeliveryStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// UI grouping bucket, derived from the event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EntityName {
    #[sea_orm(string_value = "registration")]
    Registration,
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "role")]
    Role,
    #[sea_orm(string_value = "general")]
    General,
}

/// One logical message per dispatch attempt.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Related registration, when the event concerns one
    #[sea_orm(nullable)]
    pub registration_id: Option<String>,

    pub event_type: EventType,

    /// The user receiving the notification
    pub recipient_user_id: String,

    /// The user whose action triggered the notification
    pub triggered_by_user_id: String,

    /// Rendered message text
    #[sea_orm(column_type = "Text")]
    pub message: String,

    pub channel: Channel,

    pub status: DeliveryStatus,

    /// UI grouping bucket
    pub entity_name: EntityName,

    /// Linked entity id for UI grouping
    #[sea_orm(nullable)]
    pub entity_id: Option<String>,

    /// How many times this logical message has been retried; retries
    /// create new rows carrying the incremented count
    #[sea_orm(default_value = 0)]
    pub retry_count: i32,

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

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RecipientUserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Recipient,

    #[sea_orm(has_many = "super::notification_log::Entity")]
    Logs,
}

impl Related<super::notification_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Logs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
