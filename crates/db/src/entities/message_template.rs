//! Message template entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::notification::Channel;

/// Channel-scoped notification template.
///
/// Named `Notification.{EventType}`; the body carries `%Token%`
/// placeholders substituted at render time.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "message_template")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Template name, e.g. `Notification.RegistrationApproved`
    pub name: String,

    pub channel: Channel,

    /// Subject line (email channel only)
    #[sea_orm(nullable)]
    pub subject: Option<String>,

    /// Body with `%Token%` placeholders
    #[sea_orm(column_type = "Text")]
    pub body: String,

    pub locale: String,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
