//! Institution entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A regulated institution applying for licensing registrations.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "institution")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Legal name of the institution
    pub name: String,

    /// License number issued by the regulator
    #[sea_orm(unique)]
    pub license_number: String,

    /// Activated when a registration is approved
    #[sea_orm(default_value = false)]
    pub is_active: bool,

    /// Primary account holder, activated together with the institution
    #[sea_orm(nullable)]
    pub primary_user_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::PrimaryUserId",
        to = "super::user::Column::Id"
    )]
    PrimaryUser,

    #[sea_orm(has_many = "super::registration::Entity")]
    Registrations,
}

impl Related<super::registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
