//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Workflow roles.
///
/// Maker originates registrations, Checker validates them, Regulator
/// issues the final verdict. Admin is the elevated administrative role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Role {
    #[sea_orm(string_value = "maker")]
    Maker,
    #[sea_orm(string_value = "checker")]
    Checker,
    #[sea_orm(string_value = "regulator")]
    Regulator,
    #[sea_orm(string_value = "admin")]
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    /// Email address (for the email notification channel)
    #[sea_orm(nullable)]
    pub email: Option<String>,

    /// Phone number (for the SMS notification channel)
    #[sea_orm(nullable)]
    pub phone: Option<String>,

    /// Workflow role
    pub role: Role,

    /// Activated together with the owning institution on approval
    #[sea_orm(default_value = false)]
    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
