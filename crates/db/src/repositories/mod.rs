//! Database repositories.

pub mod institution;
pub mod message_template;
pub mod notification;
pub mod registration;
pub mod status_audit_log;
pub mod user;

pub use institution::InstitutionRepository;
pub use message_template::MessageTemplateRepository;
pub use notification::NotificationRepository;
pub use registration::{RegistrationRepository, TransitionStamps};
pub use status_audit_log::StatusAuditLogRepository;
pub use user::UserRepository;
