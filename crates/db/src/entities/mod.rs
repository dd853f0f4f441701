//! Database entities.

pub mod institution;
pub mod message_template;
pub mod notification;
pub mod notification_log;
pub mod notification_read_log;
pub mod registration;
pub mod registration_contact;
pub mod registration_document;
pub mod status_audit_log;
pub mod user;

pub use institution::Entity as Institution;
pub use message_template::Entity as MessageTemplate;
pub use notification::Entity as Notification;
pub use notification_log::Entity as NotificationLog;
pub use notification_read_log::Entity as NotificationReadLog;
pub use registration::Entity as Registration;
pub use registration_contact::Entity as RegistrationContact;
pub use registration_document::Entity as RegistrationDocument;
pub use status_audit_log::Entity as StatusAuditLog;
pub use user::Entity as User;
