//! Core services.

pub mod audit;
pub mod channels;
pub mod dispatcher;
pub mod hints;
pub mod lifecycle;
pub mod localization;
pub mod workflow;

pub use audit::StatusAuditLogService;
pub use channels::{
    EmailSender, EmailSenderService, NoOpEmailSender, NoOpPushSender, NoOpRealtimePublisher,
    NoOpSmsSender, PushSender, PushSenderService, RealtimePublisher, RealtimePublisherService,
    SmsSender, SmsSenderService,
};
pub use dispatcher::{NotificationDispatcher, SendRequest};
pub use hints::ActionHintEngine;
pub use lifecycle::RegistrationLifecycle;
pub use localization::Localizer;
pub use workflow::Action;
