//! Delivery channel contracts.
//!
//! Each outbound channel is a trait so the dispatcher can be wired with
//! real transports in production and no-op implementations in tests or
//! when a channel is not configured.

pub mod email;
pub mod push;
pub mod realtime;
pub mod sms;

use async_trait::async_trait;
use licreg_common::AppResult;
use licreg_db::entities::notification;
use std::sync::Arc;

pub use email::SmtpEmailSender;
pub use push::HttpPushSender;
pub use realtime::{BroadcastRealtimePublisher, InAppEvent};
pub use sms::HttpSmsSender;

/// Outbound email contract.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send a plain-text email.
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}

/// Outbound SMS contract.
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Send a text message to a phone number.
    async fn send(&self, phone: &str, body: &str) -> AppResult<()>;
}

/// Outbound push contract.
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Send a push message addressed by user id.
    async fn send(&self, user_id: &str, body: &str) -> AppResult<()>;
}

/// Real-time in-app delivery contract, keyed by recipient user id.
#[async_trait]
pub trait RealtimePublisher: Send + Sync {
    /// Push a notification to the recipient's connection group.
    async fn publish(&self, notification: &notification::Model) -> AppResult<()>;
}

/// A no-op email sender for tests or a disabled channel.
#[derive(Clone, Default)]
pub struct NoOpEmailSender;

#[async_trait]
impl EmailSender for NoOpEmailSender {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> AppResult<()> {
        Ok(())
    }
}

/// A no-op SMS sender for tests or a disabled channel.
#[derive(Clone, Default)]
pub struct NoOpSmsSender;

#[async_trait]
impl SmsSender for NoOpSmsSender {
    async fn send(&self, _phone: &str, _body: &str) -> AppResult<()> {
        Ok(())
    }
}

/// A no-op push sender for tests or a disabled channel.
#[derive(Clone, Default)]
pub struct NoOpPushSender;

#[async_trait]
impl PushSender for NoOpPushSender {
    async fn send(&self, _user_id: &str, _body: &str) -> AppResult<()> {
        Ok(())
    }
}

/// A no-op realtime publisher for tests or when streaming is disabled.
#[derive(Clone, Default)]
pub struct NoOpRealtimePublisher;

#[async_trait]
impl RealtimePublisher for NoOpRealtimePublisher {
    async fn publish(&self, _notification: &notification::Model) -> AppResult<()> {
        Ok(())
    }
}

/// Wrapper for boxed `EmailSender` trait object.
pub type EmailSenderService = Arc<dyn EmailSender>;
/// Wrapper for boxed `SmsSender` trait object.
pub type SmsSenderService = Arc<dyn SmsSender>;
/// Wrapper for boxed `PushSender` trait object.
pub type PushSenderService = Arc<dyn PushSender>;
/// Wrapper for boxed `RealtimePublisher` trait object.
pub type RealtimePublisherService = Arc<dyn RealtimePublisher>;
