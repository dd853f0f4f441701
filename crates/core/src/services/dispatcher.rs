//! Notification dispatcher.
//!
//! Renders a message for a workflow event, persists a Pending
//! notification row, attempts delivery over the requested channel, and
//! records exactly one delivery log row per attempt. Failed deliveries
//! are captured on the notification itself and picked up again by the
//! retry sweep; they never propagate into the workflow that triggered
//! them.

use std::collections::HashMap;
use std::sync::Arc;

use licreg_common::config::NotificationConfig;
use licreg_common::{AppError, AppResult, IdGenerator};
use licreg_db::entities::notification::{self, Channel, DeliveryStatus, EventType};
use licreg_db::entities::{notification_log, notification_read_log};
use licreg_db::repositories::{MessageTemplateRepository, NotificationRepository, UserRepository};
use sea_orm::{ConnectionTrait, Set};

use crate::services::channels::{
    EmailSenderService, NoOpEmailSender, NoOpPushSender, NoOpRealtimePublisher, NoOpSmsSender,
    PushSenderService, RealtimePublisherService, SmsSenderService,
};
use crate::services::localization::{self, Localizer};
use crate::services::workflow;

/// Maximum notifications re-attempted per retry sweep.
const RETRY_BATCH_SIZE: u64 = 50;

/// A dispatch request: which event, for whom, over which channel.
#[derive(Debug, Clone)]
pub struct SendRequest {
    /// Related registration, when the event concerns one.
    pub registration_id: Option<String>,
    /// Event being announced.
    pub event_type: EventType,
    /// User whose action triggered the notification.
    pub triggered_by_user_id: String,
    /// User receiving the notification.
    pub recipient_user_id: String,
    /// Delivery channel.
    pub channel: Channel,
    /// `%Token%` substitutions for the message template.
    pub tokens: HashMap<String, String>,
    /// Retry generation; zero for first attempts.
    pub retry_count: i32,
}

impl SendRequest {
    /// Create a request for the default in-app channel.
    #[must_use]
    pub fn new(event_type: EventType, triggered_by_user_id: &str, recipient_user_id: &str) -> Self {
        Self {
            registration_id: None,
            event_type,
            triggered_by_user_id: triggered_by_user_id.to_string(),
            recipient_user_id: recipient_user_id.to_string(),
            channel: Channel::InApp,
            tokens: HashMap::new(),
            retry_count: 0,
        }
    }

    /// Attach the registration the event concerns.
    #[must_use]
    pub fn with_registration(mut self, registration_id: &str) -> Self {
        self.registration_id = Some(registration_id.to_string());
        self
    }

    /// Select a delivery channel.
    #[must_use]
    pub const fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    /// Add a `%Token%` substitution.
    #[must_use]
    pub fn with_token(mut self, key: &str, value: &str) -> Self {
        self.tokens.insert(key.to_string(), value.to_string());
        self
    }
}

/// Notification dispatch service.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notification_repo: NotificationRepository,
    template_repo: MessageTemplateRepository,
    user_repo: UserRepository,
    localizer: Localizer,
    default_locale: String,
    email: EmailSenderService,
    sms: SmsSenderService,
    push: PushSenderService,
    realtime: RealtimePublisherService,
    id_gen: IdGenerator,
}

impl NotificationDispatcher {
    /// Create a dispatcher with no-op channel senders.
    #[must_use]
    pub fn new(
        notification_repo: NotificationRepository,
        template_repo: MessageTemplateRepository,
        user_repo: UserRepository,
        config: &NotificationConfig,
    ) -> Self {
        Self {
            notification_repo,
            template_repo,
            user_repo,
            localizer: Localizer::new(),
            default_locale: config.default_locale.clone(),
            email: Arc::new(NoOpEmailSender),
            sms: Arc::new(NoOpSmsSender),
            push: Arc::new(NoOpPushSender),
            realtime: Arc::new(NoOpRealtimePublisher),
            id_gen: IdGenerator::new(),
        }
    }

    /// Set the email channel sender.
    pub fn set_email_sender(&mut self, sender: EmailSenderService) {
        self.email = sender;
    }

    /// Set the SMS channel sender.
    pub fn set_sms_sender(&mut self, sender: SmsSenderService) {
        self.sms = sender;
    }

    /// Set the push channel sender.
    pub fn set_push_sender(&mut self, sender: PushSenderService) {
        self.push = sender;
    }

    /// Set the in-app realtime publisher.
    pub fn set_realtime_publisher(&mut self, publisher: RealtimePublisherService) {
        self.realtime = publisher;
    }

    /// Render the message body for a request.
    ///
    /// A channel-scoped template named `Notification.{EventType}` wins;
    /// without one the localized default body for the event is used.
    /// Registration and actor ids are always available as tokens.
    pub async fn render_message(&self, request: &SendRequest) -> AppResult<String> {
        let mut tokens = request.tokens.clone();
        if let Some(registration_id) = &request.registration_id {
            tokens
                .entry("RegistrationId".to_string())
                .or_insert_with(|| registration_id.clone());
        }
        tokens
            .entry("ActorId".to_string())
            .or_insert_with(|| request.triggered_by_user_id.clone());

        let template_name = format!("Notification.{}", request.event_type.template_key());
        let template = self
            .template_repo
            .find_active(&template_name, request.channel, &self.default_locale)
            .await?;

        Ok(template.map_or_else(
            || {
                self.localizer
                    .default_notification(&self.default_locale, request.event_type, &tokens)
            },
            |t| localization::substitute(&t.body, &tokens),
        ))
    }

    /// Persist a Pending notification for a request.
    pub async fn enqueue(&self, request: &SendRequest) -> AppResult<notification::Model> {
        let model = self.build_pending(request).await?;
        self.notification_repo.create(model).await
    }

    /// Persist a Pending notification on the given connection.
    ///
    /// Used by the lifecycle to write the notification intent inside the
    /// same transaction as the status change (outbox style); delivery
    /// happens after commit.
    pub async fn enqueue_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        request: &SendRequest,
    ) -> AppResult<notification::Model> {
        let model = self.build_pending(request).await?;
        self.notification_repo.create_in(conn, model).await
    }

    /// Attempt delivery of a persisted notification.
    ///
    /// Always flips the notification to Sent or Failed and appends one
    /// delivery log row. Only storage errors propagate; delivery errors
    /// are captured in the log.
    pub async fn dispatch(&self, pending: notification::Model) -> AppResult<notification::Model> {
        let outcome = self.deliver(&pending).await;

        let (status, success, response) = match outcome {
            Ok(()) => (DeliveryStatus::Sent, true, "delivered".to_string()),
            Err(e) => {
                tracing::warn!(
                    notification_id = %pending.id,
                    channel = ?pending.channel,
                    error = %e,
                    "Notification delivery failed"
                );
                (DeliveryStatus::Failed, false, e.to_string())
            }
        };

        let updated = self.notification_repo.update_status(pending, status).await?;

        let log = notification_log::ActiveModel {
            id: Set(self.id_gen.generate()),
            notification_id: Set(updated.id.clone()),
            channel: Set(updated.channel),
            success: Set(success),
            response: Set(Some(response)),
            created_at: Set(chrono::Utc::now().into()),
        };
        self.notification_repo.append_log(log).await?;

        Ok(updated)
    }

    /// Render, persist, and deliver a notification.
    pub async fn send(&self, request: &SendRequest) -> AppResult<notification::Model> {
        let pending = self.enqueue(request).await?;
        self.dispatch(pending).await
    }

    /// Re-attempt failed notifications, bounded per sweep.
    ///
    /// Each retry creates a brand-new notification carrying the original
    /// message and an incremented retry count. The original keeps its
    /// Failed status but has its own retry count advanced, so it stops
    /// qualifying for later sweeps once `max_attempts` is reached.
    pub async fn retry_failed(&self, max_attempts: u32) -> AppResult<u64> {
        let max_retries = i32::try_from(max_attempts).unwrap_or(i32::MAX);
        let failed = self
            .notification_repo
            .find_failed(RETRY_BATCH_SIZE, max_retries)
            .await?;

        let mut retried = 0;
        for original in failed {
            let mut request = SendRequest::new(
                original.event_type,
                &original.triggered_by_user_id,
                &original.recipient_user_id,
            )
            .with_channel(original.channel)
            .with_token("Message", &original.message);

            request.registration_id.clone_from(&original.registration_id);
            request.retry_count = original.retry_count + 1;

            self.send(&request).await?;

            let next_count = original.retry_count + 1;
            self.notification_repo
                .update_retry_count(original, next_count)
                .await?;
            retried += 1;
        }

        Ok(retried)
    }

    /// Record an in-app read receipt.
    ///
    /// Marking twice inserts a second receipt; read state is derived from
    /// existence, so this stays idempotent for the caller.
    pub async fn mark_as_read(
        &self,
        notification_id: &str,
        user_id: &str,
    ) -> AppResult<notification_read_log::Model> {
        if notification_id.is_empty() {
            return Err(AppError::InvalidArgument(
                "notification id must not be empty".to_string(),
            ));
        }
        if user_id.is_empty() {
            return Err(AppError::InvalidArgument(
                "user id must not be empty".to_string(),
            ));
        }

        self.notification_repo
            .find_by_id(notification_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Notification {notification_id} not found"))
            })?;

        let model = notification_read_log::ActiveModel {
            id: Set(self.id_gen.generate()),
            notification_id: Set(notification_id.to_string()),
            user_id: Set(user_id.to_string()),
            read_at: Set(chrono::Utc::now().into()),
        };
        self.notification_repo.create_read_log(model).await
    }

    /// Whether a user has read a notification.
    pub async fn is_read(&self, notification_id: &str, user_id: &str) -> AppResult<bool> {
        self.notification_repo
            .has_read_log(notification_id, user_id)
            .await
    }

    /// Notifications addressed to a user, newest first.
    pub async fn for_recipient(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<notification::Model>> {
        self.notification_repo
            .find_by_recipient(user_id, limit, until_id)
            .await
    }

    /// Notifications a user has not read yet, newest first.
    pub async fn unread_for_user(
        &self,
        user_id: &str,
        limit: u64,
    ) -> AppResult<Vec<notification::Model>> {
        self.notification_repo
            .find_unread_by_recipient(user_id, limit)
            .await
    }

    async fn build_pending(&self, request: &SendRequest) -> AppResult<notification::ActiveModel> {
        let message = self.render_message(request).await?;
        let entity_name = workflow::entity_bucket(request.event_type);

        Ok(notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            registration_id: Set(request.registration_id.clone()),
            event_type: Set(request.event_type),
            recipient_user_id: Set(request.recipient_user_id.clone()),
            triggered_by_user_id: Set(request.triggered_by_user_id.clone()),
            message: Set(message),
            channel: Set(request.channel),
            status: Set(DeliveryStatus::Pending),
            entity_name: Set(entity_name),
            entity_id: Set(request.registration_id.clone()),
            retry_count: Set(request.retry_count),
            created_at: Set(chrono::Utc::now().into()),
        })
    }

    async fn deliver(&self, notification: &notification::Model) -> AppResult<()> {
        match notification.channel {
            Channel::InApp => self.realtime.publish(notification).await,
            Channel::Email => {
                let user = self
                    .user_repo
                    .find_by_id(&notification.recipient_user_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::DeliveryFailure("recipient user not found".to_string())
                    })?;
                let address = user.email.ok_or_else(|| {
                    AppError::DeliveryFailure("recipient has no email address".to_string())
                })?;
                self.email
                    .send(&address, "Licensing registration update", &notification.message)
                    .await
            }
            Channel::Sms => {
                let user = self
                    .user_repo
                    .find_by_id(&notification.recipient_user_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::DeliveryFailure("recipient user not found".to_string())
                    })?;
                let phone = user.phone.ok_or_else(|| {
                    AppError::DeliveryFailure("recipient has no phone number".to_string())
                })?;
                self.sms.send(&phone, &notification.message).await
            }
            Channel::Push => {
                self.push
                    .send(&notification.recipient_user_id, &notification.message)
                    .await
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use licreg_db::entities::notification::EntityName;
    use licreg_db::entities::{message_template, notification_read_log, user};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

    fn dispatcher_on(db: Arc<DatabaseConnection>) -> NotificationDispatcher {
        NotificationDispatcher::new(
            NotificationRepository::new(db.clone()),
            MessageTemplateRepository::new(db.clone()),
            UserRepository::new(db),
            &NotificationConfig::default(),
        )
    }

    fn notification_row(
        id: &str,
        channel: Channel,
        status: DeliveryStatus,
        retry_count: i32,
    ) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            registration_id: Some("reg1".to_string()),
            event_type: EventType::RegistrationApproved,
            recipient_user_id: "maker1".to_string(),
            triggered_by_user_id: "regulator1".to_string(),
            message: "Registration reg1 was approved by user regulator1".to_string(),
            channel,
            status,
            entity_name: EntityName::Registration,
            entity_id: Some("reg1".to_string()),
            retry_count,
            created_at: Utc::now().into(),
        }
    }

    fn log_row(id: &str, notification_id: &str, success: bool) -> notification_log::Model {
        notification_log::Model {
            id: id.to_string(),
            notification_id: notification_id.to_string(),
            channel: Channel::InApp,
            success,
            response: Some(if success { "delivered" } else { "boom" }.to_string()),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_render_message_uses_template_when_present() {
        let template = message_template::Model {
            id: "t1".to_string(),
            name: "Notification.RegistrationApproved".to_string(),
            channel: Channel::InApp,
            subject: None,
            body: "Approved: %RegistrationId% (by %ActorId%)".to_string(),
            locale: "en".to_string(),
            is_active: true,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[template]])
                .into_connection(),
        );

        let dispatcher = dispatcher_on(db);
        let request = SendRequest::new(EventType::RegistrationApproved, "regulator1", "maker1")
            .with_registration("reg1");

        let message = dispatcher.render_message(&request).await.unwrap();
        assert_eq!(message, "Approved: reg1 (by regulator1)");
    }

    #[tokio::test]
    async fn test_render_message_falls_back_to_localized_default() {
        // No exact-locale template and no any-locale fallback.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    Vec::<message_template::Model>::new(),
                    Vec::<message_template::Model>::new(),
                ])
                .into_connection(),
        );

        let dispatcher = dispatcher_on(db);
        let request = SendRequest::new(EventType::RegistrationApproved, "regulator1", "maker1")
            .with_registration("reg1");

        let message = dispatcher.render_message(&request).await.unwrap();
        assert_eq!(message, "Registration reg1 was approved by user regulator1");
    }

    #[tokio::test]
    async fn test_send_produces_notification_and_matching_log() {
        let sent = notification_row("n1", Channel::InApp, DeliveryStatus::Sent, 0);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // template lookups: exact locale, then any-locale fallback
                .append_query_results([
                    Vec::<message_template::Model>::new(),
                    Vec::<message_template::Model>::new(),
                ])
                // insert pending notification
                .append_query_results([[notification_row(
                    "n1",
                    Channel::InApp,
                    DeliveryStatus::Pending,
                    0,
                )]])
                // status update to Sent
                .append_query_results([[sent.clone()]])
                // delivery log insert
                .append_query_results([[log_row("log1", "n1", true)]])
                .into_connection(),
        );

        let dispatcher = dispatcher_on(db);
        let request = SendRequest::new(EventType::RegistrationApproved, "regulator1", "maker1")
            .with_registration("reg1");

        let result = dispatcher.send(&request).await.unwrap();
        assert_eq!(result.status, DeliveryStatus::Sent);
    }

    #[tokio::test]
    async fn test_dispatch_captures_delivery_failure() {
        // Email channel with a recipient lacking an email address: the
        // failure lands on the notification, not the caller.
        let pending = notification_row("n1", Channel::Email, DeliveryStatus::Pending, 0);
        let failed = notification_row("n1", Channel::Email, DeliveryStatus::Failed, 0);

        let recipient = user::Model {
            id: "maker1".to_string(),
            username: "maker1".to_string(),
            email: None,
            phone: None,
            role: user::Role::Maker,
            is_active: true,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // recipient lookup
                .append_query_results([[recipient]])
                // status update to Failed
                .append_query_results([[failed.clone()]])
                // delivery log insert
                .append_query_results([[log_row("log1", "n1", false)]])
                .into_connection(),
        );

        let dispatcher = dispatcher_on(db);
        let result = dispatcher.dispatch(pending).await.unwrap();
        assert_eq!(result.status, DeliveryStatus::Failed);
    }

    #[tokio::test]
    async fn test_retry_failed_creates_new_row_and_ages_original() {
        let original = notification_row("n1", Channel::InApp, DeliveryStatus::Failed, 0);
        let retried_sent = notification_row("n2", Channel::InApp, DeliveryStatus::Sent, 1);
        // Original stays Failed; only its retry count advances.
        let aged_original = notification_row("n1", Channel::InApp, DeliveryStatus::Failed, 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // failed sweep query
                .append_query_results([[original]])
                // template lookups for the re-send
                .append_query_results([
                    Vec::<message_template::Model>::new(),
                    Vec::<message_template::Model>::new(),
                ])
                // new pending row insert
                .append_query_results([[notification_row(
                    "n2",
                    Channel::InApp,
                    DeliveryStatus::Pending,
                    1,
                )]])
                // status update to Sent
                .append_query_results([[retried_sent]])
                // delivery log insert
                .append_query_results([[log_row("log2", "n2", true)]])
                // retry count update on the original
                .append_query_results([[aged_original]])
                .into_connection(),
        );

        let dispatcher = dispatcher_on(db);
        let retried = dispatcher.retry_failed(3).await.unwrap();
        assert_eq!(retried, 1);
    }

    #[tokio::test]
    async fn test_mark_as_read_rejects_empty_ids() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let dispatcher = dispatcher_on(db);

        let err = dispatcher.mark_as_read("", "u1").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));

        let err = dispatcher.mark_as_read("n1", "").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_mark_as_read_inserts_receipt() {
        let receipt = notification_read_log::Model {
            id: "r1".to_string(),
            notification_id: "n1".to_string(),
            user_id: "u1".to_string(),
            read_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // notification existence lookup
                .append_query_results([[notification_row(
                    "n1",
                    Channel::InApp,
                    DeliveryStatus::Sent,
                    0,
                )]])
                // receipt insert
                .append_query_results([[receipt]])
                .into_connection(),
        );

        let dispatcher = dispatcher_on(db);
        let stored = dispatcher.mark_as_read("n1", "u1").await.unwrap();
        assert_eq!(stored.notification_id, "n1");
        assert_eq!(stored.user_id, "u1");
    }

    #[tokio::test]
    async fn test_mark_as_read_unknown_notification_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<notification::Model>::new()])
                .into_connection(),
        );

        let dispatcher = dispatcher_on(db);
        let err = dispatcher.mark_as_read("missing", "u1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unread_for_user_lists_rows_without_receipts() {
        let unread = notification_row("n3", Channel::InApp, DeliveryStatus::Sent, 0);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[unread]])
                .into_connection(),
        );

        let dispatcher = dispatcher_on(db);
        let results = dispatcher.unread_for_user("maker1", 20).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "n3");
    }
}
