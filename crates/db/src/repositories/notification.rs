//! Notification repository.

use std::sync::Arc;

use crate::entities::{
    Notification, NotificationLog, NotificationReadLog, notification,
    notification::DeliveryStatus, notification_log, notification_read_log,
};
use licreg_common::{AppError, AppResult};
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

/// Notification repository for database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a notification by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<notification::Model>> {
        Notification::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new notification.
    pub async fn create(&self, model: notification::ActiveModel) -> AppResult<notification::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new notification on the given connection (transactional).
    pub async fn create_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: notification::ActiveModel,
    ) -> AppResult<notification::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a notification's delivery status.
    pub async fn update_status(
        &self,
        notification: notification::Model,
        status: DeliveryStatus,
    ) -> AppResult<notification::Model> {
        let mut active: notification::ActiveModel = notification.into();
        active.status = Set(status);
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set a notification's retry count.
    ///
    /// The retry sweep uses this to age out Failed originals it has
    /// already re-sent; their delivery status is left as-is.
    pub async fn update_retry_count(
        &self,
        notification: notification::Model,
        retry_count: i32,
    ) -> AppResult<notification::Model> {
        let mut active: notification::ActiveModel = notification.into();
        active.retry_count = Set(retry_count);
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get notifications for a recipient (paginated, newest first).
    pub async fn find_by_recipient(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<notification::Model>> {
        let mut query = Notification::find()
            .filter(notification::Column::RecipientUserId.eq(user_id))
            .order_by_desc(notification::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(notification::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a recipient's notifications without a read receipt, newest first.
    pub async fn find_unread_by_recipient(
        &self,
        user_id: &str,
        limit: u64,
    ) -> AppResult<Vec<notification::Model>> {
        Notification::find()
            .filter(notification::Column::RecipientUserId.eq(user_id))
            .filter(
                notification::Column::Id.not_in_subquery(
                    Query::select()
                        .column(notification_read_log::Column::NotificationId)
                        .from(NotificationReadLog)
                        .and_where(notification_read_log::Column::UserId.eq(user_id))
                        .to_owned(),
                ),
            )
            .order_by_desc(notification::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get failed notifications eligible for a retry sweep.
    pub async fn find_failed(
        &self,
        limit: u64,
        max_retry_count: i32,
    ) -> AppResult<Vec<notification::Model>> {
        Notification::find()
            .filter(notification::Column::Status.eq(DeliveryStatus::Failed))
            .filter(notification::Column::RetryCount.lt(max_retry_count))
            .order_by_asc(notification::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get pending notifications (outbox sweep).
    pub async fn find_pending(&self, limit: u64) -> AppResult<Vec<notification::Model>> {
        Notification::find()
            .filter(notification::Column::Status.eq(DeliveryStatus::Pending))
            .order_by_asc(notification::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Append a delivery log entry.
    pub async fn append_log(
        &self,
        model: notification_log::ActiveModel,
    ) -> AppResult<notification_log::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get delivery log entries for a notification, most recent first.
    pub async fn find_logs(&self, notification_id: &str) -> AppResult<Vec<notification_log::Model>> {
        NotificationLog::find()
            .filter(notification_log::Column::NotificationId.eq(notification_id))
            .order_by_desc(notification_log::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a read receipt.
    pub async fn create_read_log(
        &self,
        model: notification_read_log::ActiveModel,
    ) -> AppResult<notification_read_log::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether a read receipt exists for (notification, user).
    pub async fn has_read_log(&self, notification_id: &str, user_id: &str) -> AppResult<bool> {
        let count = NotificationReadLog::find()
            .filter(notification_read_log::Column::NotificationId.eq(notification_id))
            .filter(notification_read_log::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::notification::{Channel, EntityName, EventType};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_notification(id: &str, status: DeliveryStatus) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            registration_id: Some("reg1".to_string()),
            event_type: EventType::RegistrationSubmitted,
            recipient_user_id: "checker1".to_string(),
            triggered_by_user_id: "maker1".to_string(),
            message: "Registration reg1 was submitted".to_string(),
            channel: Channel::InApp,
            status,
            entity_name: EntityName::Registration,
            entity_id: Some("reg1".to_string()),
            retry_count: 0,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_failed_respects_results() {
        let failed = create_test_notification("n1", DeliveryStatus::Failed);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[failed.clone()]])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let results = repo.find_failed(50, 3).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, DeliveryStatus::Failed);
    }

    #[tokio::test]
    async fn test_update_retry_count_leaves_status_failed() {
        let mut bumped = create_test_notification("n1", DeliveryStatus::Failed);
        bumped.retry_count = 1;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[bumped.clone()]])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let original = create_test_notification("n1", DeliveryStatus::Failed);
        let updated = repo.update_retry_count(original, 1).await.unwrap();

        assert_eq!(updated.retry_count, 1);
        assert_eq!(updated.status, DeliveryStatus::Failed);
    }

    #[tokio::test]
    async fn test_find_unread_by_recipient_returns_rows() {
        let unread = create_test_notification("n2", DeliveryStatus::Sent);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[unread]])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let results = repo.find_unread_by_recipient("checker1", 20).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "n2");
    }

    #[tokio::test]
    async fn test_has_read_log_true_when_row_exists() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        assert!(repo.has_read_log("n1", "u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_has_read_log_false_when_no_row() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(0))
                }]])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        assert!(!repo.has_read_log("n1", "u1").await.unwrap());
    }
}
