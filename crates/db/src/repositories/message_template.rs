//! Message template repository.

use std::sync::Arc;

use crate::entities::{MessageTemplate, message_template, notification::Channel};
use licreg_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Message template repository for database operations.
#[derive(Clone)]
pub struct MessageTemplateRepository {
    db: Arc<DatabaseConnection>,
}

impl MessageTemplateRepository {
    /// Create a new message template repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the active template for (name, channel, locale).
    ///
    /// Falls back to any locale for the (name, channel) pair so a missing
    /// translation degrades to the default-language template.
    pub async fn find_active(
        &self,
        name: &str,
        channel: Channel,
        locale: &str,
    ) -> AppResult<Option<message_template::Model>> {
        let exact = MessageTemplate::find()
            .filter(message_template::Column::Name.eq(name))
            .filter(message_template::Column::Channel.eq(channel))
            .filter(message_template::Column::Locale.eq(locale))
            .filter(message_template::Column::IsActive.eq(true))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if exact.is_some() {
            return Ok(exact);
        }

        MessageTemplate::find()
            .filter(message_template::Column::Name.eq(name))
            .filter(message_template::Column::Channel.eq(channel))
            .filter(message_template::Column::IsActive.eq(true))
            .order_by_asc(message_template::Column::Locale)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new template.
    pub async fn create(
        &self,
        model: message_template::ActiveModel,
    ) -> AppResult<message_template::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_template(id: &str, locale: &str) -> message_template::Model {
        message_template::Model {
            id: id.to_string(),
            name: "Notification.RegistrationApproved".to_string(),
            channel: Channel::Email,
            subject: Some("Registration approved".to_string()),
            body: "Registration %RegistrationId% was approved by %ActorId%".to_string(),
            locale: locale.to_string(),
            is_active: true,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_active_exact_locale() {
        let template = create_test_template("t1", "en");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[template]])
                .into_connection(),
        );

        let repo = MessageTemplateRepository::new(db);
        let found = repo
            .find_active("Notification.RegistrationApproved", Channel::Email, "en")
            .await
            .unwrap();

        assert!(found.is_some());
        assert_eq!(found.unwrap().locale, "en");
    }

    #[tokio::test]
    async fn test_find_active_falls_back_to_other_locale() {
        let fallback = create_test_template("t1", "en");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<message_template::Model>::new(), vec![fallback]])
                .into_connection(),
        );

        let repo = MessageTemplateRepository::new(db);
        let found = repo
            .find_active("Notification.RegistrationApproved", Channel::Email, "fr")
            .await
            .unwrap();

        assert!(found.is_some());
    }
}
