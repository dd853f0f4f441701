//! User repository.
//!
//! Serves the role/user lookup contract consumed by the action hint
//! engine and the notification dispatcher.

use std::sync::Arc;

use crate::entities::{User, user, user::Role};
use licreg_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Resolve a user's workflow role.
    pub async fn resolve_role(&self, id: &str) -> AppResult<Option<Role>> {
        Ok(self.find_by_id(id).await?.map(|u| u.role))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Activate a user on the given connection (transactional).
    pub async fn activate_in<C: ConnectionTrait>(&self, conn: &C, id: &str) -> AppResult<u64> {
        let result = User::update_many()
            .col_expr(user::Column::IsActive, true.into())
            .filter(user::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_user(id: &str, role: Role) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("user-{id}"),
            email: Some(format!("{id}@example.org")),
            phone: None,
            role,
            is_active: false,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_resolve_role() {
        let user = create_test_user("u1", Role::Checker);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let role = repo.resolve_role("u1").await.unwrap();

        assert_eq!(role, Some(Role::Checker));
    }

    #[tokio::test]
    async fn test_resolve_role_unknown_user() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let role = repo.resolve_role("nobody").await.unwrap();

        assert!(role.is_none());
    }
}
