//! Institution repository.

use std::sync::Arc;

use crate::entities::{Institution, institution};
use licreg_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

/// Institution repository for database operations.
#[derive(Clone)]
pub struct InstitutionRepository {
    db: Arc<DatabaseConnection>,
}

impl InstitutionRepository {
    /// Create a new institution repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an institution by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<institution::Model>> {
        Institution::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new institution.
    pub async fn create(&self, model: institution::ActiveModel) -> AppResult<institution::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Activate an institution on the given connection (transactional).
    pub async fn activate_in<C: ConnectionTrait>(&self, conn: &C, id: &str) -> AppResult<u64> {
        let result = Institution::update_many()
            .col_expr(institution::Column::IsActive, true.into())
            .filter(institution::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
