//! Like repository.
//!
//! Same edge-set shape as the follow repository: membership changes
//! report whether a change occurred, with the composite primary key as
//! the single duplicate guard.

use std::sync::Arc;

use crate::entities::{Like, like};
use chirp_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check whether `user_id` has liked `message_id`.
    pub async fn has_liked(&self, user_id: i64, message_id: i64) -> AppResult<bool> {
        let found = Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::MessageId.eq(message_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(found.is_some())
    }

    /// Insert the edge if absent. Returns whether an edge was inserted.
    pub async fn insert_if_absent(&self, user_id: i64, message_id: i64) -> AppResult<bool> {
        let model = like::ActiveModel {
            user_id: Set(user_id),
            message_id: Set(message_id),
            created_at: Set(chrono::Utc::now().into()),
        };

        match model.insert(self.db.as_ref()).await {
            Ok(_) => Ok(true),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Ok(false),
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    Err(AppError::MessageNotFound(message_id))
                }
                _ => Err(AppError::Database(e.to_string())),
            },
        }
    }

    /// Remove the edge if present. Returns whether an edge was removed.
    pub async fn delete_if_present(&self, user_id: i64, message_id: i64) -> AppResult<bool> {
        let result = Like::delete_many()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::MessageId.eq(message_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Get likes by a user, newest first.
    pub async fn find_by_user(&self, user_id: i64, limit: u64) -> AppResult<Vec<like::Model>> {
        Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .order_by_desc(like::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count likes on a message.
    pub async fn count_by_message(&self, message_id: i64) -> AppResult<u64> {
        Like::find()
            .filter(like::Column::MessageId.eq(message_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_like(user_id: i64, message_id: i64) -> like::Model {
        like::Model {
            user_id,
            message_id,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_has_liked_true() {
        let like = create_test_like(1, 10);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like.clone()]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let result = repo.has_liked(1, 10).await.unwrap();

        assert!(result);
    }

    #[tokio::test]
    async fn test_has_liked_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<like::Model>::new()])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let result = repo.has_liked(1, 10).await.unwrap();

        assert!(!result);
    }

    #[tokio::test]
    async fn test_insert_if_absent_inserts() {
        let like = create_test_like(1, 10);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let changed = repo.insert_if_absent(1, 10).await.unwrap();

        assert!(changed);
    }

    #[tokio::test]
    async fn test_delete_if_present_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let changed = repo.delete_if_present(1, 10).await.unwrap();

        assert!(!changed);
    }

    #[tokio::test]
    async fn test_find_by_user() {
        let l1 = create_test_like(1, 10);
        let l2 = create_test_like(1, 11);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[l1, l2]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let result = repo.find_by_user(1, 10).await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
