//! Follow repository.
//!
//! The follow relation is kept as an explicit edge set: membership
//! changes are add-if-absent / remove-if-present operations reporting
//! whether a change occurred, and duplicate suppression lives in the
//! composite primary key rather than in callers.

use std::sync::Arc;

use crate::entities::{Follow, follow};
use chirp_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};

/// Follow repository for database operations.
#[derive(Clone)]
pub struct FollowRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the edge where `follower_id` follows `followed_id`.
    pub async fn find_edge(
        &self,
        follower_id: i64,
        followed_id: i64,
    ) -> AppResult<Option<follow::Model>> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FollowedId.eq(followed_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether `follower_id` follows `followed_id`.
    pub async fn is_following(&self, follower_id: i64, followed_id: i64) -> AppResult<bool> {
        Ok(self.find_edge(follower_id, followed_id).await?.is_some())
    }

    /// Insert the edge if absent. Returns whether an edge was inserted.
    ///
    /// A concurrent duplicate insert loses against the composite primary
    /// key and is reported as `false`, not an error. A missing endpoint
    /// user surfaces as [`AppError::UserNotFound`] via the foreign key.
    pub async fn insert_if_absent(&self, follower_id: i64, followed_id: i64) -> AppResult<bool> {
        let model = follow::ActiveModel {
            followed_id: Set(followed_id),
            follower_id: Set(follower_id),
            created_at: Set(chrono::Utc::now().into()),
        };

        match model.insert(self.db.as_ref()).await {
            Ok(_) => Ok(true),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Ok(false),
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    Err(AppError::UserNotFound(followed_id))
                }
                _ => Err(AppError::Database(e.to_string())),
            },
        }
    }

    /// Remove the edge if present. Returns whether an edge was removed.
    pub async fn delete_if_present(&self, follower_id: i64, followed_id: i64) -> AppResult<bool> {
        let result = Follow::delete_many()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FollowedId.eq(followed_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Get edges pointing at `user_id` (their followers), newest first.
    pub async fn find_followers(&self, user_id: i64, limit: u64) -> AppResult<Vec<follow::Model>> {
        Follow::find()
            .filter(follow::Column::FollowedId.eq(user_id))
            .order_by_desc(follow::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get edges starting at `user_id` (who they follow), newest first.
    pub async fn find_following(&self, user_id: i64, limit: u64) -> AppResult<Vec<follow::Model>> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .order_by_desc(follow::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the IDs of every user that `user_id` follows.
    ///
    /// Unbounded on purpose: feed assembly needs the full membership set.
    pub async fn find_following_ids(&self, user_id: i64) -> AppResult<Vec<i64>> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .select_only()
            .column(follow::Column::FollowedId)
            .into_tuple::<i64>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count followers of a user.
    pub async fn count_followers(&self, user_id: i64) -> AppResult<u64> {
        Follow::find()
            .filter(follow::Column::FollowedId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count how many users a user follows.
    pub async fn count_following(&self, user_id: i64) -> AppResult<u64> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
