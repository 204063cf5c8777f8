//! Message repository.

use std::sync::Arc;

use crate::entities::{Message, message};
use chirp_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Message repository for database operations.
#[derive(Clone)]
pub struct MessageRepository {
    db: Arc<DatabaseConnection>,
}

impl MessageRepository {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a message by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<message::Model>> {
        Message::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a message by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i64) -> AppResult<message::Model> {
        self.find_by_id(id)
            .await?
            .ok_or(AppError::MessageNotFound(id))
    }

    /// Find messages by IDs.
    pub async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<message::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Message::find()
            .filter(message::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new message.
    pub async fn create(&self, model: message::ActiveModel) -> AppResult<message::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a message. Like edges referencing it go via cascade.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        Message::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get messages by author (paginated, newest first).
    pub async fn find_by_user(
        &self,
        user_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<message::Model>> {
        let mut query = Message::find()
            .filter(message::Column::UserId.eq(user_id))
            .order_by_desc(message::Column::CreatedAt)
            .order_by_desc(message::Column::Id)
            .limit(limit);

        if let Some(until) = until_id {
            query = query.filter(message::Column::Id.lt(until));
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the home feed (messages from followed users + own messages).
    ///
    /// Ordered by creation timestamp descending, message ID as tiebreak.
    ///
    /// # Arguments
    /// * `user_id` - The feed owner's ID
    /// * `following_ids` - IDs of the users the owner follows
    /// * `limit` - Maximum number of messages to return
    /// * `until_id` - Return messages older than this ID (for pagination)
    pub async fn find_home_feed(
        &self,
        user_id: i64,
        following_ids: &[i64],
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<message::Model>> {
        // Include own messages and messages from followed users
        let mut user_ids = following_ids.to_vec();
        user_ids.push(user_id);

        let mut query = Message::find()
            .filter(message::Column::UserId.is_in(user_ids))
            .order_by_desc(message::Column::CreatedAt)
            .order_by_desc(message::Column::Id)
            .limit(limit);

        if let Some(until) = until_id {
            query = query.filter(message::Column::Id.lt(until));
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count messages by author.
    pub async fn count_by_user(&self, user_id: i64) -> AppResult<u64> {
        Message::find()
            .filter(message::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
