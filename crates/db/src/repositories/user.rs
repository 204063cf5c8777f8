//! User repository.

use std::sync::Arc;

use crate::entities::{Message, User, message, user};
use chirp_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};

/// Maps insert/update failures, turning identity-uniqueness violations
/// into their typed error instead of a raw storage error.
fn map_identity_err(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateIdentity,
        _ => AppError::Database(e.to_string()),
    }
}

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
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i64) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound(id))
    }

    /// Find users by IDs.
    pub async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<user::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        User::find()
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by exact username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    ///
    /// A duplicate username or email surfaces as
    /// [`AppError::DuplicateIdentity`], detected from the uniqueness
    /// constraint at insert time rather than a racy pre-check.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_identity_err)
    }

    /// Update a user.
    ///
    /// Username/email collisions surface as [`AppError::DuplicateIdentity`],
    /// same as on create.
    pub async fn update(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model.update(self.db.as_ref()).await.map_err(map_identity_err)
    }

    /// List users (paginated, newest first), optionally filtered by a
    /// username substring.
    pub async fn list(
        &self,
        query: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user::Model>> {
        let mut find = User::find();

        if let Some(q) = query {
            let pattern = format!("%{}%", q.replace('%', "\\%").replace('_', "\\_"));
            find = find.filter(user::Column::Username.like(&pattern));
        }

        find.order_by_desc(user::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all users.
    pub async fn count(&self) -> AppResult<u64> {
        User::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a user together with all messages they own, in one
    /// transaction.
    ///
    /// The messages foreign key carries no cascade, so the rows are removed
    /// explicitly before the user row. Follow and like edges referencing
    /// the user (and the deleted messages) go via their cascades. Either
    /// the whole deletion is applied or none of it.
    pub async fn delete_with_messages(&self, user_id: i64) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Message::delete_many()
            .filter(message::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let result = User::delete_by_id(user_id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            // Dropping the transaction rolls it back
            return Err(AppError::UserNotFound(user_id));
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
