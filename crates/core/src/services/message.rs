//! Message service.

use std::collections::HashMap;

use chirp_common::{AppError, AppResult};
use chirp_db::{
    entities::message::{self, MAX_TEXT_LENGTH},
    repositories::{LikeRepository, MessageRepository},
};
use sea_orm::{ActiveValue::NotSet, Set};
use serde::Deserialize;

/// Message service for business logic.
#[derive(Clone)]
pub struct MessageService {
    message_repo: MessageRepository,
    like_repo: LikeRepository,
}

/// Input for posting a message.
#[derive(Debug, Deserialize)]
pub struct CreateMessageInput {
    pub text: String,
}

impl MessageService {
    /// Create a new message service.
    #[must_use]
    pub const fn new(message_repo: MessageRepository, like_repo: LikeRepository) -> Self {
        Self {
            message_repo,
            like_repo,
        }
    }

    /// Post a message.
    ///
    /// The length bound is asserted here even though the boundary validates
    /// first; nothing over 140 characters reaches storage through any path.
    pub async fn post(&self, author_id: i64, input: CreateMessageInput) -> AppResult<message::Model> {
        let length = input.text.chars().count();
        if length == 0 || length > MAX_TEXT_LENGTH {
            return Err(AppError::InvalidText(format!(
                "Text must be between 1 and {MAX_TEXT_LENGTH} characters"
            )));
        }

        let model = message::ActiveModel {
            id: NotSet,
            user_id: Set(author_id),
            text: Set(input.text),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.message_repo.create(model).await
    }

    /// Get a message by ID.
    pub async fn get(&self, id: i64) -> AppResult<message::Model> {
        self.message_repo.get_by_id(id).await
    }

    /// Messages posted by a user, newest first.
    pub async fn messages_of(
        &self,
        user_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<message::Model>> {
        self.message_repo.find_by_user(user_id, limit, until_id).await
    }

    /// Delete a message.
    ///
    /// Only the author may delete; anyone else gets `Forbidden` and the
    /// message stays. Like edges on the message go via cascade.
    pub async fn delete(&self, actor_id: i64, message_id: i64) -> AppResult<()> {
        let message = self.message_repo.get_by_id(message_id).await?;

        if message.user_id != actor_id {
            return Err(AppError::Forbidden(
                "Cannot delete another user's message".to_string(),
            ));
        }

        self.message_repo.delete(message_id).await
    }

    /// Toggle a like on a message, returning the new liked state.
    ///
    /// Liking your own message is rejected with `SelfLike`. Otherwise the
    /// like edge is added if absent or removed if present.
    pub async fn toggle_like(&self, actor_id: i64, message_id: i64) -> AppResult<bool> {
        let message = self.message_repo.get_by_id(message_id).await?;

        if message.user_id == actor_id {
            return Err(AppError::SelfLike);
        }

        if self.like_repo.has_liked(actor_id, message_id).await? {
            self.like_repo
                .delete_if_present(actor_id, message_id)
                .await?;
            Ok(false)
        } else {
            self.like_repo
                .insert_if_absent(actor_id, message_id)
                .await?;
            Ok(true)
        }
    }

    /// Check whether a user has liked a message.
    pub async fn has_liked(&self, user_id: i64, message_id: i64) -> AppResult<bool> {
        self.like_repo.has_liked(user_id, message_id).await
    }

    /// Messages a user has liked, newest like first.
    pub async fn likes_of(&self, user_id: i64, limit: u64) -> AppResult<Vec<message::Model>> {
        let likes = self.like_repo.find_by_user(user_id, limit).await?;
        let ids: Vec<i64> = likes.iter().map(|l| l.message_id).collect();

        let mut by_id: HashMap<i64, message::Model> = self
            .message_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Count likes on a message.
    pub async fn like_count(&self, message_id: i64) -> AppResult<u64> {
        self.like_repo.count_by_message(message_id).await
    }

    /// Count messages posted by a user.
    pub async fn message_count(&self, user_id: i64) -> AppResult<u64> {
        self.message_repo.count_by_user(user_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chirp_db::entities::like;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_message(id: i64, user_id: i64, text: &str) -> message::Model {
        message::Model {
            id,
            user_id,
            text: text.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn create_test_like(user_id: i64, message_id: i64) -> like::Model {
        like::Model {
            user_id,
            message_id,
            created_at: Utc::now().into(),
        }
    }

    fn empty_db() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    #[tokio::test]
    async fn test_post_empty_text_rejected() {
        let service = MessageService::new(
            MessageRepository::new(empty_db()),
            LikeRepository::new(empty_db()),
        );

        let input = CreateMessageInput {
            text: String::new(),
        };
        let result = service.post(1, input).await;

        match result {
            Err(AppError::InvalidText(_)) => {}
            _ => panic!("Expected InvalidText error"),
        }
    }

    #[tokio::test]
    async fn test_post_over_limit_rejected() {
        let service = MessageService::new(
            MessageRepository::new(empty_db()),
            LikeRepository::new(empty_db()),
        );

        let input = CreateMessageInput {
            text: "a".repeat(141),
        };
        let result = service.post(1, input).await;

        match result {
            Err(AppError::InvalidText(_)) => {}
            _ => panic!("Expected InvalidText error"),
        }
    }

    #[tokio::test]
    async fn test_post_at_limit_succeeds() {
        let text = "a".repeat(140);
        let created = create_test_message(1, 1, &text);

        let message_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 1,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = MessageService::new(
            MessageRepository::new(message_db),
            LikeRepository::new(empty_db()),
        );

        let result = service.post(1, CreateMessageInput { text }).await.unwrap();
        assert_eq!(result.text.chars().count(), 140);
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let message = create_test_message(5, 2, "not yours");
        let message_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[message]])
                .into_connection(),
        );

        let service = MessageService::new(
            MessageRepository::new(message_db),
            LikeRepository::new(empty_db()),
        );

        let result = service.delete(1, 5).await;
        match result {
            Err(AppError::Forbidden(_)) => {}
            _ => panic!("Expected Forbidden error"),
        }
    }

    #[tokio::test]
    async fn test_delete_own_message() {
        let message = create_test_message(5, 1, "mine");
        let message_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[message]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = MessageService::new(
            MessageRepository::new(message_db),
            LikeRepository::new(empty_db()),
        );

        assert!(service.delete(1, 5).await.is_ok());
    }

    #[tokio::test]
    async fn test_toggle_like_own_message_rejected() {
        let message = create_test_message(5, 1, "mine");
        let message_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[message]])
                .into_connection(),
        );

        let service = MessageService::new(
            MessageRepository::new(message_db),
            LikeRepository::new(empty_db()),
        );

        let result = service.toggle_like(1, 5).await;
        match result {
            Err(AppError::SelfLike) => {}
            _ => panic!("Expected SelfLike error"),
        }
    }

    #[tokio::test]
    async fn test_toggle_like_adds_when_absent() {
        let message = create_test_message(5, 2, "theirs");
        let message_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[message]])
                .into_connection(),
        );
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<like::Model>::new()])
                .append_query_results([[create_test_like(1, 5)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = MessageService::new(
            MessageRepository::new(message_db),
            LikeRepository::new(like_db),
        );

        let liked = service.toggle_like(1, 5).await.unwrap();
        assert!(liked);
    }

    #[tokio::test]
    async fn test_toggle_like_removes_when_present() {
        let message = create_test_message(5, 2, "theirs");
        let message_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[message]])
                .into_connection(),
        );
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_like(1, 5)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = MessageService::new(
            MessageRepository::new(message_db),
            LikeRepository::new(like_db),
        );

        let liked = service.toggle_like(1, 5).await.unwrap();
        assert!(!liked);
    }

    #[tokio::test]
    async fn test_likes_of_preserves_like_order() {
        // Likes newest first: message 9 liked after message 5
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![create_test_like(1, 9), create_test_like(1, 5)]])
                .into_connection(),
        );
        // Message rows come back in id order
        let message_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    create_test_message(5, 2, "older"),
                    create_test_message(9, 3, "newer"),
                ]])
                .into_connection(),
        );

        let service = MessageService::new(
            MessageRepository::new(message_db),
            LikeRepository::new(like_db),
        );

        let messages = service.likes_of(1, 10).await.unwrap();
        let ids: Vec<i64> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![9, 5]);
    }
}
