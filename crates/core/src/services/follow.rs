//! Follow service.

use std::collections::HashMap;

use chirp_common::{AppError, AppResult};
use chirp_db::{
    entities::user,
    repositories::{FollowRepository, UserRepository},
};

/// Follow service for business logic.
///
/// Follow state is a set of directed edges; adding and removing report
/// whether a change occurred instead of treating "already in that state"
/// as a failure.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    user_repo: UserRepository,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub const fn new(follow_repo: FollowRepository, user_repo: UserRepository) -> Self {
        Self {
            follow_repo,
            user_repo,
        }
    }

    /// Follow a user.
    ///
    /// Returns whether an edge was inserted; `false` means the actor was
    /// already following the target, which is benign.
    pub async fn follow(&self, actor_id: i64, target_id: i64) -> AppResult<bool> {
        if actor_id == target_id {
            return Err(AppError::SelfFollow);
        }

        // Resolve the target first so a missing user is reported as such
        // rather than as a constraint failure.
        self.user_repo.get_by_id(target_id).await?;

        self.follow_repo.insert_if_absent(actor_id, target_id).await
    }

    /// Unfollow a user.
    ///
    /// Returns whether an edge was removed; `false` means there was nothing
    /// to remove. Unfollowing yourself is a no-op.
    pub async fn unfollow(&self, actor_id: i64, target_id: i64) -> AppResult<bool> {
        if actor_id == target_id {
            return Ok(false);
        }

        self.follow_repo
            .delete_if_present(actor_id, target_id)
            .await
    }

    /// Check whether `actor` follows `target`.
    pub async fn is_following(&self, actor_id: i64, target_id: i64) -> AppResult<bool> {
        self.follow_repo.is_following(actor_id, target_id).await
    }

    /// Check whether `actor` is followed by `other`.
    pub async fn is_followed_by(&self, actor_id: i64, other_id: i64) -> AppResult<bool> {
        self.follow_repo.is_following(other_id, actor_id).await
    }

    /// Users following `user_id`, newest edge first.
    pub async fn followers(&self, user_id: i64, limit: u64) -> AppResult<Vec<user::Model>> {
        let edges = self.follow_repo.find_followers(user_id, limit).await?;
        let ids: Vec<i64> = edges.iter().map(|e| e.follower_id).collect();
        self.hydrate_in_order(&ids).await
    }

    /// Users that `user_id` follows, newest edge first.
    pub async fn following(&self, user_id: i64, limit: u64) -> AppResult<Vec<user::Model>> {
        let edges = self.follow_repo.find_following(user_id, limit).await?;
        let ids: Vec<i64> = edges.iter().map(|e| e.followed_id).collect();
        self.hydrate_in_order(&ids).await
    }

    /// Count followers of a user.
    pub async fn count_followers(&self, user_id: i64) -> AppResult<u64> {
        self.follow_repo.count_followers(user_id).await
    }

    /// Count users a user follows.
    pub async fn count_following(&self, user_id: i64) -> AppResult<u64> {
        self.follow_repo.count_following(user_id).await
    }

    /// Fetch users by id, preserving the given order.
    async fn hydrate_in_order(&self, ids: &[i64]) -> AppResult<Vec<user::Model>> {
        let mut by_id: HashMap<i64, user::Model> = self
            .user_repo
            .find_by_ids(ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chirp_db::entities::follow;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: i64, username: &str) -> user::Model {
        user::Model {
            id,
            email: format!("{username}@example.com"),
            username: username.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            image_url: user::DEFAULT_IMAGE_URL.to_string(),
            header_image_url: user::DEFAULT_HEADER_IMAGE_URL.to_string(),
            bio: String::new(),
            location: String::new(),
            created_at: Utc::now().into(),
        }
    }

    fn create_test_edge(follower_id: i64, followed_id: i64) -> follow::Model {
        follow::Model {
            followed_id,
            follower_id,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_follow_yourself_returns_error() {
        let db1 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let db2 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FollowService::new(FollowRepository::new(db1), UserRepository::new(db2));
        let result = service.follow(1, 1).await;

        match result {
            Err(AppError::SelfFollow) => {}
            _ => panic!("Expected SelfFollow error"),
        }
    }

    #[tokio::test]
    async fn test_follow_unknown_target_returns_error() {
        let db1 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let db2 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = FollowService::new(FollowRepository::new(db1), UserRepository::new(db2));
        let result = service.follow(1, 99).await;

        match result {
            Err(AppError::UserNotFound(id)) => assert_eq!(id, 99),
            _ => panic!("Expected UserNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_follow_inserts_edge() {
        let edge = create_test_edge(1, 2);
        let db1 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let db2 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user(2, "target")]])
                .into_connection(),
        );

        let service = FollowService::new(FollowRepository::new(db1), UserRepository::new(db2));
        let inserted = service.follow(1, 2).await.unwrap();

        assert!(inserted);
    }

    #[tokio::test]
    async fn test_unfollow_yourself_is_noop() {
        let db1 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let db2 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FollowService::new(FollowRepository::new(db1), UserRepository::new(db2));
        let removed = service.unfollow(1, 1).await.unwrap();

        assert!(!removed);
    }

    #[tokio::test]
    async fn test_unfollow_absent_edge_reports_no_change() {
        let db1 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let db2 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FollowService::new(FollowRepository::new(db1), UserRepository::new(db2));
        let removed = service.unfollow(1, 2).await.unwrap();

        assert!(!removed);
    }

    #[tokio::test]
    async fn test_is_followed_by() {
        let edge = create_test_edge(2, 1);
        let db1 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .into_connection(),
        );
        let db2 = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FollowService::new(FollowRepository::new(db1), UserRepository::new(db2));
        let result = service.is_followed_by(1, 2).await.unwrap();

        assert!(result);
    }

    #[tokio::test]
    async fn test_followers_preserves_edge_order() {
        // Edges newest first: follower 3, then follower 2
        let edges = vec![create_test_edge(3, 1), create_test_edge(2, 1)];
        let db1 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([edges])
                .into_connection(),
        );
        // User rows come back in id order
        let db2 = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    create_test_user(2, "earlier"),
                    create_test_user(3, "latest"),
                ]])
                .into_connection(),
        );

        let service = FollowService::new(FollowRepository::new(db1), UserRepository::new(db2));
        let followers = service.followers(1, 10).await.unwrap();

        let ids: Vec<i64> = followers.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }
}
