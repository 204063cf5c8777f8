//! Feed service.

use chirp_common::AppResult;
use chirp_db::{
    entities::message,
    repositories::{FollowRepository, MessageRepository},
};

/// Upper bound on a single home feed page.
pub const MAX_HOME_FEED: u64 = 100;

/// Feed service for business logic.
#[derive(Clone)]
pub struct FeedService {
    message_repo: MessageRepository,
    follow_repo: FollowRepository,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub const fn new(message_repo: MessageRepository, follow_repo: FollowRepository) -> Self {
        Self {
            message_repo,
            follow_repo,
        }
    }

    /// Home feed for a principal: their own messages plus messages from
    /// every user they follow, newest first.
    ///
    /// The page size is capped at [`MAX_HOME_FEED`] regardless of the
    /// requested limit. Anonymous requests never reach this method; the
    /// boundary answers them with an empty list.
    pub async fn home_feed(
        &self,
        principal_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<message::Model>> {
        let limit = limit.min(MAX_HOME_FEED);

        let following = self.follow_repo.find_following_ids(principal_id).await?;

        self.message_repo
            .find_home_feed(principal_id, &following, limit, until_id)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn create_test_message(id: i64, user_id: i64, text: &str) -> message::Model {
        message::Model {
            id,
            user_id,
            text: text.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_home_feed_returns_followed_messages() {
        let follow_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    btreemap! { "followed_id" => Value::BigInt(Some(2)) },
                ]])
                .into_connection(),
        );
        let message_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    create_test_message(10, 2, "from followed"),
                    create_test_message(9, 1, "from self"),
                ]])
                .into_connection(),
        );

        let service = FeedService::new(
            MessageRepository::new(message_db),
            FollowRepository::new(follow_db),
        );

        let feed = service.home_feed(1, 50, None).await.unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].id, 10);
    }

    #[tokio::test]
    async fn test_home_feed_with_no_follows_still_has_own_messages() {
        let follow_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
                .into_connection(),
        );
        let message_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![create_test_message(3, 1, "own post")]])
                .into_connection(),
        );

        let service = FeedService::new(
            MessageRepository::new(message_db),
            FollowRepository::new(follow_db),
        );

        let feed = service.home_feed(1, 50, None).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].user_id, 1);
    }
}
