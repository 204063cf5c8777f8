//! Account service.

use crate::services::password::{hash_password, verify_password};
use chirp_common::{AppError, AppResult};
use chirp_db::{entities::user, repositories::UserRepository};
use sea_orm::{ActiveValue::NotSet, Set};
use serde::Deserialize;
use validator::Validate;

/// Account service for business logic.
#[derive(Clone)]
pub struct AccountService {
    user_repo: UserRepository,
}

/// Input for creating a new account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountInput {
    #[validate(length(min = 1, max = 30))]
    pub username: String,

    #[validate(length(min = 6, max = 50), email)]
    pub email: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,

    #[validate(length(max = 255))]
    pub image_url: Option<String>,
}

/// Input for editing a profile.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    /// Current password, re-checked before any change is applied.
    pub password: String,

    #[validate(length(min = 1, max = 30))]
    pub username: Option<String>,

    #[validate(length(min = 6, max = 50), email)]
    pub email: Option<String>,

    #[validate(length(max = 255))]
    pub image_url: Option<String>,

    #[validate(length(max = 255))]
    pub header_image_url: Option<String>,

    pub bio: Option<String>,

    #[validate(length(max = 30))]
    pub location: Option<String>,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Create a new account.
    ///
    /// Uniqueness of username and email is decided by the insert itself; a
    /// concurrent signup with the same identity surfaces as
    /// [`AppError::DuplicateIdentity`], never as a second row.
    pub async fn signup(&self, input: CreateAccountInput) -> AppResult<user::Model> {
        input.validate()?;

        let password_hash = hash_password(&input.password)?;

        let image_url = match input.image_url {
            Some(url) if !url.is_empty() => url,
            _ => user::DEFAULT_IMAGE_URL.to_string(),
        };

        let model = user::ActiveModel {
            id: NotSet,
            email: Set(input.email),
            username: Set(input.username),
            password_hash: Set(password_hash),
            image_url: Set(image_url),
            header_image_url: Set(user::DEFAULT_HEADER_IMAGE_URL.to_string()),
            bio: Set(String::new()),
            location: Set(String::new()),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.user_repo.create(model).await
    }

    /// Authenticate by username and password.
    ///
    /// An unknown username and a wrong password both collapse to `Ok(None)`;
    /// neither is an error.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<Option<user::Model>> {
        let Some(user) = self.user_repo.find_by_username(username).await? else {
            return Ok(None);
        };

        if verify_password(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Get a user by ID.
    pub async fn get(&self, id: i64) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// List users, optionally filtered by a username substring.
    pub async fn list(
        &self,
        query: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user::Model>> {
        self.user_repo.list(query, limit, offset).await
    }

    /// Edit a profile.
    ///
    /// The submitted password is re-verified first; a wrong password leaves
    /// the profile untouched and returns [`AppError::Unauthorized`].
    pub async fn update_profile(
        &self,
        user_id: i64,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let mut active: user::ActiveModel = user.into();

        if let Some(username) = input.username {
            active.username = Set(username);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(image_url) = input.image_url {
            active.image_url = Set(image_url);
        }
        if let Some(header_image_url) = input.header_image_url {
            active.header_image_url = Set(header_image_url);
        }
        if let Some(bio) = input.bio {
            active.bio = Set(bio);
        }
        if let Some(location) = input.location {
            active.location = Set(location);
        }

        self.user_repo.update(active).await
    }

    /// Delete an account together with every message it owns.
    ///
    /// Follow and like edges go via cascade; the whole removal is one
    /// transaction.
    pub async fn delete_account(&self, user_id: i64) -> AppResult<()> {
        self.user_repo.delete_with_messages(user_id).await?;
        tracing::info!(user_id, "Deleted account and its messages");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: i64, username: &str, password_hash: &str) -> user::Model {
        user::Model {
            id,
            email: format!("{username}@example.com"),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            image_url: user::DEFAULT_IMAGE_URL.to_string(),
            header_image_url: user::DEFAULT_HEADER_IMAGE_URL.to_string(),
            bio: String::new(),
            location: String::new(),
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_signup_input_validation() {
        // Username too long
        let input = CreateAccountInput {
            username: "a".repeat(31),
            email: "user@example.com".to_string(),
            password: "password123".to_string(),
            image_url: None,
        };
        assert!(input.validate().is_err());

        // Malformed email
        let input = CreateAccountInput {
            username: "testuser".to_string(),
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
            image_url: None,
        };
        assert!(input.validate().is_err());

        // Password too short
        let input = CreateAccountInput {
            username: "testuser".to_string(),
            email: "user@example.com".to_string(),
            password: "short".to_string(),
            image_url: None,
        };
        assert!(input.validate().is_err());

        // Valid input
        let input = CreateAccountInput {
            username: "testuser".to_string(),
            email: "user@example.com".to_string(),
            password: "password123".to_string(),
            image_url: Some("https://example.com/me.png".to_string()),
        };
        assert!(input.validate().is_ok());
    }

    #[tokio::test]
    async fn test_signup_creates_user() {
        let user = create_test_user(1, "newuser", "$argon2id$stub");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .append_exec_results([sea_orm::MockExecResult {
                    last_insert_id: 1,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = AccountService::new(UserRepository::new(db));
        let input = CreateAccountInput {
            username: "newuser".to_string(),
            email: "newuser@example.com".to_string(),
            password: "password123".to_string(),
            image_url: None,
        };

        let result = service.signup(input).await.unwrap();
        assert_eq!(result.username, "newuser");
        assert_eq!(result.image_url, user::DEFAULT_IMAGE_URL);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_username() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = AccountService::new(UserRepository::new(db));
        let result = service.authenticate("nobody", "password123").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let hash = hash_password("password123").unwrap();
        let user = create_test_user(1, "testuser", &hash);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = AccountService::new(UserRepository::new(db));
        let result = service.authenticate("testuser", "wrong").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let hash = hash_password("password123").unwrap();
        let user = create_test_user(1, "testuser", &hash);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = AccountService::new(UserRepository::new(db));
        let result = service
            .authenticate("testuser", "password123")
            .await
            .unwrap();

        assert_eq!(result.unwrap().username, "testuser");
    }

    #[tokio::test]
    async fn test_update_profile_wrong_password() {
        let hash = hash_password("password123").unwrap();
        let user = create_test_user(1, "testuser", &hash);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = AccountService::new(UserRepository::new(db));
        let input = UpdateProfileInput {
            password: "wrong".to_string(),
            username: Some("renamed".to_string()),
            email: None,
            image_url: None,
            header_image_url: None,
            bio: None,
            location: None,
        };

        let result = service.update_profile(1, input).await;
        match result {
            Err(AppError::Unauthorized) => {}
            _ => panic!("Expected Unauthorized error"),
        }
    }
}
