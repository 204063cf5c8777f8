//! Business logic services.

#![allow(missing_docs)]

pub mod account;
pub mod feed;
pub mod follow;
pub mod message;
pub mod password;

pub use account::{AccountService, CreateAccountInput, UpdateProfileInput};
pub use feed::{FeedService, MAX_HOME_FEED};
pub use follow::FollowService;
pub use message::{CreateMessageInput, MessageService};
pub use password::{hash_password, verify_password};
