//! Data access repositories.

pub mod follow;
pub mod like;
pub mod message;
pub mod user;

pub use follow::FollowRepository;
pub use like::LikeRepository;
pub use message::MessageRepository;
pub use user::UserRepository;
