//! Database entities.

pub mod follow;
pub mod like;
pub mod message;
pub mod user;

pub use follow::Entity as Follow;
pub use like::Entity as Like;
pub use message::Entity as Message;
pub use user::Entity as User;
