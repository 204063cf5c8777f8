//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Avatar used when signup provides no image URL.
pub const DEFAULT_IMAGE_URL: &str =
    "https://icon-library.com/images/default-user-icon/default-user-icon-28.jpg";

/// Profile header used when signup provides none.
pub const DEFAULT_HEADER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1519751138087-5bf79df62d5b?ixlib=rb-4.0.3&ixid=MnwxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8&auto=format&fit=crop&w=2070&q=80";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub email: String,

    #[sea_orm(unique)]
    pub username: String,

    /// Argon2 PHC string, never the plaintext password
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Avatar URL
    pub image_url: String,

    /// Profile header URL
    pub header_image_url: String,

    /// Profile description
    #[sea_orm(column_type = "Text")]
    pub bio: String,

    pub location: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::message::Entity")]
    Messages,

    #[sea_orm(has_many = "super::like::Entity")]
    Likes,
}

impl Related<super::message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl Related<super::like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
