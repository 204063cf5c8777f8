//! Message entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Upper bound on message text length, in characters.
pub const MAX_TEXT_LENGTH: usize = 140;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Author user ID
    #[sea_orm(indexed)]
    pub user_id: i64,

    /// Message text, at most [`MAX_TEXT_LENGTH`] characters
    pub text: String,

    /// Set at creation, immutable afterwards
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // No cascade: account deletion removes messages explicitly first
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(has_many = "super::like::Entity")]
    Likes,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
