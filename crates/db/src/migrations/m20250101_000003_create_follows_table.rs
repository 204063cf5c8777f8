//! Create follows table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Follows::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Follows::FollowedId).big_integer().not_null())
                    .col(ColumnDef::new(Follows::FollowerId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Follows::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // Composite primary key: at most one edge per ordered pair
                    .primary_key(
                        Index::create()
                            .col(Follows::FollowedId)
                            .col(Follows::FollowerId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follows_followed")
                            .from(Follows::Table, Follows::FollowedId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follows_follower")
                            .from(Follows::Table, Follows::FollowerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: follower_id (for "who does X follow" lookups; the primary
        // key already covers lookups by followed_id)
        manager
            .create_index(
                Index::create()
                    .name("idx_follows_follower_id")
                    .table(Follows::Table)
                    .col(Follows::FollowerId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (edge listing order)
        manager
            .create_index(
                Index::create()
                    .name("idx_follows_created_at")
                    .table(Follows::Table)
                    .col(Follows::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Follows::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Follows {
    Table,
    FollowedId,
    FollowerId,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
