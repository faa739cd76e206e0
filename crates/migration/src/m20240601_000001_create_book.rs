//! Create `book` table.
//!
//! Reviews are embedded as a JSONB array; `version` guards concurrent review writes.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Book::Table)
                    .if_not_exists()
                    .col(big_integer(Book::Isbn).primary_key())
                    .col(string_len(Book::Author, 255).not_null())
                    .col(string_len(Book::Title, 512).not_null())
                    .col(json_binary(Book::Reviews).not_null())
                    .col(integer(Book::Version).not_null().default(0))
                    .col(timestamp_with_time_zone(Book::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Book::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Book::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Book { Table, Isbn, Author, Title, Reviews, Version, CreatedAt, UpdatedAt }
