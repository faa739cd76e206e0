use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Search filters on author and title
        manager
            .create_index(
                Index::create()
                    .name("idx_book_author")
                    .table(Book::Table)
                    .col(Book::Author)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_book_title")
                    .table(Book::Table)
                    .col(Book::Title)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_book_author").table(Book::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_book_title").table(Book::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Book { Table, Author, Title }
