use sea_orm::DatabaseConnection;

use crate::books::domain::{Book, BookRecord, BookSearch, NewBook, Review};
use crate::books::errors::CatalogError;
use crate::books::repository::BookRepository;

pub struct SeaOrmBookRepository {
    pub db: DatabaseConnection,
}

fn to_book(m: models::book::Model) -> Book {
    BookRecord::from(m).book
}

#[async_trait::async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn list(&self) -> Result<Vec<Book>, CatalogError> {
        let rows = models::book::list_all(&self.db).await?;
        Ok(rows.into_iter().map(to_book).collect())
    }

    async fn search(&self, query: &BookSearch) -> Result<Vec<Book>, CatalogError> {
        let rows = models::book::search(&self.db, query.isbn, query.author.as_deref(), query.title.as_deref()).await?;
        Ok(rows.into_iter().map(to_book).collect())
    }

    async fn get(&self, isbn: i64) -> Result<Option<BookRecord>, CatalogError> {
        let row = models::book::find_by_isbn(&self.db, isbn).await?;
        Ok(row.map(BookRecord::from))
    }

    async fn create(&self, input: &NewBook) -> Result<Book, CatalogError> {
        let created = models::book::create(&self.db, input.isbn, &input.author, &input.title)
            .await
            .map_err(|e| match e {
                models::errors::ModelError::Conflict(_) => CatalogError::Conflict(format!("isbn {} already exists", input.isbn)),
                other => other.into(),
            })?;
        Ok(to_book(created))
    }

    async fn save_reviews(&self, isbn: i64, expected_version: i32, reviews: Vec<Review>) -> Result<Option<BookRecord>, CatalogError> {
        let reviews = models::book::Reviews(reviews.into_iter().map(Into::into).collect());
        let saved = models::book::save_reviews(&self.db, isbn, expected_version, reviews).await?;
        Ok(saved.map(BookRecord::from))
    }
}
