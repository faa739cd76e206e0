use std::sync::Arc;

use tracing::{info, warn, instrument};

use super::domain::{Book, BookSearch, NewBook, Review};
use super::errors::CatalogError;
use super::repository::BookRepository;
use crate::users::UserService;

/// Attempts for one review mutation before a concurrent writer is reported as `Conflict`.
pub const MAX_WRITE_ATTEMPTS: usize = 3;

/// Catalog business service independent of web framework
pub struct BookService {
    books: Arc<dyn BookRepository>,
    users: Arc<UserService>,
}

impl BookService {
    pub fn new(books: Arc<dyn BookRepository>, users: Arc<UserService>) -> Self {
        Self { books, users }
    }

    pub async fn list_books(&self) -> Result<Vec<Book>, CatalogError> {
        self.books.list().await
    }

    /// Books matching any supplied filter; nothing supplied yields nothing.
    #[instrument(skip(self))]
    pub async fn search_books(&self, query: &BookSearch) -> Result<Vec<Book>, CatalogError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.books.search(query).await
    }

    pub async fn get_book(&self, isbn: i64) -> Result<Book, CatalogError> {
        self.books
            .get(isbn)
            .await?
            .map(|r| r.book)
            .ok_or(CatalogError::BookNotFound(isbn))
    }

    #[instrument(skip(self, input), fields(isbn = input.isbn))]
    pub async fn create_book(&self, input: NewBook) -> Result<Book, CatalogError> {
        models::book::validate_isbn(input.isbn)?;
        models::book::validate_text_field("author", &input.author)?;
        models::book::validate_text_field("title", &input.title)?;
        let input = NewBook { author: input.author.trim().to_string(), title: input.title.trim().to_string(), ..input };
        let book = self.books.create(&input).await?;
        info!(isbn = book.isbn, "book_created");
        Ok(book)
    }

    pub async fn get_reviews(&self, isbn: i64) -> Result<Vec<Review>, CatalogError> {
        Ok(self.get_book(isbn).await?.reviews)
    }

    /// Append a review by an existing user. One review per user per book.
    ///
    /// Checks run book, user, text, duplicate; the first failure wins.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::books::{BookService, domain::Book, repository::mock::MockBookRepository};
    /// use service::users::{UserService, service::AuthConfig, domain::RegisterInput, repository::mock::MockUserRepository};
    /// let users = Arc::new(MockUserRepository::default());
    /// let books = Arc::new(MockBookRepository::with_books([Book { isbn: 7, author: "A".into(), title: "T".into(), reviews: vec![] }]));
    /// let directory = Arc::new(UserService::new(users, AuthConfig::default()));
    /// tokio_test::block_on(directory.register(RegisterInput { username: "ann".into(), password: "long-password".into() })).unwrap();
    /// let catalog = BookService::new(books, directory);
    /// let book = tokio_test::block_on(catalog.add_review(7, "ann", "Loved it")).unwrap();
    /// assert_eq!(book.reviews.len(), 1);
    /// ```
    #[instrument(skip(self, text))]
    pub async fn add_review(&self, isbn: i64, username: &str, text: &str) -> Result<Book, CatalogError> {
        self.get_book(isbn).await?;
        if !self.users.exists(username).await? {
            warn!(isbn, username, "review_rejected_unknown_user");
            return Err(CatalogError::UnknownUser(username.to_string()));
        }
        validate_review_text(text)?;
        let review = Review { username: username.to_string(), text: text.to_string() };
        let book = self
            .mutate_reviews(isbn, |reviews| {
                if reviews.iter().any(|r| r.username == review.username) {
                    return Err(CatalogError::Conflict(format!("{} already reviewed book {isbn}", review.username)));
                }
                reviews.push(review.clone());
                Ok(())
            })
            .await?;
        info!(isbn, username, count = book.reviews.len(), "review_added");
        Ok(book)
    }

    /// Replace the text of `username`'s review, keeping its position.
    #[instrument(skip(self, text))]
    pub async fn update_review(&self, isbn: i64, username: &str, text: &str) -> Result<Book, CatalogError> {
        let book = self
            .mutate_reviews(isbn, |reviews| {
                let review = reviews
                    .iter_mut()
                    .find(|r| r.username == username)
                    .ok_or_else(|| review_not_found(isbn, username))?;
                validate_review_text(text)?;
                review.text = text.to_string();
                Ok(())
            })
            .await?;
        info!(isbn, username, "review_updated");
        Ok(book)
    }

    /// Remove exactly the review written by `username`.
    #[instrument(skip(self))]
    pub async fn delete_review(&self, isbn: i64, username: &str) -> Result<Book, CatalogError> {
        let book = self
            .mutate_reviews(isbn, |reviews| {
                let idx = reviews
                    .iter()
                    .position(|r| r.username == username)
                    .ok_or_else(|| review_not_found(isbn, username))?;
                reviews.remove(idx);
                Ok(())
            })
            .await?;
        info!(isbn, username, count = book.reviews.len(), "review_deleted");
        Ok(book)
    }

    /// Read the book, apply `apply` to a copy of its reviews and save against the read version.
    /// A stale save re-reads and re-applies.
    async fn mutate_reviews<F>(&self, isbn: i64, apply: F) -> Result<Book, CatalogError>
    where
        F: Fn(&mut Vec<Review>) -> Result<(), CatalogError>,
    {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let record = self.books.get(isbn).await?.ok_or(CatalogError::BookNotFound(isbn))?;
            let mut reviews = record.book.reviews;
            apply(&mut reviews)?;
            if let Some(saved) = self.books.save_reviews(isbn, record.version, reviews).await? {
                return Ok(saved.book);
            }
            warn!(isbn, attempt, "stale_review_write");
        }
        Err(CatalogError::Conflict(format!("book {isbn} is being modified concurrently")))
    }
}

fn validate_review_text(text: &str) -> Result<(), CatalogError> {
    if text.trim().is_empty() {
        return Err(CatalogError::Validation("review text required".into()));
    }
    Ok(())
}

fn review_not_found(isbn: i64, username: &str) -> CatalogError {
    CatalogError::ReviewNotFound { isbn, username: username.to_string() }
}
