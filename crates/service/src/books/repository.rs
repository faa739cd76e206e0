use async_trait::async_trait;

use super::domain::{Book, BookRecord, BookSearch, NewBook, Review};
use super::errors::CatalogError;

/// Repository abstraction for book persistence.
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Book>, CatalogError>;
    async fn search(&self, query: &BookSearch) -> Result<Vec<Book>, CatalogError>;
    async fn get(&self, isbn: i64) -> Result<Option<BookRecord>, CatalogError>;
    /// `Conflict` when the isbn already exists.
    async fn create(&self, input: &NewBook) -> Result<Book, CatalogError>;
    /// Replace the review list when the stored version equals `expected_version`.
    /// `None` means the write was stale or the book is gone.
    async fn save_reviews(&self, isbn: i64, expected_version: i32, reviews: Vec<Review>) -> Result<Option<BookRecord>, CatalogError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockBookRepository {
        books: Mutex<BTreeMap<i64, BookRecord>>, // key: isbn
        stale_writes: AtomicUsize,
        saves: AtomicUsize,
    }

    impl MockBookRepository {
        pub fn with_books(books: impl IntoIterator<Item = Book>) -> Self {
            let repo = Self::default();
            {
                let mut map = repo.books.lock().unwrap();
                for book in books {
                    map.insert(book.isbn, BookRecord { book, version: 0 });
                }
            }
            repo
        }

        /// Make the next `n` saves behave as if another writer got there first.
        pub fn with_stale_writes(self, n: usize) -> Self {
            self.stale_writes.store(n, Ordering::SeqCst);
            self
        }

        /// Number of successful review saves.
        pub fn saves(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BookRepository for MockBookRepository {
        async fn list(&self) -> Result<Vec<Book>, CatalogError> {
            let books = self.books.lock().unwrap();
            Ok(books.values().map(|r| r.book.clone()).collect())
        }

        async fn search(&self, query: &BookSearch) -> Result<Vec<Book>, CatalogError> {
            let books = self.books.lock().unwrap();
            Ok(books.values().filter(|r| query.matches(&r.book)).map(|r| r.book.clone()).collect())
        }

        async fn get(&self, isbn: i64) -> Result<Option<BookRecord>, CatalogError> {
            let books = self.books.lock().unwrap();
            Ok(books.get(&isbn).cloned())
        }

        async fn create(&self, input: &NewBook) -> Result<Book, CatalogError> {
            let mut books = self.books.lock().unwrap();
            if books.contains_key(&input.isbn) {
                return Err(CatalogError::Conflict(format!("isbn {} already exists", input.isbn)));
            }
            let book = Book { isbn: input.isbn, author: input.author.clone(), title: input.title.clone(), reviews: vec![] };
            books.insert(book.isbn, BookRecord { book: book.clone(), version: 0 });
            Ok(book)
        }

        async fn save_reviews(&self, isbn: i64, expected_version: i32, reviews: Vec<Review>) -> Result<Option<BookRecord>, CatalogError> {
            let mut books = self.books.lock().unwrap();
            let Some(record) = books.get_mut(&isbn) else { return Ok(None) };
            let stale = self
                .stale_writes
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if stale {
                // someone else wrote in between
                record.version += 1;
                return Ok(None);
            }
            if record.version != expected_version {
                return Ok(None);
            }
            record.book.reviews = reviews;
            record.version += 1;
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(Some(record.clone()))
        }
    }
}
