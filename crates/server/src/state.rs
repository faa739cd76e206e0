use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::books::{repo::seaorm::SeaOrmBookRepository, repository::BookRepository, BookService};
use service::users::{repo::seaorm::SeaOrmUserRepository, repository::UserRepository, service::AuthConfig, UserService};

/// Shared handler state: the two services, wired to the same store.
#[derive(Clone)]
pub struct ServerState {
    pub books: Arc<BookService>,
    pub users: Arc<UserService>,
}

impl ServerState {
    pub fn new(books: Arc<dyn BookRepository>, users: Arc<dyn UserRepository>, auth: AuthConfig) -> Self {
        let users = Arc::new(UserService::new(users, auth));
        Self { books: Arc::new(BookService::new(books, Arc::clone(&users))), users }
    }

    /// State backed by sea-orm repositories sharing one pool.
    pub fn from_db(db: DatabaseConnection, auth: AuthConfig) -> Self {
        let books = Arc::new(SeaOrmBookRepository { db: db.clone() });
        let users = Arc::new(SeaOrmUserRepository { db });
        Self::new(books, users, auth)
    }
}
