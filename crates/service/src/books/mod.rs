//! Book catalog: books with an embedded, ordered review list.
//!
//! Reviews are keyed by username inside a book. Mutations are read-modify-write on the
//! whole list, guarded by the book's version counter.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::BookService;
