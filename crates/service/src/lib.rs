//! Service layer providing the bookshop's business operations on top of models.
//! - `books`: catalog and embedded reviews.
//! - `users`: registration and credential checks.
//!
//! Each area separates domain types, a repository trait (sea-orm and in-memory
//! implementations) and a framework-independent service.

pub mod books;
pub mod users;
#[cfg(test)]
pub mod test_support;
