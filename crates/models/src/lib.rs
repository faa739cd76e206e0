//! sea-orm entities and small persistence helpers for the bookshop store.

pub mod errors;
pub mod db;
pub mod book;
pub mod user;
pub mod user_credentials;

#[cfg(test)]
mod tests;
