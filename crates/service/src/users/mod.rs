//! User directory: three-layer architecture (domain, repository, service).
//!
//! Registration hashes passwords with Argon2; login verifies them and can issue a JWT.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::UserService;
