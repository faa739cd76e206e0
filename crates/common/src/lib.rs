//! Shared plumbing for the bookshop workspace: logging setup and small wire types.

pub mod types;
pub mod utils;
