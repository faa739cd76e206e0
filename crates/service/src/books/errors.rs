use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("book {0} not found")]
    BookNotFound(i64),
    #[error("review by {username} not found on book {isbn}")]
    ReviewNotFound { isbn: i64, username: String },
    #[error("user {0} not found")]
    UnknownUser(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl From<models::errors::ModelError> for CatalogError {
    fn from(e: models::errors::ModelError) -> Self {
        use models::errors::ModelError;
        match e {
            ModelError::Validation(msg) => CatalogError::Validation(msg),
            ModelError::Conflict(msg) => CatalogError::Conflict(msg),
            ModelError::Db(msg) => CatalogError::Repository(msg),
        }
    }
}

impl From<crate::users::errors::AuthError> for CatalogError {
    fn from(e: crate::users::errors::AuthError) -> Self {
        CatalogError::Repository(e.to_string())
    }
}
