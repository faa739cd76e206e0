use thiserror::Error;

use models::errors::ModelError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("username already taken")]
    UsernameTaken,
    #[error("no such user")]
    UnknownUser,
    #[error("wrong password")]
    WrongPassword,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("token signing failed: {0}")]
    Token(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<ModelError> for AuthError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => AuthError::InvalidInput(msg),
            ModelError::Conflict(_) => AuthError::UsernameTaken,
            ModelError::Db(msg) => AuthError::Storage(msg),
        }
    }
}
