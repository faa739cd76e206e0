use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{encode, Header as JwtHeader, EncodingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{info, debug, instrument};

use super::domain::{RegisterInput, LoginInput, AuthUser, AuthSession};
use super::errors::AuthError;
use super::repository::UserRepository;

pub const MIN_PASSWORD_LEN: usize = 8;

/// User directory configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub password_algorithm: String,
    pub token_ttl: chrono::Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: None, password_algorithm: "argon2".into(), token_ttl: chrono::Duration::hours(12) }
    }
}

/// Claims carried by login tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: String,
    pub iat: usize,
    pub exp: usize,
}

/// User directory business service independent of web framework
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    cfg: AuthConfig,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new user with a salted, hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::users::{service::{UserService, AuthConfig}, repository::mock::MockUserRepository};
    /// use service::users::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockUserRepository::default());
    /// let svc = UserService::new(repo, AuthConfig::default());
    /// let input = RegisterInput { username: "reader".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.username, "reader");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        models::user::validate_username(&input.username)?;
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidInput(format!("password too short (>={MIN_PASSWORD_LEN})")));
        }
        if self.repo.find_by_username(&input.username).await?.is_some() {
            debug!("username taken");
            return Err(AuthError::UsernameTaken);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .to_string();

        let user = self.repo.create_user(&input.username, hash, &self.cfg.password_algorithm).await?;
        info!(user_id = %user.id, username = %user.username, "user_registered");
        Ok(user)
    }

    /// Verify credentials and optionally issue a token.
    ///
    /// Unknown usernames are `UnknownUser`; a wrong password for a known username is `WrongPassword`.
    ///
    /// # Examples
    /// ```
    /// use service::users::{service::{UserService, AuthConfig}, repository::mock::MockUserRepository};
    /// use service::users::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockUserRepository::default());
    /// let cfg = AuthConfig { jwt_secret: Some("secret".into()), ..AuthConfig::default() };
    /// let svc = UserService::new(repo, cfg);
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { username: "u".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { username: "u".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.username, "u");
    /// assert!(session.token.is_some());
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_by_username(&input.username)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::WrongPassword)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::Hashing(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            info!(user_id = %user.id, "login_rejected");
            return Err(AuthError::WrongPassword);
        }

        let token = match &self.cfg.jwt_secret {
            Some(secret) => Some(self.issue_token(&user, secret)?),
            None => None,
        };
        info!(user_id = %user.id, token = token.is_some(), "user_logged_in");
        Ok(AuthSession { user, token })
    }

    /// Whether a user with this username exists.
    pub async fn exists(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self.repo.find_by_username(username).await?.is_some())
    }

    fn issue_token(&self, user: &AuthUser, secret: &str) -> Result<String, AuthError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user.username.clone(),
            uid: user.id.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + self.cfg.token_ttl).timestamp() as usize,
        };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .map_err(|e| AuthError::Token(e.to_string()))
    }
}
