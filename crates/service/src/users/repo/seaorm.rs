use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::users::domain::{AuthUser, Credentials};
use crate::users::errors::AuthError;
use crate::users::repository::UserRepository;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

fn to_auth_user(u: models::user::Model) -> AuthUser {
    AuthUser { id: u.id, username: u.username, created_at: u.created_at.into() }
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::find_by_username(&self.db, username).await?;
        Ok(res.map(to_auth_user))
    }

    async fn create_user(&self, username: &str, password_hash: String, password_algorithm: &str) -> Result<AuthUser, AuthError> {
        let txn = self.db.begin().await.map_err(|e| AuthError::Storage(e.to_string()))?;
        if models::user::find_by_username(&txn, username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }
        let created = models::user::create(&txn, username).await?;
        models::user_credentials::set_password(&txn, created.id, password_hash, password_algorithm).await?;
        txn.commit().await.map_err(|e| AuthError::Storage(e.to_string()))?;
        Ok(to_auth_user(created))
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = models::user_credentials::find_for_user(&self.db, user_id).await?;
        Ok(res.map(|c| Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::test_support::{get_db, unique_name};
    use crate::users::domain::{LoginInput, RegisterInput};
    use crate::users::service::{AuthConfig, UserService};

    #[tokio::test]
    async fn register_and_login_against_postgres() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = Arc::new(SeaOrmUserRepository { db: db.clone() });
        let svc = UserService::new(repo.clone(), AuthConfig::default());

        let username = unique_name("reader");
        let user = svc.register(RegisterInput { username: username.clone(), password: "S3curePass!".into() }).await?;
        assert!(matches!(
            svc.register(RegisterInput { username: username.clone(), password: "OtherPass1".into() }).await,
            Err(AuthError::UsernameTaken)
        ));

        let session = svc.login(LoginInput { username: username.clone(), password: "S3curePass!".into() }).await?;
        assert_eq!(session.user.id, user.id);
        assert!(matches!(
            svc.login(LoginInput { username: username.clone(), password: "nope-nope".into() }).await,
            Err(AuthError::WrongPassword)
        ));

        let creds = repo.get_credentials(user.id).await?.expect("credentials stored");
        assert!(creds.password_hash.starts_with("$argon2"));

        models::user::hard_delete(&db, user.id).await?;
        Ok(())
    }
}
