//! User registration, access tokens, and point balances.

use arcana_types::error::{RepositoryError, UserError};
use arcana_types::user::{NewUser, User, validate_password};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::credentials::Credentials;
use super::repository::UserRepository;

pub struct UserService<U: UserRepository, K: Credentials> {
    repo: U,
    credentials: K,
}

impl<U: UserRepository, K: Credentials> UserService<U, K> {
    pub fn new(repo: U, credentials: K) -> Self {
        Self { repo, credentials }
    }

    /// Register a user from a creation request.
    ///
    /// App users start with zero points. Admins arrive with their password
    /// already hashed; use [`UserService::create_admin`] for plaintext.
    pub async fn register(&self, request: NewUser) -> Result<User, UserError> {
        let user = User::from_request(request, Utc::now().date_naive())?;
        let user = self.repo.create(&user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => UserError::PhoneConflict(user.phone.clone()),
            other => other.into(),
        })?;
        info!(user_id = %user.id, role = user.role.as_str(), "user registered");
        Ok(user)
    }

    pub async fn create_admin(
        &self,
        name: String,
        phone: String,
        email: String,
        password: &str,
    ) -> Result<User, UserError> {
        validate_password(password)?;
        let password_hash = self.credentials.hash_password(password)?;
        self.register(NewUser::Admin {
            name,
            phone,
            email,
            password_hash,
        })
        .await
    }

    pub async fn get(&self, id: Uuid) -> Result<User, UserError> {
        self.repo.get_by_id(&id).await?.ok_or(UserError::NotFound)
    }

    /// Active app users, the audience of the daily horoscope run.
    pub async fn active_app_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.repo.list_active_app_users().await?)
    }

    /// Issue a new bearer token for `user_id`.
    ///
    /// Only the hash is stored; the plaintext is returned exactly once.
    pub async fn issue_token(&self, user_id: Uuid) -> Result<String, UserError> {
        self.get(user_id).await?;
        let token = self.credentials.generate_token();
        let hash = self.credentials.hash_token(&token);
        self.repo.store_token(&user_id, &hash).await?;
        info!(user_id = %user_id, "access token issued");
        Ok(token)
    }

    /// Resolve a bearer token to its active user.
    pub async fn authenticate(&self, token: &str) -> Result<Option<User>, UserError> {
        let hash = self.credentials.hash_token(token);
        let user = self.repo.find_by_token_hash(&hash).await?;
        Ok(user.filter(|u| u.active))
    }

    /// Credit an app user's balance.
    pub async fn grant_points(&self, user_id: Uuid, amount: i64) -> Result<User, UserError> {
        if amount <= 0 {
            return Err(UserError::Invalid("amount must be positive".to_string()));
        }
        self.repo.add_points(&user_id, amount).await.map_err(|e| match e {
            RepositoryError::NotFound => UserError::NotFound,
            other => other.into(),
        })?;
        info!(user_id = %user_id, amount, "points granted");
        self.get(user_id).await
    }
}
