//! UserRepository trait definition.

use arcana_types::error::RepositoryError;
use arcana_types::user::User;
use uuid::Uuid;

/// Repository trait for user persistence.
///
/// Implementations live in arcana-infra (e.g., `SqliteUserRepository`).
pub trait UserRepository: Send + Sync {
    /// Create a user. A duplicate phone yields `RepositoryError::Conflict`.
    fn create(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Every active app user, oldest first.
    fn list_active_app_users(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<User>, RepositoryError>> + Send;

    /// Atomically subtract `amount` points from an app user, only if the
    /// balance covers it. Returns whether the deduction happened.
    fn deduct_points(
        &self,
        id: &Uuid,
        amount: i64,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Add `amount` points to an app user.
    fn add_points(
        &self,
        id: &Uuid,
        amount: i64,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Remember the hash of a freshly issued access token.
    fn store_token(
        &self,
        user_id: &Uuid,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// The user owning an access token, if the hash is known.
    fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;
}
