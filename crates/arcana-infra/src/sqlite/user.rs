//! SQLite user repository implementation.
//!
//! App and admin users share the `users` table; the `role` column selects
//! which of the role-specific columns are populated.

use arcana_core::user::repository::UserRepository;
use arcana_types::error::RepositoryError;
use arcana_types::user::{AdminUserProfile, AppUserProfile, User, UserRole};
use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, map_write_error, parse_date, parse_datetime, parse_uuid};

pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct UserRow {
    id: String,
    name: String,
    phone: String,
    active: bool,
    role: String,
    birth_date: Option<String>,
    gender: Option<String>,
    auth_type: Option<String>,
    avatar: Option<String>,
    points: i64,
    email: Option<String>,
    password_hash: Option<String>,
    created_at: String,
    updated_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            active: row.try_get("active")?,
            role: row.try_get("role")?,
            birth_date: row.try_get("birth_date")?,
            gender: row.try_get("gender")?,
            auth_type: row.try_get("auth_type")?,
            avatar: row.try_get("avatar")?,
            points: row.try_get("points")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        let missing = |column: &str| RepositoryError::Query(format!("{column} is NULL for role {}", self.role));

        let role = match self.role.as_str() {
            "user" => UserRole::App(AppUserProfile {
                birth_date: parse_date(self.birth_date.as_deref().ok_or_else(|| missing("birth_date"))?)?,
                gender: self
                    .gender
                    .as_deref()
                    .ok_or_else(|| missing("gender"))?
                    .parse()
                    .map_err(RepositoryError::Query)?,
                auth_type: self
                    .auth_type
                    .as_deref()
                    .ok_or_else(|| missing("auth_type"))?
                    .parse()
                    .map_err(RepositoryError::Query)?,
                avatar: self.avatar.clone(),
                points: self.points,
            }),
            "admin" => UserRole::Admin(AdminUserProfile {
                email: self.email.clone().ok_or_else(|| missing("email"))?,
                password_hash: self.password_hash.clone().unwrap_or_default(),
            }),
            other => return Err(RepositoryError::Query(format!("invalid role: '{other}'"))),
        };

        Ok(User {
            id: parse_uuid(&self.id, "user id")?,
            name: self.name,
            phone: self.phone,
            active: self.active,
            role,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn rows_to_user(row: Option<sqlx::sqlite::SqliteRow>) -> Result<Option<User>, RepositoryError> {
    match row {
        Some(row) => {
            let user_row =
                UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            Ok(Some(user_row.into_user()?))
        }
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// UserRepository implementation
// ---------------------------------------------------------------------------

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        let (app, admin) = match &user.role {
            UserRole::App(profile) => (Some(profile), None),
            UserRole::Admin(profile) => (None, Some(profile)),
        };

        sqlx::query(
            r#"INSERT INTO users (id, name, phone, active, role, birth_date, gender, auth_type, avatar, points, email, password_hash, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.phone)
        .bind(user.active)
        .bind(user.role.as_str())
        .bind(app.map(|p| p.birth_date.format("%Y-%m-%d").to_string()))
        .bind(app.map(|p| p.gender.to_string()))
        .bind(app.map(|p| p.auth_type.to_string()))
        .bind(app.and_then(|p| p.avatar.clone()))
        .bind(app.map(|p| p.points).unwrap_or(0))
        .bind(admin.map(|p| p.email.clone()))
        .bind(admin.map(|p| p.password_hash.clone()))
        .bind(format_datetime(&user.created_at))
        .bind(format_datetime(&user.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| map_write_error(e, &user.phone))?;

        Ok(user.clone())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_to_user(row)
    }

    async fn list_active_app_users(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM users WHERE role = 'user' AND active = 1 ORDER BY created_at ASC, rowid ASC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(user) = rows_to_user(Some(row))? {
                users.push(user);
            }
        }
        Ok(users)
    }

    async fn deduct_points(&self, id: &Uuid, amount: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE users SET points = points - ?, updated_at = ?
               WHERE id = ? AND role = 'user' AND points >= ?"#,
        )
        .bind(amount)
        .bind(format_datetime(&Utc::now()))
        .bind(id.to_string())
        .bind(amount)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }

    async fn add_points(&self, id: &Uuid, amount: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET points = points + ?, updated_at = ? WHERE id = ? AND role = 'user'",
        )
        .bind(amount)
        .bind(format_datetime(&Utc::now()))
        .bind(id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn store_token(&self, user_id: &Uuid, token_hash: &str) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO api_tokens (token_hash, user_id, created_at) VALUES (?, ?, ?)")
            .bind(token_hash)
            .bind(user_id.to_string())
            .bind(format_datetime(&Utc::now()))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| map_write_error(e, "token"))?;
        Ok(())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT u.* FROM users u
               JOIN api_tokens t ON t.user_id = u.id
               WHERE t.token_hash = ?"#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_to_user(row)
    }
}
