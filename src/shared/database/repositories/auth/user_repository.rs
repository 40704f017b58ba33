use sqlx::{postgres::PgRow, PgPool, Row};
use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;
use crate::domains::auth::models::user::{ProfileUpdateRequest, User, UserCreate};

/// Postgres unique_violation SQLSTATE
const UNIQUE_VIOLATION: &str = "23505";

/// 사용자명/이메일 UNIQUE 제약 위반
/// Another user already holds `field` (username or email)
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("duplicate {field}")]
pub struct DuplicateUser {
    pub field: &'static str,
}

/// 사용자 저장소
/// User persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, data: UserCreate) -> Result<User>;

    async fn get_user_by_id(&self, id: u64) -> Result<Option<User>>;

    // 사용자명으로 조회 (로그인용)
    // Get user by username (for login)
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// 프로필 부분 수정, 사용자가 없으면 None
    /// Apply a partial update, `None` when the user is gone
    async fn update_profile(&self, id: u64, update: &ProfileUpdateRequest) -> Result<Option<User>>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str =
    "id, username, email, password_hash, first_name, last_name, created_at, updated_at";

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get::<i64, _>("id") as u64,
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, data: UserCreate) -> Result<User> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, first_name, last_name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "Failed to create user"))?;

        Ok(user_from_row(&row))
    }

    async fn get_user_by_id(&self, id: u64) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id as i64) // DB에는 i64로 저장
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by id")?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by username")?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by email")?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn update_profile(&self, id: u64, update: &ProfileUpdateRequest) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id as i64)
        .bind(update.first_name.as_deref())
        .bind(update.last_name.as_deref())
        .bind(update.email.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "Failed to update user profile"))?;

        Ok(row.as_ref().map(user_from_row))
    }
}

/// 동시 가입 등으로 UNIQUE 제약에 걸리면 DuplicateUser로 변환
fn unique_violation(err: sqlx::Error, context: &'static str) -> anyhow::Error {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            if let Some(field) = duplicate_field(db.message()) {
                return DuplicateUser { field }.into();
            }
        }
    }
    anyhow::Error::new(err).context(context)
}

/// 제약 이름(users_<column>_key)에서 컬럼 추출
fn duplicate_field(message: &str) -> Option<&'static str> {
    if message.contains("users_username_key") {
        Some("username")
    } else if message.contains("users_email_key") {
        Some("email")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_the_violated_column() {
        assert_eq!(
            duplicate_field(r#"duplicate key value violates unique constraint "users_username_key""#),
            Some("username")
        );
        assert_eq!(
            duplicate_field(r#"duplicate key value violates unique constraint "users_email_key""#),
            Some("email")
        );
        assert_eq!(duplicate_field(r#"unique constraint "refresh_tokens_token_hash_key""#), None);
    }

    #[test]
    fn other_errors_keep_context() {
        let err = unique_violation(sqlx::Error::RowNotFound, "Failed to create user");

        assert!(err.downcast_ref::<DuplicateUser>().is_none());
        assert_eq!(err.to_string(), "Failed to create user");
    }
}
