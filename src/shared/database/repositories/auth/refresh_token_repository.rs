use sqlx::{postgres::PgRow, PgPool, Row};
use anyhow::{Context, Result};
use async_trait::async_trait;
use crate::domains::auth::models::refresh_token::{RefreshToken, RefreshTokenCreate};

/// Refresh Token 저장소 (원본 토큰이 아닌 해시만 저장)
/// Refresh token persistence; only hashes are stored
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn create(&self, data: RefreshTokenCreate) -> Result<RefreshToken>;

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>>;

    /// Refresh Token 무효화
    /// Revoke a single refresh token
    async fn revoke(&self, token_hash: &str) -> Result<()>;

    /// 만료된 토큰 삭제 (정리 작업), 삭제된 개수 반환
    /// Delete expired tokens, returns how many were removed
    async fn delete_expired(&self) -> Result<u64>;
}

pub struct PgRefreshTokenRepository {
    pool: PgPool,
}

impl PgRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn token_from_row(row: &PgRow) -> RefreshToken {
    RefreshToken {
        id: row.get("id"),
        user_id: row.get::<i64, _>("user_id") as u64,
        token_hash: row.get("token_hash"),
        expires_at: row.get("expires_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        revoked: row.get("revoked"),
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    async fn create(&self, data: RefreshTokenCreate) -> Result<RefreshToken> {
        let row = sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, expires_at, revoked, created_at, updated_at)
            VALUES ($1, $2, $3, FALSE, NOW(), NOW())
            RETURNING id, user_id, token_hash, expires_at, created_at, updated_at, revoked
            "#,
        )
        .bind(data.user_id as i64) // u64 -> i64 변환 (DB는 BIGINT)
        .bind(&data.token_hash)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create refresh token")?;

        Ok(token_from_row(&row))
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, token_hash, expires_at, created_at, updated_at, revoked
            FROM refresh_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find refresh token")?;

        Ok(row.as_ref().map(token_from_row))
    }

    async fn revoke(&self, token_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = TRUE, updated_at = NOW()
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .context("Failed to revoke refresh token")?;

        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await
            .context("Failed to delete expired refresh tokens")?;

        Ok(result.rows_affected())
    }
}
