// 인메모리 저장소 (DATABASE_URL 미설정 시, 테스트용)
// In-memory store used when no DATABASE_URL is configured, and by tests

use std::collections::HashMap;
use std::sync::Arc;
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use crate::domains::auth::models::refresh_token::{RefreshToken, RefreshTokenCreate};
use crate::domains::auth::models::user::{ProfileUpdateRequest, User, UserCreate};
use crate::shared::database::repositories::auth::{
    DuplicateUser, RefreshTokenRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<u64, User>,
    refresh_tokens: HashMap<String, RefreshToken>,
    next_user_id: u64,
    next_token_id: i64,
}

/// 두 저장소 트레이트를 모두 구현하는 공유 저장소
/// One shared store implementing both repository traits
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, data: UserCreate) -> Result<User> {
        let mut tables = self.tables.write();

        // UNIQUE 제약 흉내
        if tables.users.values().any(|u| u.username == data.username) {
            return Err(DuplicateUser { field: "username" }.into());
        }
        if tables
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(DuplicateUser { field: "email" }.into());
        }

        tables.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.next_user_id,
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            first_name: data.first_name,
            last_name: data.last_name,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn get_user_by_id(&self, id: u64) -> Result<Option<User>> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .tables
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .tables
            .read()
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update_profile(&self, id: u64, update: &ProfileUpdateRequest) -> Result<Option<User>> {
        let mut tables = self.tables.write();

        if let Some(email) = &update.email {
            if tables
                .users
                .values()
                .any(|u| u.id != id && u.email.eq_ignore_ascii_case(email))
            {
                return Err(DuplicateUser { field: "email" }.into());
            }
        }

        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(first_name) = &update.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &update.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryStore {
    async fn create(&self, data: RefreshTokenCreate) -> Result<RefreshToken> {
        let mut tables = self.tables.write();

        if !tables.users.contains_key(&data.user_id) {
            bail!("unknown user: {}", data.user_id);
        }

        tables.next_token_id += 1;
        let now = Utc::now();
        let token = RefreshToken {
            id: tables.next_token_id,
            user_id: data.user_id,
            token_hash: data.token_hash,
            expires_at: data.expires_at,
            created_at: now,
            updated_at: now,
            revoked: false,
        };
        tables
            .refresh_tokens
            .insert(token.token_hash.clone(), token.clone());

        Ok(token)
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>> {
        Ok(self.tables.read().refresh_tokens.get(token_hash).cloned())
    }

    async fn revoke(&self, token_hash: &str) -> Result<()> {
        if let Some(token) = self.tables.write().refresh_tokens.get_mut(token_hash) {
            token.revoked = true;
            token.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64> {
        let now = Utc::now();
        let mut tables = self.tables.write();
        let before = tables.refresh_tokens.len();
        tables.refresh_tokens.retain(|_, token| token.expires_at >= now);

        Ok((before - tables.refresh_tokens.len()) as u64)
    }
}
