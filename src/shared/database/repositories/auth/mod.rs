// Auth repositories
pub mod user_repository;
pub mod refresh_token_repository;
pub mod memory;

pub use user_repository::*;
pub use refresh_token_repository::*;
pub use memory::*;

use std::sync::Arc;
use crate::shared::database::Database;

/// 인증 저장소 묶음 (Postgres 또는 인메모리)
/// Storage backends used by the auth domain
#[derive(Clone)]
pub struct AuthRepositories {
    pub users: Arc<dyn UserRepository>,
    pub refresh_tokens: Arc<dyn RefreshTokenRepository>,
}

impl AuthRepositories {
    pub fn postgres(db: Database) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(db.pool().clone())),
            refresh_tokens: Arc::new(PgRefreshTokenRepository::new(db.pool().clone())),
        }
    }

    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            refresh_tokens: Arc::new(store),
        }
    }
}
