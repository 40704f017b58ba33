use serde::{Deserialize, Serialize};
use chrono::{Duration, Utc};
use uuid::Uuid;

pub const ACCESS_TOKEN_TYPE: &str = "access";

/// JWT Claims (토큰에 포함될 데이터)
/// JWT Claims (data to be included in token)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 사용자 ID
    /// User ID
    pub user_id: u64,

    /// 사용자명
    /// Username
    pub username: String,

    /// 토큰 종류 ("access")
    /// Token kind
    pub token_type: String,

    /// 토큰 고유 ID
    /// Unique token id
    pub jti: String,

    /// 만료 시간 (Unix timestamp)
    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// 발급 시간 (Unix timestamp)
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// 새 Access Token Claims 생성 (만료 시간 자동 계산)
    /// Create access-token claims expiring after `ttl`
    pub fn access(user_id: u64, username: String, ttl: Duration) -> Self {
        let now = Utc::now().timestamp();

        Self {
            user_id,
            username,
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            jti: Uuid::new_v4().to_string(),
            exp: now + ttl.num_seconds(),
            iat: now,
        }
    }
}
