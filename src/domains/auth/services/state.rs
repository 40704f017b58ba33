// Auth domain state
// 인증 도메인 상태
use crate::shared::config::AppConfig;
use crate::shared::database::AuthRepositories;
use crate::domains::auth::services::{AuthService, JwtService, RefreshPolicy};

/// Auth domain state
/// 인증 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: AuthService,
    pub jwt_service: JwtService,
}

impl AuthState {
    /// Create AuthState with storage and configuration
    /// AuthState 생성 (저장소와 설정 필요)
    pub fn new(repos: AuthRepositories, config: &AppConfig) -> Self {
        let jwt_service = JwtService::new(&config.jwt_secret, config.access_token_ttl);
        let refresh_policy = RefreshPolicy {
            ttl: config.refresh_token_ttl,
            rotate: config.rotate_refresh_tokens,
        };

        Self {
            auth_service: AuthService::new(repos, jwt_service.clone(), refresh_policy),
            jwt_service,
        }
    }
}
