use std::sync::Arc;
use crate::domains::auth::services::state::AuthState;
use crate::routes::{route_table, Endpoint, RouteError, RouteTable};
use crate::shared::config::AppConfig;
use crate::shared::database::AuthRepositories;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태와 라우트 테이블을 조합)
#[derive(Clone)]
pub struct AppState {
    pub auth_state: AuthState,
    /// 시작 시 한 번 구성된 라우트 테이블 (읽기 전용)
    /// Route table built once at startup, read-only afterwards
    pub routes: Arc<RouteTable<Endpoint>>,
}

impl AppState {
    /// 저장소와 설정으로 AppState 생성
    /// Build state from storage and configuration
    pub fn new(repos: AuthRepositories, config: &AppConfig) -> Result<Self, RouteError> {
        let routes = route_table(config.trailing_slash)?;

        Ok(Self {
            auth_state: AuthState::new(repos, config),
            routes: Arc::new(routes),
        })
    }
}
