use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use crate::domains::auth::services::AuthService;

/// 만료된 Refresh Token 정리 스케줄러
/// Expired refresh token cleanup
///
/// 역할:
/// - 주기적으로 만료된 Refresh Token 삭제
/// - 실패해도 다음 주기에 다시 시도 (로그만 남김)
pub struct RefreshTokenCleanup {
    auth_service: AuthService,
    period: Duration,
}

impl RefreshTokenCleanup {
    pub fn new(auth_service: AuthService, period: Duration) -> Self {
        Self {
            auth_service,
            period,
        }
    }

    /// 백그라운드 태스크 시작
    /// Spawn the background task
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                match self.auth_service.purge_expired_refresh_tokens().await {
                    Ok(0) => {}
                    Ok(deleted) => tracing::info!(deleted, "expired refresh tokens removed"),
                    Err(e) => tracing::warn!(error = %e, "refresh token cleanup failed"),
                }
            }
        })
    }
}
