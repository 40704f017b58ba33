use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use user_auth_api::domains::auth::services::RefreshTokenCleanup;
use user_auth_api::routes::create_app;
use user_auth_api::shared::config::AppConfig;
use user_auth_api::shared::database::{AuthRepositories, Database};
use user_auth_api::shared::services::AppState;

// 만료 토큰 정리 주기 (1시간)
const TOKEN_CLEANUP_PERIOD: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> Result<()> {
    // 로그 초기화 (RUST_LOG로 재정의 가능)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_auth_api=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        trailing_slash = ?config.trailing_slash,
        rotate_refresh_tokens = config.rotate_refresh_tokens,
        "configuration loaded"
    );

    // 저장소 선택: DATABASE_URL 있으면 PostgreSQL, 없으면 인메모리
    let repos = match &config.database_url {
        Some(db_url) => {
            let db = Database::new(db_url).await?;
            db.initialize().await?;
            tracing::info!("storage: postgresql");
            AuthRepositories::postgres(db)
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, using the in-memory store (data is lost on exit)");
            AuthRepositories::in_memory()
        }
    };

    // AppState 생성 (라우트 테이블 포함)
    let app_state = AppState::new(repos, &config).context("Failed to build route table")?;

    RefreshTokenCleanup::new(app_state.auth_state.auth_service.clone(), TOKEN_CLEANUP_PERIOD).start();

    let app = create_app(app_state, &config)?;

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!("server running on http://{}", config.bind_addr);
    tracing::info!("swagger UI available at http://{}/docs", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
