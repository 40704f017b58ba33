// 애플리케이션 설정 (환경 변수)
// Application configuration loaded from environment variables

use std::net::SocketAddr;
use chrono::Duration;
use thiserror::Error;
use crate::routes::TrailingSlash;

const DEV_JWT_SECRET: &str = "your-secret-key-change-in-production";

/// 토큰 수명 상한 (만료 시각 계산이 넘치지 않도록)
pub const MAX_ACCESS_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;
pub const MAX_REFRESH_TOKEN_TTL_DAYS: i64 = 365 * 10;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// 애플리케이션 설정
/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// None이면 인메모리 저장소 사용
    /// In-memory store when unset
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub rotate_refresh_tokens: bool,
    pub trailing_slash: TrailingSlash,
    pub cors_allowed_origin: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            database_url: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            access_token_ttl: Duration::minutes(60),
            refresh_token_ttl: Duration::days(7),
            rotate_refresh_tokens: false,
            trailing_slash: TrailingSlash::Redirect,
            cors_allowed_origin: "http://localhost:5173".to_string(),
        }
    }
}

impl AppConfig {
    /// 프로세스 환경 변수에서 설정 로드
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정 로드 (테스트용으로 분리)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw.parse().map_err(|e| invalid("BIND_ADDR", e))?,
            None => defaults.bind_addr,
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if secret.is_empty() => {
                return Err(invalid("JWT_SECRET", "must not be empty"));
            }
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET is not set, using the development secret");
                defaults.jwt_secret
            }
        };

        let access_token_ttl = match lookup("ACCESS_TOKEN_TTL_MINUTES") {
            Some(raw) => {
                let minutes = parse_ttl("ACCESS_TOKEN_TTL_MINUTES", &raw, MAX_ACCESS_TOKEN_TTL_MINUTES)?;
                Duration::try_minutes(minutes)
                    .ok_or_else(|| invalid("ACCESS_TOKEN_TTL_MINUTES", "out of range"))?
            }
            None => defaults.access_token_ttl,
        };

        let refresh_token_ttl = match lookup("REFRESH_TOKEN_TTL_DAYS") {
            Some(raw) => {
                let days = parse_ttl("REFRESH_TOKEN_TTL_DAYS", &raw, MAX_REFRESH_TOKEN_TTL_DAYS)?;
                Duration::try_days(days)
                    .ok_or_else(|| invalid("REFRESH_TOKEN_TTL_DAYS", "out of range"))?
            }
            None => defaults.refresh_token_ttl,
        };

        let rotate_refresh_tokens = match lookup("ROTATE_REFRESH_TOKENS") {
            Some(raw) => parse_bool("ROTATE_REFRESH_TOKENS", &raw)?,
            None => defaults.rotate_refresh_tokens,
        };

        let trailing_slash = match lookup("TRAILING_SLASH") {
            Some(raw) => raw.parse().map_err(|e| invalid("TRAILING_SLASH", e))?,
            None => defaults.trailing_slash,
        };

        let cors_allowed_origin = lookup("CORS_ALLOWED_ORIGIN").unwrap_or(defaults.cors_allowed_origin);

        Ok(Self {
            bind_addr,
            database_url,
            jwt_secret,
            access_token_ttl,
            refresh_token_ttl,
            rotate_refresh_tokens,
            trailing_slash,
            cors_allowed_origin,
        })
    }
}

fn invalid(key: &'static str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        reason: reason.to_string(),
    }
}

/// 1..=max 범위의 정수
fn parse_ttl(key: &'static str, raw: &str, max: i64) -> Result<i64, ConfigError> {
    match raw.trim().parse::<i64>() {
        Ok(value) if value <= 0 => Err(invalid(key, "must be greater than zero")),
        Ok(value) if value > max => Err(invalid(key, format!("must be at most {}", max))),
        Ok(value) => Ok(value),
        Err(e) => Err(invalid(key, e)),
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(invalid(key, format!("expected a boolean, got '{}'", other))),
    }
}
