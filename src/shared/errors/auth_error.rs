use std::collections::BTreeMap;
use thiserror::Error;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// 특정 필드에 속하지 않는 에러의 키
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// 필드별 검증 에러 모음
/// Per-field validation failures, collected before rejecting a payload
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationError {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// 필드 에러 추가
    /// Record a failure for `field`
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    /// 에러가 없으면 Ok
    /// Ok when nothing was recorded
    pub fn into_result(self) -> Result<(), AuthError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AuthError::Validation(self))
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        write!(f, "invalid fields: {}", names.join(", "))
    }
}

/// 인증 관련 에러
/// Authentication-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// 요청 본문 검증 실패
    /// Request payload failed validation
    #[error("Validation failed: {0}")]
    Validation(ValidationError),

    /// 잘못된 사용자명 또는 비밀번호
    /// Invalid username or password
    #[error("No active account found with the given credentials")]
    InvalidCredentials,

    /// 인증 정보가 제공되지 않음
    /// No bearer token presented
    #[error("Authentication credentials were not provided")]
    Unauthenticated,

    /// 잘못된 또는 만료된 토큰
    /// Invalid or expired token
    #[error("Token is invalid or expired")]
    InvalidToken,

    /// 비밀번호 해싱 실패
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    PasswordHashingFailed(String),

    /// 데이터베이스 에러
    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 내부 서버 에러
    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::Unauthenticated
            | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::PasswordHashingFailed(_)
            | AuthError::DatabaseError(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 요청 본문 파싱 실패 (문법 오류, 타입 불일치, 필수 필드 누락, Content-Type 누락)
/// JSON body rejections become a 400 validation error
impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), "json body rejected");

        let mut errors = ValidationError::new();
        errors.add(NON_FIELD_ERRORS, rejection.body_text());
        AuthError::Validation(errors)
    }
}

/// AuthError를 HTTP 응답으로 변환
impl From<AuthError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: AuthError) -> Self {
        let status = err.status();

        let body = match &err {
            AuthError::Validation(validation) => json!({
                "error": "Validation failed",
                "fields": validation.fields(),
            }),
            _ if status.is_server_error() => {
                // 내부 정보는 로그에만 남김
                tracing::error!(error = %err, "request failed");
                json!({ "error": "Internal server error" })
            }
            _ => json!({ "error": err.to_string() }),
        };

        (status, Json(body))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body): (StatusCode, Json<serde_json::Value>) = self.into();
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_group_by_field() {
        let mut errors = ValidationError::new();
        errors.add("password", "too short");
        errors.add("password", "too common");
        errors.add("email", "invalid");

        assert_eq!(errors.fields()["password"].len(), 2);
        assert_eq!(errors.to_string(), "invalid fields: email, password");
        assert!(matches!(errors.into_result(), Err(AuthError::Validation(_))));
        assert!(ValidationError::new().into_result().is_ok());
    }

    #[test]
    fn maps_to_status_codes() {
        assert_eq!(AuthError::Validation(ValidationError::new()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::DatabaseError("down".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn server_errors_hide_details() {
        let (status, Json(body)) = AuthError::DatabaseError("connection refused".into()).into();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }
}
