use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::domains::auth::models::user::{ProfileUpdateRequest, UserResponse};
use crate::shared::errors::ValidationError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

// 회원가입 요청 모델
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[schema(as = RegisterRequest)]
pub struct RegisterRequest {
    /// Username (unique)
    /// 사용자명 (중복 불가)
    #[schema(example = "johndoe")]
    #[serde(default)]
    pub username: String,

    /// Email address
    /// 이메일 주소
    #[schema(example = "john@example.com")]
    #[serde(default)]
    pub email: String,

    /// Password (will be hashed)
    /// 비밀번호 (해싱됨)
    #[schema(example = "password123")]
    #[serde(default)]
    pub password: String,

    /// Password confirmation
    /// 비밀번호 확인
    #[schema(example = "password123")]
    #[serde(default)]
    pub password2: String,

    #[schema(example = "John")]
    #[serde(default)]
    pub first_name: String,

    #[schema(example = "Doe")]
    #[serde(default)]
    pub last_name: String,
}

impl RegisterRequest {
    /// 형식 검증 (중복 검사는 서비스에서)
    /// Shape checks only; uniqueness is checked against the store
    pub fn validate(&self) -> ValidationError {
        let mut errors = ValidationError::new();

        for (field, value) in [
            ("username", &self.username),
            ("email", &self.email),
            ("password", &self.password),
            ("password2", &self.password2),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
        ] {
            if value.trim().is_empty() {
                errors.add(field, "This field is required.");
            }
        }

        if !self.email.trim().is_empty() && !is_valid_email(&self.email) {
            errors.add("email", "Enter a valid email address.");
        }

        if !self.password.is_empty() && self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add(
                "password",
                format!("Password must be at least {} characters.", MIN_PASSWORD_LENGTH),
            );
        }

        if !self.password2.is_empty() && self.password != self.password2 {
            errors.add("password2", "Passwords must match.");
        }

        errors
    }
}

impl ProfileUpdateRequest {
    pub fn validate(&self) -> ValidationError {
        let mut errors = ValidationError::new();

        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                errors.add("email", "Enter a valid email address.");
            }
        }
        for (field, value) in [("first_name", &self.first_name), ("last_name", &self.last_name)] {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                errors.add(field, "This field may not be blank.");
            }
        }

        errors
    }
}

/// RFC 5322 이메일 형식 검사
pub fn is_valid_email(email: &str) -> bool {
    email_address::EmailAddress::is_valid(email.trim())
}

// 회원가입 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = RegisterResponse)]
pub struct RegisterResponse {
    /// Created user (without password)
    /// 생성된 사용자 정보 (비밀번호 제외)
    pub user: UserResponse,

    /// JWT Access Token
    pub access: String,

    /// Refresh Token
    pub refresh: String,
}

// 토큰 발급 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = TokenObtainPairRequest)]
pub struct TokenObtainPairRequest {
    #[schema(example = "johndoe")]
    pub username: String,

    #[schema(example = "password123")]
    pub password: String,
}

// 토큰 발급 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = TokenPairResponse)]
pub struct TokenPairResponse {
    /// JWT Access Token (짧은 수명)
    /// JWT Access Token (short lifetime)
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access: String,

    /// Refresh Token (긴 수명, DB에는 해시만 저장)
    /// Refresh Token (long lifetime, only its hash is stored)
    #[schema(example = "abc123def456...")]
    pub refresh: String,

    pub user: UserResponse,
}

// 토큰 갱신 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = TokenRefreshRequest)]
pub struct TokenRefreshRequest {
    #[schema(example = "abc123def456...")]
    pub refresh: String,
}

// 토큰 갱신 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = TokenRefreshResponse)]
pub struct TokenRefreshResponse {
    /// 새 Access Token
    /// New Access Token
    pub access: String,

    /// 새 Refresh Token (ROTATE_REFRESH_TOKENS 사용 시에만)
    /// New Refresh Token, only when rotation is enabled
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub refresh: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RegisterRequest {
        RegisterRequest {
            username: "johndoe".into(),
            email: "john@example.com".into(),
            password: "password123".into(),
            password2: "password123".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
        }
    }

    #[test]
    fn accepts_complete_registration() {
        assert!(valid_request().validate().is_empty());
    }

    #[test]
    fn reports_every_missing_field() {
        let errors = RegisterRequest::default().validate();

        for field in ["username", "email", "password", "password2", "first_name", "last_name"] {
            assert!(errors.fields().contains_key(field), "missing {}", field);
        }
    }

    #[test]
    fn rejects_short_and_mismatched_passwords() {
        let request = RegisterRequest {
            password: "short".into(),
            password2: "different".into(),
            ..valid_request()
        };
        let errors = request.validate();

        assert!(errors.fields()["password"][0].contains("at least 8"));
        assert_eq!(errors.fields()["password2"], vec!["Passwords must match.".to_string()]);
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.io"));
        assert!(is_valid_email("first.last@mail.example.com"));
        assert!(!is_valid_email("plainaddress"));
        assert!(is_valid_email(" padded@example.com "));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("us er@example.com"));
    }

    #[test]
    fn profile_update_rejects_blank_names() {
        let update = ProfileUpdateRequest {
            first_name: Some("  ".into()),
            email: Some("nope".into()),
            ..Default::default()
        };
        let errors = update.validate();

        assert!(errors.fields().contains_key("first_name"));
        assert!(errors.fields().contains_key("email"));
        assert!(ProfileUpdateRequest::default().validate().is_empty());
    }
}
