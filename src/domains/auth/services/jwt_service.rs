// src/domains/auth/services/jwt_service.rs
use crate::shared::errors::AuthError;
use crate::domains::auth::models::jwt::{Claims, ACCESS_TOKEN_TYPE};
use chrono::Duration;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Sha256, Digest};
use rand::Rng;
use rand::distributions::Alphanumeric;

const REFRESH_TOKEN_LENGTH: usize = 64;

/// JWT 서비스
/// JWT Service for token generation and verification
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_ttl: Duration,
}

impl JwtService {
    /// JWT Service 생성
    /// Create JWT Service
    pub fn new(secret: &str, access_token_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_ttl,
        }
    }

    /// Access Token 발급 (짧은 수명)
    /// Generate Access Token (short lifetime)
    pub fn generate_access_token(&self, user_id: u64, username: &str) -> Result<String, AuthError> {
        let claims = Claims::access(user_id, username.to_string(), self.access_token_ttl);
        self.encode(&claims)
    }

    fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to generate access token: {}", e)))
    }

    /// Refresh Token 생성 (랜덤 문자열, 해시만 DB에 저장)
    /// Generate Refresh Token (random string, only its hash is stored)
    pub fn generate_refresh_token(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(REFRESH_TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }

    /// Refresh Token 해싱 (DB 저장용)
    /// Hash Refresh Token (for database storage)
    pub fn hash_refresh_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Access Token 검증 (서명, 만료, 토큰 종류)
    /// Verify Access Token (signature, expiry, token type)
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::InvalidToken)?;

        if token_data.claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(AuthError::InvalidToken);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn service() -> JwtService {
        JwtService::new("test-secret", Duration::minutes(5))
    }

    #[test]
    fn access_token_round_trip() {
        let jwt = service();
        let token = jwt.generate_access_token(7, "alice").unwrap();

        let claims = jwt.verify_access_token(&token).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.token_type, "access");
        assert_eq!(claims.exp - claims.iat, 300);
    }

    #[test]
    fn rejects_foreign_signature() {
        let token = JwtService::new("other-secret", Duration::minutes(5))
            .generate_access_token(1, "alice")
            .unwrap();

        assert!(matches!(service().verify_access_token(&token), Err(AuthError::InvalidToken)));
        assert!(matches!(service().verify_access_token("not-a-jwt"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn rejects_expired_token() {
        let jwt = service();
        let mut claims = Claims::access(1, "alice".into(), Duration::minutes(5));
        claims.iat = Utc::now().timestamp() - 600;
        claims.exp = Utc::now().timestamp() - 60;
        let token = jwt.encode(&claims).unwrap();

        assert!(matches!(jwt.verify_access_token(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn rejects_non_access_token_type() {
        let jwt = service();
        let mut claims = Claims::access(1, "alice".into(), Duration::minutes(5));
        claims.token_type = "refresh".into();
        let token = jwt.encode(&claims).unwrap();

        assert!(matches!(jwt.verify_access_token(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn refresh_tokens_are_random_and_hash_stably() {
        let jwt = service();
        let a = jwt.generate_refresh_token();
        let b = jwt.generate_refresh_token();

        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert_eq!(jwt.hash_refresh_token(&a), jwt.hash_refresh_token(&a));
        assert_eq!(jwt.hash_refresh_token(&a).len(), 64);
    }
}
