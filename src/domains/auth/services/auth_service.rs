use crate::shared::database::{AuthRepositories, DuplicateUser};
use crate::domains::auth::models::{
    ProfileUpdateRequest, RefreshTokenCreate, RegisterRequest, TokenObtainPairRequest, User,
    UserCreate,
};
use crate::domains::auth::services::JwtService;
use crate::shared::errors::{AuthError, ValidationError};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use chrono::{Duration, Utc};

/// 발급된 토큰 한 쌍
/// Access + refresh pair handed to the client
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// 인증 서비스 설정
/// Refresh-token policy
#[derive(Debug, Clone, Copy)]
pub struct RefreshPolicy {
    pub ttl: Duration,
    pub rotate: bool,
}

// 인증 서비스
// AuthService: handles authentication business logic
#[derive(Clone)]
pub struct AuthService {
    repos: AuthRepositories,
    jwt_service: JwtService,
    refresh_policy: RefreshPolicy,
}

impl AuthService {
    pub fn new(repos: AuthRepositories, jwt_service: JwtService, refresh_policy: RefreshPolicy) -> Self {
        Self {
            repos,
            jwt_service,
            refresh_policy,
        }
    }

    // 회원가입 (비즈니스 로직)
    // Register a user and sign them in
    pub async fn register(&self, request: RegisterRequest) -> Result<(User, TokenPair), AuthError> {
        // 1. 형식 검증
        let mut errors = request.validate();

        // 2. 사용자명/이메일 중복 확인
        if !request.username.trim().is_empty() {
            let existing = self
                .repos
                .users
                .get_user_by_username(request.username.trim())
                .await
                .map_err(|e| AuthError::DatabaseError(format!("Failed to check username: {}", e)))?;
            if existing.is_some() {
                errors.add("username", "A user with that username already exists.");
            }
        }
        if !request.email.trim().is_empty() {
            let existing = self
                .repos
                .users
                .get_user_by_email(request.email.trim())
                .await
                .map_err(|e| AuthError::DatabaseError(format!("Failed to check email: {}", e)))?;
            if existing.is_some() {
                errors.add("email", "A user with that email already exists.");
            }
        }
        errors.into_result()?;

        // 3. 비밀번호 해싱
        let password_hash = Self::hash_password(&request.password)?;

        // 4. 사용자 생성
        let user = self
            .repos
            .users
            .create_user(UserCreate {
                username: request.username.trim().to_string(),
                email: request.email.trim().to_string(),
                password_hash,
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
            })
            .await
            .map_err(|e| user_write_error("Failed to create user", e))?;

        tracing::info!(user_id = user.id, username = %user.username, "user registered");

        // 5. 가입 직후 로그인 상태로 토큰 발급
        let tokens = self.issue_token_pair(&user).await?;

        Ok((user, tokens))
    }

    // 토큰 발급 (로그인)
    // Verify credentials and issue an access/refresh pair
    pub async fn obtain_token_pair(
        &self,
        request: TokenObtainPairRequest,
    ) -> Result<(User, TokenPair), AuthError> {
        // 1. 사용자명으로 사용자 조회
        let user = self
            .repos
            .users
            .get_user_by_username(request.username.trim())
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to fetch user: {}", e)))?
            .ok_or(AuthError::InvalidCredentials)?;

        // 2. 비밀번호 검증
        Self::verify_password(&request.password, &user.password_hash)?;

        // 3. 토큰 발급
        let tokens = self.issue_token_pair(&user).await?;
        tracing::info!(user_id = user.id, "token pair issued");

        Ok((user, tokens))
    }

    async fn issue_token_pair(&self, user: &User) -> Result<TokenPair, AuthError> {
        let access = self.jwt_service.generate_access_token(user.id, &user.username)?;
        let refresh = self.create_refresh_token(user.id).await?;

        Ok(TokenPair { access, refresh })
    }

    /// Refresh Token 생성 및 DB 저장
    /// Create and store refresh token
    async fn create_refresh_token(&self, user_id: u64) -> Result<String, AuthError> {
        // 1. Refresh Token 생성 (랜덤 문자열)
        let refresh_token = self.jwt_service.generate_refresh_token();

        // 2. Token 해싱 (DB 저장용)
        let token_hash = self.jwt_service.hash_refresh_token(&refresh_token);

        // 3. 만료 시각 계산
        let expires_at = Utc::now()
            .checked_add_signed(self.refresh_policy.ttl)
            .ok_or_else(|| AuthError::Internal("Refresh token expiry out of range".to_string()))?;

        // 4. DB에 저장
        self.repos
            .refresh_tokens
            .create(RefreshTokenCreate {
                user_id,
                token_hash,
                expires_at,
            })
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to create refresh token: {}", e)))?;

        // 5. 원본 토큰 반환 (해싱 전)
        Ok(refresh_token)
    }

    /// Refresh Token 검증 및 새 Access Token 발급
    /// Returns the new access token, plus a new refresh token when rotation is on
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<(String, Option<String>), AuthError> {
        // 1. Refresh Token 해싱 후 조회
        let token_hash = self.jwt_service.hash_refresh_token(refresh_token);
        let stored_token = self
            .repos
            .refresh_tokens
            .find_by_token_hash(&token_hash)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to find refresh token: {}", e)))?
            .ok_or(AuthError::InvalidToken)?;

        // 2. 무효화/만료 확인
        if !stored_token.is_usable(Utc::now()) {
            tracing::debug!(user_id = stored_token.user_id, "refresh rejected");
            return Err(AuthError::InvalidToken);
        }

        // 3. 사용자 정보 조회
        let user = self
            .repos
            .users
            .get_user_by_id(stored_token.user_id)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to fetch user: {}", e)))?
            .ok_or(AuthError::InvalidToken)?;

        // 4. 새 Access Token 생성
        let access_token = self.jwt_service.generate_access_token(user.id, &user.username)?;

        if !self.refresh_policy.rotate {
            return Ok((access_token, None));
        }

        // 5. Rotation: 기존 토큰을 먼저 무효화한 후 새 토큰 생성
        self.repos
            .refresh_tokens
            .revoke(&token_hash)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to revoke old refresh token: {}", e)))?;
        let new_refresh_token = self.create_refresh_token(user.id).await?;

        Ok((access_token, Some(new_refresh_token)))
    }

    pub async fn get_user_info(&self, user_id: u64) -> Result<User, AuthError> {
        self.repos
            .users
            .get_user_by_id(user_id)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to fetch user: {}", e)))?
            .ok_or(AuthError::InvalidToken) // 토큰은 유효하지만 사용자가 삭제된 경우
    }

    /// 프로필 부분 수정
    /// Partially update the caller's profile
    pub async fn update_profile(
        &self,
        user_id: u64,
        mut update: ProfileUpdateRequest,
    ) -> Result<User, AuthError> {
        update.email = update.email.map(|e| e.trim().to_string());
        update.first_name = update.first_name.map(|n| n.trim().to_string());
        update.last_name = update.last_name.map(|n| n.trim().to_string());

        let mut errors: ValidationError = update.validate();

        if let Some(email) = update.email.as_deref().filter(|_| errors.is_empty()) {
            let owner = self
                .repos
                .users
                .get_user_by_email(email)
                .await
                .map_err(|e| AuthError::DatabaseError(format!("Failed to check email: {}", e)))?;
            if owner.is_some_and(|u| u.id != user_id) {
                errors.add("email", "A user with that email already exists.");
            }
        }
        errors.into_result()?;

        self.repos
            .users
            .update_profile(user_id, &update)
            .await
            .map_err(|e| user_write_error("Failed to update profile", e))?
            .ok_or(AuthError::InvalidToken)
    }

    /// 만료된 Refresh Token 정리
    /// Delete expired refresh tokens
    pub async fn purge_expired_refresh_tokens(&self) -> Result<u64, AuthError> {
        self.repos
            .refresh_tokens
            .delete_expired()
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to delete expired tokens: {}", e)))
    }

    fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHashingFailed(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(password: &str, password_hash: &str) -> Result<(), AuthError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)
    }
}

/// 사전 검사를 통과한 뒤 UNIQUE 제약에 걸린 경우(동시 가입)도 필드 에러로 변환
fn user_write_error(action: &str, err: anyhow::Error) -> AuthError {
    match err.downcast_ref::<DuplicateUser>() {
        Some(DuplicateUser { field }) => {
            let mut errors = ValidationError::new();
            errors.add(field, format!("A user with that {} already exists.", field));
            AuthError::Validation(errors)
        }
        None => AuthError::DatabaseError(format!("{}: {}", action, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use async_trait::async_trait;
    use crate::shared::database::{InMemoryStore, UserRepository};

    /// 조회는 항상 비어 있고 쓰기만 저장소에 위임 (동시 가입 경합 재현)
    struct LookupsMiss(InMemoryStore);

    #[async_trait]
    impl UserRepository for LookupsMiss {
        async fn create_user(&self, data: UserCreate) -> anyhow::Result<User> {
            self.0.create_user(data).await
        }

        async fn get_user_by_id(&self, id: u64) -> anyhow::Result<Option<User>> {
            self.0.get_user_by_id(id).await
        }

        async fn get_user_by_username(&self, _: &str) -> anyhow::Result<Option<User>> {
            Ok(None)
        }

        async fn get_user_by_email(&self, _: &str) -> anyhow::Result<Option<User>> {
            Ok(None)
        }

        async fn update_profile(
            &self,
            id: u64,
            update: &ProfileUpdateRequest,
        ) -> anyhow::Result<Option<User>> {
            self.0.update_profile(id, update).await
        }
    }

    fn service(rotate: bool) -> AuthService {
        AuthService::new(
            AuthRepositories::in_memory(),
            JwtService::new("test-secret", Duration::minutes(5)),
            RefreshPolicy {
                ttl: Duration::days(1),
                rotate,
            },
        )
    }

    fn registration(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: "password123".into(),
            password2: "password123".into(),
            first_name: "Test".into(),
            last_name: "User".into(),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let auth = service(false);
        let (user, tokens) = auth.register(registration("alice", "alice@example.com")).await.unwrap();
        assert_ne!(user.password_hash, "password123");
        assert!(!tokens.refresh.is_empty());

        let (same, _) = auth
            .obtain_token_pair(TokenObtainPairRequest {
                username: "alice".into(),
                password: "password123".into(),
            })
            .await
            .unwrap();
        assert_eq!(same.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_validation_error() {
        let auth = service(false);
        auth.register(registration("alice", "alice@example.com")).await.unwrap();

        let err = auth
            .register(registration("alice", "second@example.com"))
            .await
            .unwrap_err();
        match err {
            AuthError::Validation(errors) => assert!(errors.fields().contains_key("username")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unique_violation_after_precheck_is_a_validation_error() {
        let store = InMemoryStore::new();
        let auth = AuthService::new(
            AuthRepositories {
                users: Arc::new(LookupsMiss(store.clone())),
                refresh_tokens: Arc::new(store),
            },
            JwtService::new("test-secret", Duration::minutes(5)),
            RefreshPolicy {
                ttl: Duration::days(1),
                rotate: false,
            },
        );
        auth.register(registration("alice", "alice@example.com")).await.unwrap();

        let err = auth
            .register(registration("alice", "second@example.com"))
            .await
            .unwrap_err();
        match err {
            AuthError::Validation(errors) => {
                assert_eq!(
                    errors.fields()["username"],
                    vec!["A user with that username already exists.".to_string()]
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = auth
            .register(registration("bob", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(e) if e.fields().contains_key("email")));
    }

    #[tokio::test]
    async fn login_trims_username_like_register() {
        let auth = service(false);
        let (user, _) = auth.register(registration(" alice ", "alice@example.com")).await.unwrap();
        assert_eq!(user.username, "alice");

        let (same, _) = auth
            .obtain_token_pair(TokenObtainPairRequest {
                username: " alice ".into(),
                password: "password123".into(),
            })
            .await
            .unwrap();
        assert_eq!(same.id, user.id);
    }

    #[tokio::test]
    async fn overflowing_refresh_ttl_is_an_error_not_a_panic() {
        let auth = AuthService::new(
            AuthRepositories::in_memory(),
            JwtService::new("test-secret", Duration::minutes(5)),
            RefreshPolicy {
                ttl: Duration::MAX,
                rotate: false,
            },
        );

        let err = auth
            .register(registration("alice", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let auth = service(false);
        auth.register(registration("alice", "alice@example.com")).await.unwrap();

        for (username, password) in [("alice", "wrong-password"), ("nobody", "password123")] {
            let err = auth
                .obtain_token_pair(TokenObtainPairRequest {
                    username: username.into(),
                    password: password.into(),
                })
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
        }
    }

    #[tokio::test]
    async fn refresh_without_rotation_keeps_token_usable() {
        let auth = service(false);
        let (_, tokens) = auth.register(registration("alice", "alice@example.com")).await.unwrap();

        let (_, rotated) = auth.refresh_access_token(&tokens.refresh).await.unwrap();
        assert!(rotated.is_none());
        assert!(auth.refresh_access_token(&tokens.refresh).await.is_ok());
    }

    #[tokio::test]
    async fn refresh_with_rotation_revokes_old_token() {
        let auth = service(true);
        let (_, tokens) = auth.register(registration("alice", "alice@example.com")).await.unwrap();

        let (_, rotated) = auth.refresh_access_token(&tokens.refresh).await.unwrap();
        let rotated = rotated.expect("rotation enabled");

        assert!(matches!(
            auth.refresh_access_token(&tokens.refresh).await,
            Err(AuthError::InvalidToken)
        ));
        assert!(auth.refresh_access_token(&rotated).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_refresh_token_is_invalid() {
        let auth = service(false);

        assert!(matches!(
            auth.refresh_access_token("never-issued").await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn update_profile_rejects_taken_email() {
        let auth = service(false);
        let (alice, _) = auth.register(registration("alice", "alice@example.com")).await.unwrap();
        auth.register(registration("bob", "bob@example.com")).await.unwrap();

        let err = auth
            .update_profile(
                alice.id,
                ProfileUpdateRequest {
                    email: Some("bob@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let updated = auth
            .update_profile(
                alice.id,
                ProfileUpdateRequest {
                    last_name: Some(" Liddell ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.last_name, "Liddell");
    }
}
