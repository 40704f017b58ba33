use crate::domains::auth::models::{
    ProfileUpdateRequest, RegisterRequest, RegisterResponse, TokenObtainPairRequest,
    TokenPairResponse, TokenRefreshRequest, TokenRefreshResponse, UserResponse,
};
use crate::routes::names;
use crate::shared::services::AppState;
use crate::shared::errors::AuthError;
use crate::shared::middleware::{AuthenticatedUser, JsonBody};
use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode},
    Json,
};

// 회원가입 핸들러
#[utoipa::path(
    post,
    path = "/register/",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "Validation error")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(app_state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, [(axum::http::HeaderName, String); 1], Json<RegisterResponse>), AuthError> {
    let (user, tokens) = app_state
        .auth_state
        .auth_service
        .register(request)
        .await?;

    let location = app_state
        .routes
        .reverse(names::USER_PROFILE)
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .to_string();

    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(RegisterResponse {
            user: user.into(),
            access: tokens.access,
            refresh: tokens.refresh,
        }),
    ))
}

// 토큰 발급 (로그인) 핸들러
#[utoipa::path(
    post,
    path = "/token/",
    request_body = TokenObtainPairRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPairResponse),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn token_obtain_pair(
    State(app_state): State<AppState>,
    JsonBody(request): JsonBody<TokenObtainPairRequest>,
) -> Result<Json<TokenPairResponse>, AuthError> {
    let (user, tokens) = app_state
        .auth_state
        .auth_service
        .obtain_token_pair(request)
        .await?;

    Ok(Json(TokenPairResponse {
        access: tokens.access,
        refresh: tokens.refresh,
        user: user.into(),
    }))
}

/// 토큰 갱신 핸들러
/// Refresh token handler
#[utoipa::path(
    post,
    path = "/token/refresh/",
    request_body = TokenRefreshRequest,
    responses(
        (status = 200, description = "Access token refreshed", body = TokenRefreshResponse),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "Auth"
)]
pub async fn token_refresh(
    State(app_state): State<AppState>,
    JsonBody(request): JsonBody<TokenRefreshRequest>,
) -> Result<Json<TokenRefreshResponse>, AuthError> {
    let (access, refresh) = app_state
        .auth_state
        .auth_service
        .refresh_access_token(&request.refresh)
        .await?;

    Ok(Json(TokenRefreshResponse { access, refresh }))
}

#[utoipa::path(
    get,
    path = "/users/me/",
    responses(
        (status = 200, description = "Caller profile", body = UserResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Users"
)]
pub async fn get_profile(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<UserResponse>, AuthError> {
    tracing::debug!(
        user_id = authenticated_user.user_id,
        username = %authenticated_user.username,
        "profile requested"
    );

    let user = app_state
        .auth_state
        .auth_service
        .get_user_info(authenticated_user.user_id)
        .await?;

    Ok(Json(user.into()))
}

#[utoipa::path(
    patch,
    path = "/users/me/",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Users"
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    JsonBody(update): JsonBody<ProfileUpdateRequest>,
) -> Result<Json<UserResponse>, AuthError> {
    tracing::debug!(
        user_id = authenticated_user.user_id,
        username = %authenticated_user.username,
        "profile update requested"
    );

    let user = app_state
        .auth_state
        .auth_service
        .update_profile(authenticated_user.user_id, update)
        .await?;

    Ok(Json(user.into()))
}
