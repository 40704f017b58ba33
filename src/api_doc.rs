use utoipa::OpenApi;
use crate::domains::auth::models::*;
use crate::domains::health::handlers::PingResponse;

// OpenAPI 스키마 정의: Swagger 문서 자동 생성
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::domains::health::handlers::ping,
        crate::domains::auth::handlers::auth_handler::register,
        crate::domains::auth::handlers::auth_handler::token_obtain_pair,
        crate::domains::auth::handlers::auth_handler::token_refresh,
        crate::domains::auth::handlers::auth_handler::get_profile,
        crate::domains::auth::handlers::auth_handler::update_profile
    ),
    components(schemas(
        PingResponse,
        RegisterRequest,
        RegisterResponse,
        TokenObtainPairRequest,
        TokenPairResponse,
        TokenRefreshRequest,
        TokenRefreshResponse,
        ProfileUpdateRequest,
        UserResponse
    )),
    modifiers(
        &SecurityAddon
    ),
    tags(
        (name = "Health", description = "Liveness check"),
        (name = "Auth", description = "Registration and JWT token endpoints"),
        (name = "Users", description = "Authenticated user profile")
    ),
    info(
        title = "User Auth API",
        description = "User registration, JWT authentication and profile API",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

// Security scheme 정의: Swagger UI에서 "Authorize" 버튼 추가
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
