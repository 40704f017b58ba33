// Routes module: 라우팅 설정
// 역할: 라우트 테이블 구성 및 axum Router 생성
// Routes module: builds the route table and the axum router from it

pub mod table;

pub use table::*;

use std::sync::Arc;
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post, MethodRouter},
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use crate::api_doc::ApiDoc;
use crate::domains::auth::handlers::auth_handler;
use crate::domains::health::handlers::ping;
use crate::shared::config::AppConfig;
use crate::shared::services::AppState;

/// 라우트 이름 (reverse 용)
/// Route names used for reverse lookups
pub mod names {
    pub const PING: &str = "ping";
    pub const REGISTER: &str = "register";
    pub const TOKEN_OBTAIN_PAIR: &str = "token_obtain_pair";
    pub const TOKEN_REFRESH: &str = "token_refresh";
    pub const USER_PROFILE: &str = "user-profile";
}

/// 핸들러 참조
/// Handler reference stored in the route table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Ping,
    Register,
    TokenObtainPair,
    TokenRefresh,
    UserProfile,
}

impl Endpoint {
    /// 메서드별 핸들러 (허용되지 않은 메서드는 405)
    /// Method router for this endpoint; other methods get a 405
    pub fn method_router(self) -> MethodRouter<AppState> {
        match self {
            Endpoint::Ping => get(ping),
            Endpoint::Register => post(auth_handler::register),
            Endpoint::TokenObtainPair => post(auth_handler::token_obtain_pair),
            Endpoint::TokenRefresh => post(auth_handler::token_refresh),
            Endpoint::UserProfile => {
                get(auth_handler::get_profile).patch(auth_handler::update_profile)
            }
        }
    }
}

/// (경로, 핸들러, 이름) 바인딩
pub const BINDINGS: [(&str, Endpoint, &str); 5] = [
    ("/ping/", Endpoint::Ping, names::PING),
    ("/register/", Endpoint::Register, names::REGISTER),
    ("/token/", Endpoint::TokenObtainPair, names::TOKEN_OBTAIN_PAIR),
    ("/token/refresh/", Endpoint::TokenRefresh, names::TOKEN_REFRESH),
    ("/users/me/", Endpoint::UserProfile, names::USER_PROFILE),
];

/// Build the route table
/// 라우트 테이블 생성 (시작 시 한 번)
pub fn route_table(trailing_slash: TrailingSlash) -> Result<RouteTable<Endpoint>, RouteError> {
    let mut table = RouteTable::new(trailing_slash);
    for (path, endpoint, name) in BINDINGS {
        table.register(path, endpoint, name)?;
    }
    Ok(table)
}

/// Create main router from the route table
/// 라우트 테이블로 메인 라우터 생성
pub fn create_router(routes: &RouteTable<Endpoint>) -> Router<AppState> {
    let mut router = Router::new();
    for route in routes.iter() {
        tracing::debug!(name = route.name(), path = route.path(), "route registered");
        router = router.route(route.path(), route.handler().method_router());
    }
    router.fallback(fallback)
}

/// 전체 애플리케이션 (라우터 + Swagger + CORS + 요청 로그)
/// Full application: routes, Swagger UI, CORS and request tracing
pub fn create_app(app_state: AppState, config: &AppConfig) -> Result<Router> {
    let origin = config
        .cors_allowed_origin
        .parse::<HeaderValue>()
        .context("Invalid CORS_ALLOWED_ORIGIN")?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true);

    let routes = Arc::clone(&app_state.routes);

    Ok(Router::new()
        .merge(create_router(&routes))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}

/// 매칭되지 않은 요청 처리: 트레일링 슬래시 리다이렉트 또는 404
/// Unmatched requests: trailing-slash redirect or 404
async fn fallback(State(app_state): State<AppState>, uri: Uri) -> Response {
    match app_state.routes.resolve(uri.path()) {
        Ok(Resolved::Redirect(canonical)) => {
            let location = match uri.query() {
                Some(query) => format!("{}?{}", canonical, query),
                None => canonical.to_string(),
            };
            tracing::debug!(from = uri.path(), to = %location, "trailing slash redirect");
            Redirect::permanent(&location).into_response()
        }
        Ok(Resolved::Handler(endpoint)) => {
            // 테이블과 라우터가 같은 바인딩에서 만들어지므로 도달하지 않음
            tracing::warn!(?endpoint, path = uri.path(), "route in table but not in router");
            not_found(uri.path())
        }
        Err(_) => not_found(uri.path()),
    }
}

fn not_found(path: &str) -> Response {
    let err = RouteError::NoMatch {
        path: path.to_string(),
    };
    (StatusCode::NOT_FOUND, Json(json!({ "error": err.to_string() }))).into_response()
}
