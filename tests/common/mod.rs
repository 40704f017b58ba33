// =====================================================
// 통합 테스트 공통 헬퍼
// =====================================================
// 목적: 인메모리 저장소 위에 실제 라우터를 구성하고 요청을 보냄
//
// 사용법:
// ```rust
// mod common;
// use common::*;
//
// #[tokio::test]
// async fn test_something() {
//     let app = test_app();
//     let (status, _, body) = send(&app, Method::GET, "/ping/", None, None).await;
// }
// ```
// =====================================================
#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use user_auth_api::routes::create_app;
use user_auth_api::shared::config::AppConfig;
use user_auth_api::shared::database::AuthRepositories;
use user_auth_api::shared::services::AppState;

pub const TEST_PASSWORD: &str = "password123";

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: "integration-test-secret".to_string(),
        ..AppConfig::default()
    }
}

/// 기본 설정으로 앱 생성
pub fn test_app() -> Router {
    app_with(test_config())
}

/// 설정을 바꿔서 앱 생성
pub fn app_with(config: AppConfig) -> Router {
    let state = AppState::new(AuthRepositories::in_memory(), &config).expect("route table");
    create_app(state, &config).expect("app")
}

/// 요청 전송 후 (상태 코드, 헤더, JSON 본문) 반환
/// 본문이 JSON이 아니면 Value::Null
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    bearer: Option<&str>,
) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, headers, json)
}

/// 임의의 본문과 Content-Type으로 POST (잘못된 JSON 전송용)
pub async fn post_raw(
    app: &Router,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

pub fn registration(username: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "password": TEST_PASSWORD,
        "password2": TEST_PASSWORD,
        "first_name": "Test",
        "last_name": "User",
    })
}

/// 회원가입 후 응답 본문 반환
pub async fn register(app: &Router, username: &str) -> Value {
    let (status, _, body) =
        send(app, Method::POST, "/register/", Some(registration(username)), None).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body
}

/// 로그인 후 (access, refresh) 반환
pub async fn login(app: &Router, username: &str) -> (String, String) {
    let (status, _, body) = send(
        app,
        Method::POST,
        "/token/",
        Some(json!({ "username": username, "password": TEST_PASSWORD })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);

    (
        body["access"].as_str().unwrap().to_string(),
        body["refresh"].as_str().unwrap().to_string(),
    )
}
