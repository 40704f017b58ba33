use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = PingResponse)]
pub struct PingResponse {
    #[schema(example = "pong")]
    pub message: String,
}

/// 헬스 체크 (부작용 없음)
/// Liveness check with a fixed body
#[utoipa::path(
    get,
    path = "/ping/",
    responses(
        (status = 200, description = "Service is alive", body = PingResponse)
    ),
    tag = "Health"
)]
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "pong".to_string(),
    })
}
