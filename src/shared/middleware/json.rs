use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use crate::shared::errors::AuthError;

/// JSON 요청 본문 (파싱 실패 시 AuthError로 거부)
/// JSON request body whose rejection is an `AuthError`, so malformed
/// payloads get the same `{"error", "fields"}` body as validation failures
///
/// 사용법:
/// ```ignore
/// pub async fn token_refresh(
///     State(app_state): State<AppState>,
///     JsonBody(request): JsonBody<TokenRefreshRequest>,
/// ) -> Result<...> {
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}
