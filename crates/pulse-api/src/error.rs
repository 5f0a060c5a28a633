//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Indicator not found: GOLD",
///   "details": { "symbol": "GOLD" },
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "NOT_FOUND", "INVALID_INPUT")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 Result 타입 별칭.
///
/// # Example
///
/// ```ignore
/// async fn get_indicator(
///     Path(symbol): Path<String>,
///     State(state): State<Arc<AppState>>,
/// ) -> ApiResult<Json<Indicator>> {
///     let indicator = state.cache.get(&symbol).await.ok_or_else(|| {
///         (
///             StatusCode::NOT_FOUND,
///             Json(ApiErrorResponse::new("NOT_FOUND", format!("Indicator not found: {}", symbol))),
///         )
///     })?;
///
///     Ok(Json(indicator))
/// }
/// ```
pub type ApiResult<T> = Result<T, (axum::http::StatusCode, axum::Json<ApiErrorResponse>)>;
