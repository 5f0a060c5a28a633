//! 지표 조회 endpoint.
//!
//! 캐시에 저장된 시장 지표를 조회하고 수동 갱신을 트리거합니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/indicators` - 전체 지표 목록
//! - `GET /api/v1/indicators/{symbol}` - 심볼로 단건 조회
//! - `POST /api/v1/indicators/refresh` - 수동 갱신 트리거
//! - `GET /api/v1/indicators/stats` - 캐시 통계

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use pulse_core::Indicator;
use pulse_scraper::RefreshOutcome;

use crate::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;

// ==================== 응답 타입 ====================

/// 수동 갱신 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// 처리 상태 ("OK" | "SKIPPED" | "DISABLED")
    pub status: String,

    /// 설명 메시지
    pub message: String,

    /// 응답 시점의 캐시 항목 수
    pub cache_size: usize,
}

/// 캐시 통계 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// 캐시 항목 수 (만료됐지만 아직 제거되지 않은 항목 포함)
    pub cache_size: usize,

    /// 캐시된 심볼 목록
    pub indicators: Vec<String>,
}

// ==================== API 핸들러 ====================

/// 전체 지표 목록 조회
///
/// 캐시된 지표를 모두 반환합니다. 캐시가 비어 있으면 샘플 데이터를
/// 적재한 뒤 반환해 항상 형태가 올바른 목록을 돌려줍니다.
#[utoipa::path(
    get,
    path = "/api/v1/indicators",
    responses(
        (status = 200, description = "지표 목록", body = Vec<Indicator>)
    ),
    tag = "indicators"
)]
pub async fn list_indicators(State(state): State<Arc<AppState>>) -> Json<Vec<Indicator>> {
    let mut indicators = state.cache.get_all().await;

    if indicators.is_empty() {
        info!("캐시가 비어 있어 샘플 데이터 적재");
        state.refresher.load_fallback().await;
        indicators = state.cache.get_all().await;
    }

    Json(indicators)
}

/// 심볼로 지표 조회
///
/// 대소문자를 구분하지 않습니다.
#[utoipa::path(
    get,
    path = "/api/v1/indicators/{symbol}",
    params(
        ("symbol" = String, Path, description = "지표 심볼 (예: IBOV, USD-BRL, BTC-USD)")
    ),
    responses(
        (status = 200, description = "지표 조회 성공", body = Indicator),
        (status = 404, description = "지표 없음", body = ApiErrorResponse)
    ),
    tag = "indicators"
)]
pub async fn get_indicator(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<Indicator>> {
    match state.cache.get(&symbol).await {
        Some(indicator) => Ok(Json(indicator)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ApiErrorResponse::with_details(
                "NOT_FOUND",
                format!("Indicator not found: {}", symbol),
                serde_json::json!({ "symbol": symbol }),
            )),
        )),
    }
}

/// 수동 갱신 트리거
///
/// 주기 갱신과 같은 절차를 즉시 실행합니다. 이미 갱신이 진행 중이면
/// 기다리지 않고 SKIPPED로 응답합니다.
#[utoipa::path(
    post,
    path = "/api/v1/indicators/refresh",
    responses(
        (status = 200, description = "갱신 결과", body = RefreshResponse)
    ),
    tag = "indicators"
)]
pub async fn refresh_indicators(State(state): State<Arc<AppState>>) -> Json<RefreshResponse> {
    let outcome = state.refresher.refresh().await;
    let cache_size = state.cache.len().await;

    let (status, message) = match outcome {
        RefreshOutcome::Completed { .. } => ("OK", "Refresh triggered successfully"),
        RefreshOutcome::AlreadyRunning => ("SKIPPED", "Refresh already in progress"),
        RefreshOutcome::Disabled => ("DISABLED", "Scraper is disabled"),
    };

    Json(RefreshResponse {
        status: status.to_string(),
        message: message.to_string(),
        cache_size,
    })
}

/// 캐시 통계 조회
#[utoipa::path(
    get,
    path = "/api/v1/indicators/stats",
    responses(
        (status = 200, description = "캐시 통계", body = StatsResponse)
    ),
    tag = "indicators"
)]
pub async fn get_cache_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    // 물리적 항목 수를 먼저 읽는다. 목록 열람이 만료 항목을 제거하므로
    // 순서를 바꾸면 두 값이 항상 일치해 버린다.
    let cache_size = state.cache.len().await;
    let indicators = state
        .cache
        .get_all()
        .await
        .into_iter()
        .map(|indicator| indicator.symbol)
        .collect();

    Json(StatsResponse {
        cache_size,
        indicators,
    })
}

// ==================== 라우터 ====================

/// 지표 API 라우터 생성.
pub fn indicators_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_indicators))
        .route("/refresh", post(refresh_indicators))
        .route("/stats", get(get_cache_stats))
        .route("/{symbol}", get(get_indicator))
}
