//! 헬스 체크 endpoint.
//!
//! 서버 상태 확인을 위한 헬스 체크 엔드포인트를 제공합니다.
//! 로드밸런서나 오케스트레이션 시스템(Kubernetes 등)에서 사용됩니다.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

/// 헬스 체크 응답 구조체.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// 전체 서비스 상태 ("healthy" | "degraded" | "unhealthy")
    pub status: String,

    /// API 버전
    pub version: String,

    /// 서버 업타임(초)
    pub uptime_secs: i64,

    /// 현재 시간 (ISO 8601)
    pub timestamp: String,

    /// 개별 컴포넌트 상태
    pub components: ComponentHealth,
}

/// 개별 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    /// 지표 캐시 상태
    pub cache: ComponentStatus,

    /// 스크래퍼 상태
    pub scraper: ComponentStatus,
}

/// 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// 상태 ("up" | "down" | "not_configured")
    pub status: String,

    /// 추가 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    /// 정상 상태.
    pub fn up() -> Self {
        Self {
            status: "up".to_string(),
            message: None,
        }
    }

    /// 비정상 상태.
    pub fn down(message: impl Into<String>) -> Self {
        Self {
            status: "down".to_string(),
            message: Some(message.into()),
        }
    }

    /// 미설정 상태.
    pub fn not_configured() -> Self {
        Self {
            status: "not_configured".to_string(),
            message: None,
        }
    }

    /// 정보 포함 정상 상태.
    pub fn up_with_info(message: impl Into<String>) -> Self {
        Self {
            status: "up".to_string(),
            message: Some(message.into()),
        }
    }
}

/// 간단한 헬스 체크 (liveness probe용).
///
/// 서버가 응답 가능한 상태인지만 확인합니다.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "서버 정상")
    ),
    tag = "health"
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// 상세 헬스 체크 (readiness probe용).
///
/// 캐시와 스크래퍼의 상태를 확인합니다.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "상세 상태", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut overall_status = "healthy";

    // 캐시는 메모리 내장이라 항상 사용 가능
    let cache_status =
        ComponentStatus::up_with_info(format!("{} entries", state.cache.len().await));

    // 스크래퍼 상태 확인
    let scraper_status = if state.scraper_enabled {
        if state.refresher.is_loop_active() {
            ComponentStatus::up()
        } else {
            // 루프 중단은 degraded로 처리 (캐시/샘플 응답은 계속 가능)
            overall_status = "degraded";
            ComponentStatus::down("갱신 루프 중단")
        }
    } else {
        ComponentStatus::not_configured()
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        components: ComponentHealth {
            cache: cache_status,
            scraper: scraper_status,
        },
    };

    (StatusCode::OK, Json(response))
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(health_ready))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_check_returns_ok() {
        let app = Router::new().route("/health", get(health_check));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready_returns_json() {
        use crate::state::create_test_state;
        use tokio_util::sync::CancellationToken;

        let state = Arc::new(create_test_state());
        let cancel = CancellationToken::new();
        let loop_task = tokio::spawn({
            let refresher = state.refresher.clone();
            let cancel = cancel.clone();
            async move { refresher.run(cancel).await }
        });
        // 갱신 루프가 시작될 때까지 양보
        tokio::task::yield_now().await;

        let app = Router::new()
            .route("/health/ready", get(health_ready))
            .with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(health.status, "healthy");
        assert!(!health.version.is_empty());
        assert_eq!(health.components.scraper.status, "up");
        assert_eq!(health.components.cache.status, "up");

        cancel.cancel();
        loop_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_health_ready_reports_stopped_refresh_loop() {
        use crate::state::create_test_state;

        // 갱신 루프를 시작하지 않은 상태
        let state = Arc::new(create_test_state());
        let app = Router::new()
            .route("/health/ready", get(health_ready))
            .with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(health.status, "degraded");
        assert_eq!(health.components.scraper.status, "down");
        assert!(health.components.scraper.message.is_some());
    }

    #[tokio::test]
    async fn test_health_ready_reports_disabled_scraper() {
        use crate::state::create_test_state_with;
        use pulse_core::ScraperConfig;

        let state = Arc::new(create_test_state_with(ScraperConfig {
            enabled: false,
            ..ScraperConfig::default()
        }));
        let app = Router::new()
            .route("/health/ready", get(health_ready))
            .with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();

        // 미설정은 실패가 아니므로 전체 상태는 healthy 유지
        assert_eq!(health.status, "healthy");
        assert_eq!(health.components.scraper.status, "not_configured");
    }

    #[test]
    fn test_component_status_variants() {
        let up = ComponentStatus::up();
        assert_eq!(up.status, "up");
        assert!(up.message.is_none());

        let down = ComponentStatus::down("error");
        assert_eq!(down.status, "down");
        assert_eq!(down.message, Some("error".to_string()));

        let not_configured = ComponentStatus::not_configured();
        assert_eq!(not_configured.status, "not_configured");
    }
}
