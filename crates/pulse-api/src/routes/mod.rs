//! API 라우트 모듈.
//!
//! # 라우트 구성
//!
//! - `/health` - 생존 확인
//! - `/health/ready` - 컴포넌트별 상세 상태
//! - `/api/v1/indicators` - 지표 목록 조회
//! - `/api/v1/indicators/{symbol}` - 지표 단건 조회
//! - `/api/v1/indicators/refresh` - 수동 갱신 트리거
//! - `/api/v1/indicators/stats` - 캐시 통계
//!
//! `/metrics`와 `/swagger-ui`는 main에서 최상위 라우터에 직접 올립니다.

pub mod health;
pub mod indicators;

pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use indicators::{indicators_router, RefreshResponse, StatsResponse};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/v1/indicators", indicators_router())
}
