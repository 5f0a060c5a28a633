//! # Pulse API
//!
//! MarketPulse REST API 서버 crate.
//!
//! Axum 기반 HTTP 서버로 캐시된 시장 지표를 노출합니다.
//!
//! ## 모듈 구성
//!
//! - `routes` - 지표 조회/갱신 및 헬스 체크 핸들러
//! - `state` - 핸들러가 공유하는 애플리케이션 상태
//! - `error` - API 오류 응답 타입
//! - `metrics` - Prometheus 메트릭 레코더와 기록 헬퍼
//! - `middleware` - HTTP 요청 계측 미들웨어
//! - `openapi` - OpenAPI 문서와 Swagger UI

pub mod error;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use error::{ApiErrorResponse, ApiResult};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use routes::*;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::{create_test_state, create_test_state_with};
