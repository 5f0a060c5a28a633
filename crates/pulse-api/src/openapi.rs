//! OpenAPI 문서 정의.
//!
//! utoipa로 API 문서를 생성하고 Swagger UI를 제공합니다.
//!
//! - Swagger UI: `/swagger-ui`
//! - OpenAPI JSON: `/api-docs/openapi.json`

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pulse_core::{Currency, Indicator};

use crate::error::ApiErrorResponse;
use crate::routes::health::{ComponentHealth, ComponentStatus, HealthResponse};
use crate::routes::indicators::{RefreshResponse, StatsResponse};

/// OpenAPI 문서 루트.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "MarketPulse API",
        version = "0.1.0",
        description = r#"시장 지표 수집 서버 REST API

## 주요 기능
- 지표 조회: 캐시된 시장 지표(지수, 환율, 암호화폐 등) 목록과 단건 조회
- 수동 갱신: 주기 수집을 기다리지 않고 즉시 갱신 트리거
- 캐시 통계: 캐시 항목 수와 심볼 목록 확인
- 헬스 체크: 생존 확인과 컴포넌트별 상세 상태

## 인증
현재 버전은 인증을 요구하지 않습니다."#,
        license(name = "MIT"),
        contact(name = "MarketPulse Team", url = "https://github.com/user/marketpulse")
    ),
    servers(
        (url = "http://localhost:8080", description = "로컬 개발 서버")
    ),
    tags(
        (name = "health", description = "헬스 체크 API"),
        (name = "indicators", description = "시장 지표 조회/갱신 API")
    ),
    components(schemas(
        HealthResponse,
        ComponentHealth,
        ComponentStatus,
        ApiErrorResponse,
        Indicator,
        Currency,
        RefreshResponse,
        StatsResponse
    )),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::indicators::list_indicators,
        crate::routes::indicators::get_indicator,
        crate::routes::indicators::refresh_indicators,
        crate::routes::indicators::get_cache_stats
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// 상태 타입에 무관하게 어느 라우터에도 merge할 수 있습니다.
pub fn swagger_ui_router<S>() -> axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generation() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();

        assert!(json.contains("MarketPulse API"));
        assert!(json.contains("0.1.0"));
        assert!(json.contains("health"));
        assert!(json.contains("indicators"));
    }

    #[test]
    fn test_openapi_spec_contains_paths() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();

        assert!(json.contains("/health"));
        assert!(json.contains("/health/ready"));
        assert!(json.contains("/api/v1/indicators"));
        assert!(json.contains("/api/v1/indicators/refresh"));
        assert!(json.contains("/api/v1/indicators/stats"));
        assert!(json.contains("/api/v1/indicators/{symbol}"));
    }

    #[test]
    fn test_openapi_spec_contains_schemas() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();

        assert!(json.contains("Indicator"));
        assert!(json.contains("RefreshResponse"));
        assert!(json.contains("StatsResponse"));
        assert!(json.contains("ApiErrorResponse"));
        assert!(json.contains("HealthResponse"));
    }

    #[test]
    fn test_swagger_ui_router_creation() {
        let _router: axum::Router<()> = swagger_ui_router();
    }
}
