//! MarketPulse API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 지표 조회/갱신, 캐시 통계, 헬스 체크 엔드포인트를 제공하고
//! 백그라운드에서 주기 수집 태스크를 돌립니다.

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use pulse_api::metrics::setup_metrics_recorder;
use pulse_api::middleware::metrics_layer;
use pulse_api::openapi::swagger_ui_router;
use pulse_api::routes::create_api_router;
use pulse_api::state::AppState;
use pulse_core::{init_logging_from_env, AppConfig};
use pulse_scraper::{GoogleFinanceFetcher, IndicatorCache, RefreshService, ScraperService};

/// CORS 미들웨어 구성.
///
/// CORS_ORIGINS 환경변수가 설정되어 있으면 해당 origin만 허용합니다.
/// 설정되지 않으면 개발 모드로 간주하여 모든 origin을 허용합니다.
///
/// # 환경변수
///
/// - `CORS_ORIGINS`: 쉼표로 구분된 허용 origin 목록
///   예: `https://dashboard.example.com,https://admin.example.com`
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            // 프로덕션: 특정 origin만 허용
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            // 개발: 모든 origin 허용
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        // 허용되는 HTTP 메서드
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        // 허용되는 헤더
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        // 자격 증명 포함 허용 (CORS_ORIGINS 설정 시에만)
        .allow_credentials(std::env::var("CORS_ORIGINS").is_ok())
        // preflight 요청 캐시 시간
        .max_age(Duration::from_secs(3600))
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> String {
    handle.render()
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    // 메트릭 라우터 (별도 상태)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    // 전체 라우터 조합
    Router::new()
        .merge(metrics_router)
        .merge(create_api_router().with_state(state))
        // OpenAPI 문서 및 Swagger UI
        .merge(swagger_ui_router())
        // 메트릭 미들웨어 (모든 요청에 적용)
        .layer(middleware::from_fn(metrics_layer))
        // 기타 미들웨어
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer())
}

/// OpenAPI 스펙 내보내기 처리.
///
/// `--export-openapi` 플래그 또는 `EXPORT_OPENAPI` 환경변수가 설정된 경우
/// OpenAPI JSON 스펙을 stdout으로 출력하고 종료합니다.
fn handle_export_openapi() -> Result<(), Box<dyn std::error::Error>> {
    use pulse_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    // 명령줄 인자에서 --export-openapi 플래그 확인
    let export_flag = std::env::args().any(|arg| arg == "--export-openapi");

    // 환경변수 EXPORT_OPENAPI 확인
    let export_env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    if export_flag || export_env {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec)?;
        println!("{}", json);
        std::process::exit(0);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // OpenAPI 내보내기 처리 (서버 시작 전)
    handle_export_openapi()?;

    // tracing 초기화
    init_logging_from_env()?;

    info!("Starting MarketPulse API server...");

    // Prometheus 메트릭 레코더 설정
    let metrics_handle = setup_metrics_recorder();
    info!("Prometheus metrics recorder initialized");

    // 설정 로드
    let config = AppConfig::load_default().map_err(|e| {
        error!(
            error = %e,
            "설정 로드에 실패했습니다. config/default.toml과 PULSE 환경변수를 확인하세요."
        );
        e
    })?;

    let addr = config.server.socket_addr().map_err(|e| {
        error!(
            host = %config.server.host,
            port = config.server.port,
            error = %e,
            "소켓 주소 설정이 유효하지 않습니다. PULSE__SERVER__HOST, PULSE__SERVER__PORT를 확인하세요."
        );
        e
    })?;

    // 전역 종료 토큰 생성 (graceful shutdown용, 백그라운드 태스크에서 사용)
    let shutdown_token = CancellationToken::new();

    // 수집 파이프라인 구성: Fetcher -> ScraperService -> RefreshService -> Cache
    let fetcher = Arc::new(GoogleFinanceFetcher::new(&config.scraper)?);
    let scraper = Arc::new(ScraperService::new(
        fetcher,
        config.scraper.clone(),
        shutdown_token.clone(),
    ));
    let cache = Arc::new(IndicatorCache::new(Duration::from_secs(
        config.scraper.cache_ttl_secs,
    )));
    let refresher = Arc::new(RefreshService::new(
        scraper,
        cache.clone(),
        config.scraper.clone(),
    ));

    // 주기 갱신 백그라운드 태스크 시작
    let refresh_task = {
        let refresher = refresher.clone();
        let token = shutdown_token.clone();
        tokio::spawn(async move { refresher.run(token).await })
    };

    let state = Arc::new(AppState::new(cache, refresher, config.scraper.enabled));

    info!(
        version = %state.version,
        scraper_enabled = state.scraper_enabled,
        refresh_interval_secs = config.scraper.refresh_interval_secs,
        cache_ttl_secs = config.scraper.cache_ttl_secs,
        "Application state initialized"
    );

    // 라우터 생성
    let app = create_router(state, metrics_handle);

    // 서버 시작
    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);
    info!("Metrics available at http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let shutdown_token_for_signal = shutdown_token.clone();

    // Graceful shutdown 처리 (타임아웃 포함)
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token_for_signal))
        .await?;

    // 종료 시그널 받은 후 정리 작업
    info!("Server shutdown initiated, cleaning up...");

    // 종료 토큰 취소 (백그라운드 태스크에 종료 시그널 전파)
    shutdown_token.cancel();

    // 갱신 태스크 종료에 최대 10초 대기
    match tokio::time::timeout(Duration::from_secs(10), refresh_task).await {
        Ok(_) => info!("Refresh task stopped"),
        Err(_) => warn!("Refresh task shutdown timeout, forcing exit"),
    }

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소합니다.
///
/// # Arguments
/// * `shutdown_token` - 백그라운드 태스크에 종료를 전파할 CancellationToken
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    // 모든 백그라운드 태스크에 종료 시그널 전파
    shutdown_token.cancel();
    info!("Shutdown signal propagated to background tasks");
}
