//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭을 수집하고 `/metrics` 엔드포인트로 노출합니다.
//! 수집 성공/실패 카운터(`scraper_requests_*_total`)는 스크래퍼
//! 계층에서 증가시키며 같은 레코더로 렌더링됩니다.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

/// Prometheus 메트릭 레코더를 설정하고 핸들을 반환합니다.
///
/// # 반환값
///
/// `/metrics` 엔드포인트에서 메트릭을 렌더링하기 위한 `PrometheusHandle`
///
/// # 패닉
///
/// 레코더가 이미 설치되어 있으면 패닉합니다.
pub fn setup_metrics_recorder() -> PrometheusHandle {
    PrometheusBuilder::new()
        // HTTP 요청 지속 시간 히스토그램 버킷 설정
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )
        .expect("히스토그램 버킷 설정 실패")
        .install_recorder()
        .expect("Prometheus 레코더 설치 실패")
}

// ============================================================================
// HTTP 메트릭 헬퍼 함수
// ============================================================================

/// HTTP 요청 카운터 증가.
pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string())
        .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, path: &str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, path: &str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

// ============================================================================
// 경로 정규화 유틸리티
// ============================================================================

/// 경로에서 동적 파라미터를 정규화합니다.
///
/// 심볼은 자유 형식("BTC-USD", "IBOV:INDEXBVMF" 등)이라 패턴으로
/// 식별할 수 없으므로, indicators 뒤의 세그먼트를 고정 경로
/// ("refresh", "stats")가 아니면 `:symbol`로 대체합니다.
///
/// 예: `/api/v1/indicators/BTC-USD` → `/api/v1/indicators/:symbol`
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let mut normalized: Vec<String> = Vec::with_capacity(segments.len());

    for (i, segment) in segments.iter().enumerate() {
        let follows_indicators = i > 0 && segments[i - 1] == "indicators";
        let is_symbol = follows_indicators && !matches!(*segment, "" | "refresh" | "stats");

        if is_symbol {
            normalized.push(":symbol".to_string());
        } else {
            normalized.push((*segment).to_string());
        }
    }

    normalized.join("/")
}
