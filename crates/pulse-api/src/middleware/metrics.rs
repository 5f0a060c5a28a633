//! HTTP 요청 metrics middleware.
//!
//! 모든 HTTP 요청에 대해 메트릭을 수집합니다.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::metrics::{
    normalize_path, record_http_duration, record_http_request, record_http_response,
};

/// HTTP 메트릭을 수집하는 미들웨어 레이어.
///
/// 각 요청에 대해 다음 메트릭을 기록합니다:
/// - `http_requests_total`: 총 요청 수 (method, path 라벨)
/// - `http_responses_total`: 총 응답 수 (method, path, status 라벨)
/// - `http_request_duration_seconds`: 요청 처리 시간 히스토그램
///
/// 경로의 심볼 세그먼트는 `:symbol`로 정규화해 라벨 수를 제한합니다.
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    record_http_request(&method, &path);

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_response(&method, &path, status);
    record_http_duration(&method, &path, duration);

    response
}
