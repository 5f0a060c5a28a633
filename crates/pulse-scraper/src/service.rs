//! 지표 수집 서비스.
//!
//! Fetcher를 감싸 재시도, 지수 백오프, 요청 간격을 적용합니다.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use pulse_core::{Indicator, ScraperConfig};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::error::Result;
use crate::provider::{FetchOutcome, IndicatorFetcher};

/// 수집 성공 카운터 메트릭 이름
pub const METRIC_FETCH_SUCCESS: &str = "scraper_requests_success_total";
/// 수집 실패 카운터 메트릭 이름
pub const METRIC_FETCH_FAILURE: &str = "scraper_requests_failure_total";

/// 갱신 계층이 소비하는 일괄 수집 인터페이스.
#[async_trait]
pub trait IndicatorSource: Send + Sync {
    /// 심볼 목록을 순차 수집해 성공한 지표만 반환합니다.
    async fn fetch_indicators(&self, symbols: &[String]) -> Result<Vec<Indicator>>;
}

/// 재시도와 요청 간격을 담당하는 수집 서비스.
///
/// 심볼당 최대 `max_retries`회 시도하며, 일시적 실패 시 대기 시간을
/// 2배씩 늘립니다. 대기 중 취소 신호를 받으면 즉시 중단합니다.
pub struct ScraperService {
    fetcher: Arc<dyn IndicatorFetcher>,
    config: ScraperConfig,
    cancel: CancellationToken,
}

impl ScraperService {
    pub fn new(
        fetcher: Arc<dyn IndicatorFetcher>,
        config: ScraperConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            fetcher,
            config,
            cancel,
        }
    }

    /// 심볼 하나를 재시도를 포함해 수집합니다.
    ///
    /// 성공하면 성공 카운터, 그 외(재시도 소진, 데이터 없음, 취소)에는
    /// 실패 카운터가 정확히 1회 증가합니다. 빈 심볼은 시도 없이
    /// 반환하며 카운터를 건드리지 않습니다.
    pub async fn fetch_one(&self, symbol: &str) -> Option<Indicator> {
        if symbol.trim().is_empty() {
            warn!("빈 심볼 수집 요청은 무시");
            return None;
        }

        let max_retries = self.config.max_retries;
        let mut backoff = Duration::from_millis(self.config.retry_backoff_ms);
        let mut attempts = 0u32;

        while attempts < max_retries {
            attempts += 1;

            match self.fetcher.fetch(symbol).await {
                FetchOutcome::Success(indicator) => {
                    counter!(METRIC_FETCH_SUCCESS).increment(1);
                    debug!(symbol, attempts, "지표 수집 성공");
                    return Some(indicator);
                }
                FetchOutcome::Empty => {
                    // 데이터 없음은 재시도해도 달라지지 않음
                    debug!(symbol, "수집할 데이터 없음");
                    break;
                }
                FetchOutcome::Transient(err) => {
                    warn!(
                        symbol,
                        attempts,
                        max_retries,
                        error = %err,
                        "수집 시도 실패"
                    );

                    if attempts < max_retries {
                        tokio::select! {
                            _ = self.cancel.cancelled() => {
                                warn!(symbol, "백오프 대기 중 취소됨");
                                break;
                            }
                            _ = tokio::time::sleep(backoff) => {}
                        }
                        backoff *= 2;
                    }
                }
            }
        }

        counter!(METRIC_FETCH_FAILURE).increment(1);
        error!(symbol, attempts, "지표 수집 실패");
        None
    }

    /// 여러 심볼을 순차 수집합니다. 입력 순서를 보존하며 성공만 모읍니다.
    ///
    /// 과도한 요청을 피하기 위해 심볼 사이에 `request_delay_ms`만큼
    /// 대기합니다 (마지막 심볼 뒤에는 대기하지 않음). 대기 중 취소되면
    /// 그때까지 모은 결과를 반환합니다.
    pub async fn fetch_many(&self, symbols: &[String]) -> Vec<Indicator> {
        let total = symbols.len();
        let delay = Duration::from_millis(self.config.request_delay_ms);
        let mut results = Vec::new();

        for (i, symbol) in symbols.iter().enumerate() {
            if let Some(indicator) = self.fetch_one(symbol).await {
                results.push(indicator);
            }

            if i + 1 < total {
                tokio::select! {
                    _ = self.cancel.cancelled() => {
                        warn!(collected = results.len(), "요청 간 대기 중 취소됨, 일괄 수집 중단");
                        break;
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        debug!(collected = results.len(), total, "일괄 수집 완료");
        results
    }
}

#[async_trait]
impl IndicatorSource for ScraperService {
    async fn fetch_indicators(&self, symbols: &[String]) -> Result<Vec<Indicator>> {
        Ok(self.fetch_many(symbols).await)
    }
}
