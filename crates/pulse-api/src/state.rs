//! 애플리케이션 공유 상태.
//!
//! 모든 핸들러가 공유하는 캐시와 갱신 서비스 핸들을 보관합니다.

use std::sync::Arc;

use pulse_scraper::{IndicatorCache, RefreshService};

/// 애플리케이션 공유 상태.
///
/// `Arc<AppState>`로 감싸 라우터 전체에 공유됩니다.
pub struct AppState {
    /// 지표 캐시
    pub cache: Arc<IndicatorCache>,
    /// 갱신 오케스트레이터 (수동 트리거/폴백 적재용)
    pub refresher: Arc<RefreshService>,
    /// 스크래퍼 활성화 여부 (헬스 체크 표시용)
    pub scraper_enabled: bool,
    /// 서버 시작 시각
    pub started_at: chrono::DateTime<chrono::Utc>,
    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새 애플리케이션 상태를 생성합니다.
    pub fn new(
        cache: Arc<IndicatorCache>,
        refresher: Arc<RefreshService>,
        scraper_enabled: bool,
    ) -> Self {
        Self {
            cache,
            refresher,
            scraper_enabled,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use test_support::{create_test_state, create_test_state_with};

#[cfg(any(test, feature = "test-utils"))]
mod test_support {
    use super::*;
    use std::time::Duration;

    use pulse_core::{Indicator, ScraperConfig};
    use pulse_scraper::{IndicatorSource, Result};

    /// 아무것도 수집하지 않는 Source.
    ///
    /// 수동 갱신 시 항상 빈 결과를 반환해 샘플 데이터 폴백 경로를
    /// 결정적으로 태웁니다.
    struct NullSource;

    #[async_trait::async_trait]
    impl IndicatorSource for NullSource {
        async fn fetch_indicators(&self, _symbols: &[String]) -> Result<Vec<Indicator>> {
            Ok(Vec::new())
        }
    }

    /// 기본 설정의 테스트용 상태를 생성합니다.
    pub fn create_test_state() -> AppState {
        create_test_state_with(ScraperConfig::default())
    }

    /// 지정한 스크래퍼 설정으로 테스트용 상태를 생성합니다.
    pub fn create_test_state_with(config: ScraperConfig) -> AppState {
        let cache = Arc::new(IndicatorCache::new(Duration::from_secs(
            config.cache_ttl_secs,
        )));
        let refresher = Arc::new(RefreshService::new(
            Arc::new(NullSource),
            cache.clone(),
            config.clone(),
        ));

        AppState::new(cache, refresher, config.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uptime_is_non_negative() {
        let state = create_test_state();
        assert!(state.uptime_secs() >= 0);
        assert_eq!(state.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_test_state_starts_with_empty_cache() {
        let state = create_test_state();
        assert_eq!(state.cache.len().await, 0);
        assert!(state.scraper_enabled);
    }
}
