//! 주기 갱신 오케스트레이터.
//!
//! 수집 → 캐시 저장을 한 절차로 묶고, 타이머와 수동 트리거가 같은
//! 절차를 공유합니다. 이미 갱신이 진행 중이면 대기하지 않고
//! 건너뜁니다.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pulse_core::ScraperConfig;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::cache::IndicatorCache;
use crate::sample::sample_indicators;
use crate::service::IndicatorSource;

/// 기본 수집 심볼 목록
const DEFAULT_SYMBOLS: [&str; 5] = [
    "IBOV:INDEXBVMF",
    "USD/BRL",
    "EUR/BRL",
    "BTC/USD",
    "ETH/USD",
];

/// 갱신 1회의 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// 갱신 완료 (캐시에 저장한 지표 수)
    Completed { stored: usize },
    /// 다른 갱신이 진행 중이라 건너뜀
    AlreadyRunning,
    /// 스크래퍼 비활성화 상태
    Disabled,
}

/// 수집과 캐시 갱신을 묶는 오케스트레이터.
pub struct RefreshService {
    source: Arc<dyn IndicatorSource>,
    cache: Arc<IndicatorCache>,
    config: ScraperConfig,
    refresh_lock: Mutex<()>,
    loop_active: AtomicBool,
}

impl RefreshService {
    pub fn new(
        source: Arc<dyn IndicatorSource>,
        cache: Arc<IndicatorCache>,
        config: ScraperConfig,
    ) -> Self {
        Self {
            source,
            cache,
            config,
            refresh_lock: Mutex::new(()),
            loop_active: AtomicBool::new(false),
        }
    }

    /// 갱신 절차를 1회 실행합니다.
    ///
    /// 수집 결과가 비어 있거나 수집 단계가 실패하면 샘플 데이터로
    /// 캐시를 채워, 갱신을 시도한 뒤 캐시가 비어 있는 일이 없게
    /// 합니다.
    pub async fn refresh(&self) -> RefreshOutcome {
        if !self.config.enabled {
            debug!("스크래퍼 비활성화 상태, 갱신 건너뜀");
            return RefreshOutcome::Disabled;
        }

        // 진행 중이면 대기하지 않고 건너뜀
        let Ok(_guard) = self.refresh_lock.try_lock() else {
            info!("갱신이 이미 진행 중, 이번 트리거는 건너뜀");
            return RefreshOutcome::AlreadyRunning;
        };

        let symbols = self.target_symbols();
        info!(count = symbols.len(), "지표 갱신 시작");

        match self.source.fetch_indicators(&symbols).await {
            Ok(indicators) if indicators.is_empty() => {
                warn!("수집된 지표가 없음, 샘플 데이터로 대체");
                self.load_fallback().await
            }
            Ok(indicators) => {
                let stored = indicators.len();
                for indicator in indicators {
                    self.cache.put(indicator).await;
                }
                info!(stored, "지표 갱신 완료");
                RefreshOutcome::Completed { stored }
            }
            Err(err) => {
                error!(error = %err, "갱신 중 수집 실패, 샘플 데이터로 대체");
                self.load_fallback().await
            }
        }
    }

    /// 샘플 데이터를 캐시에 적재합니다.
    pub async fn load_fallback(&self) -> RefreshOutcome {
        let samples = sample_indicators();
        let stored = samples.len();
        for indicator in samples {
            self.cache.put(indicator).await;
        }
        info!(stored, "샘플 데이터 적재 완료");
        RefreshOutcome::Completed { stored }
    }

    /// 수집 대상 심볼 목록을 결정합니다.
    ///
    /// 설정된 목록이 있으면 그대로, 명시적으로 빈 목록이면
    /// `defaults_on_empty_symbols` 설정에 따라 기본 목록 또는 빈
    /// 목록, 미설정이면 기본 목록입니다.
    fn target_symbols(&self) -> Vec<String> {
        match &self.config.symbols {
            Some(list) if !list.is_empty() => list.clone(),
            Some(_) if self.config.defaults_on_empty_symbols => default_symbols(),
            Some(_) => Vec::new(),
            None => default_symbols(),
        }
    }

    /// `run()`이 현재 실행 중인지 여부. 헬스 체크가 조회합니다.
    pub fn is_loop_active(&self) -> bool {
        self.loop_active.load(Ordering::SeqCst)
    }

    /// 주기 갱신 루프를 실행합니다. 취소될 때까지 반환하지 않습니다.
    ///
    /// `startup_load`가 켜져 있으면 루프 시작 전에 샘플 데이터를
    /// 적재해 첫 갱신 전에도 API가 데이터를 반환하게 합니다. 이
    /// 초기 적재는 스크래퍼 활성화 여부와 무관하게 동작합니다.
    /// 실행 중에는 `is_loop_active`가 true를 반환합니다.
    pub async fn run(&self, cancel: CancellationToken) {
        self.loop_active.store(true, Ordering::SeqCst);
        let _active = LoopActiveGuard(&self.loop_active);

        if self.config.startup_load {
            info!("시작 시 초기 데이터 적재");
            self.load_fallback().await;
        }

        if !self.config.enabled {
            info!("스크래퍼 비활성화 상태, 주기 갱신을 시작하지 않음");
            return;
        }

        let period = Duration::from_secs(self.config.refresh_interval_secs);
        let mut ticker = tokio::time::interval(period);
        // 갱신이 주기보다 오래 걸리면 밀린 틱은 건너뜀
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // interval의 첫 틱은 즉시 발생하므로 소비하고 시작
        ticker.tick().await;

        info!(
            period_secs = self.config.refresh_interval_secs,
            "주기 갱신 루프 시작"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("주기 갱신 루프 종료");
                    break;
                }
                _ = ticker.tick() => {
                    self.refresh().await;
                }
            }
        }
    }
}

/// `run()`이 어떤 경로로 끝나든 루프 실행 플래그를 내리는 가드.
struct LoopActiveGuard<'a>(&'a AtomicBool);

impl Drop for LoopActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// 기본 심볼 목록을 반환합니다.
pub fn default_symbols() -> Vec<String> {
    DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
}
