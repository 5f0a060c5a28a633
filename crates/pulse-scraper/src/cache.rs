//! 지표 TTL 캐시.
//!
//! 심볼별 최신 지표를 만료 시간과 함께 메모리에 보관합니다.
//! 만료된 항목은 단건 조회 시 지연 제거되고, 전체 열람 시 일괄
//! 제거됩니다.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Duration;

use pulse_core::Indicator;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// 저장 시각이 붙은 캐시 항목.
struct CacheEntry {
    indicator: Indicator,
    cached_at: Instant,
}

/// 만료 시간이 있는 메모리 지표 캐시.
///
/// 키는 심볼을 대문자로 정규화한 값입니다. 모든 연산은 내부 락으로
/// 동기화되어 여러 태스크에서 동시에 호출해도 안전합니다.
/// `len()`은 만료됐지만 아직 제거되지 않은 항목을 포함한 물리적
/// 개수를 반환합니다.
pub struct IndicatorCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl IndicatorCache {
    /// 지정한 TTL로 빈 캐시를 생성합니다.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// 지표를 저장합니다. 같은 심볼의 기존 항목은 교체되고 수명이
    /// 새로 시작됩니다.
    ///
    /// 심볼이 빈 문자열이면 저장하지 않습니다.
    pub async fn put(&self, indicator: Indicator) {
        if indicator.symbol.is_empty() {
            warn!("심볼 없는 지표는 캐시하지 않음");
            return;
        }

        let key = indicator.symbol.to_uppercase();
        self.entries.write().await.insert(
            key,
            CacheEntry {
                indicator,
                cached_at: Instant::now(),
            },
        );
    }

    /// 심볼로 지표를 조회합니다. 대소문자를 구분하지 않습니다.
    ///
    /// 만료된 항목은 조회 시점에 제거하고 None을 반환합니다.
    pub async fn get(&self, symbol: &str) -> Option<Indicator> {
        let key = symbol.to_uppercase();
        let mut entries = self.entries.write().await;

        match entries.entry(key) {
            Entry::Occupied(occupied) => {
                if occupied.get().cached_at.elapsed() > self.ttl {
                    debug!(symbol = %occupied.key(), "만료된 캐시 항목 제거");
                    occupied.remove();
                    None
                } else {
                    Some(occupied.get().indicator.clone())
                }
            }
            Entry::Vacant(_) => None,
        }
    }

    /// 만료 항목을 일괄 제거한 뒤 남아 있는 지표를 반환합니다.
    ///
    /// 반환 순서는 보장하지 않습니다.
    pub async fn get_all(&self) -> Vec<Indicator> {
        let mut entries = self.entries.write().await;

        let before = entries.len();
        entries.retain(|_, entry| entry.cached_at.elapsed() <= self.ttl);
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted, "만료된 캐시 항목 일괄 제거");
        }

        entries
            .values()
            .map(|entry| entry.indicator.clone())
            .collect()
    }

    /// 모든 항목을 제거합니다.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
        info!("지표 캐시 비움");
    }

    /// 물리적으로 저장된 항목 수. 만료됐지만 제거 전인 항목도 셉니다.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// 캐시가 비어 있는지 여부.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::Currency;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn indicator(symbol: &str, value: Decimal) -> Indicator {
        Indicator::new(
            symbol,
            symbol,
            value,
            Decimal::ZERO,
            Decimal::ZERO,
            Currency::Usd,
            "Google Finance",
        )
    }

    fn cache() -> IndicatorCache {
        IndicatorCache::new(Duration::from_secs(600))
    }

    #[tokio::test]
    async fn test_get_is_case_insensitive() {
        let cache = cache();
        cache.put(indicator("IBOV", dec!(128500.00))).await;
        cache.put(indicator("usd-brl", dec!(4.95))).await;

        // 키는 정규화되지만 반환되는 지표는 원래 심볼을 유지
        let hit = cache.get("ibov").await.unwrap();
        assert_eq!(hit.symbol, "IBOV");
        assert!(cache.get("IbOv").await.is_some());
        assert!(cache.get("USD-BRL").await.is_some());
        assert!(cache.get("GOLD").await.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_existing_entry() {
        let cache = cache();
        cache.put(indicator("IBOV", dec!(1))).await;
        cache.put(indicator("ibov", dec!(2))).await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("IBOV").await.unwrap().value, dec!(2));
    }

    #[tokio::test]
    async fn test_put_empty_symbol_is_noop() {
        let cache = cache();
        cache.put(indicator("", dec!(1))).await;
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_expires_strictly_after_ttl() {
        let cache = cache();
        cache.put(indicator("IBOV", dec!(1))).await;

        tokio::time::advance(Duration::from_secs(599)).await;
        assert!(cache.get("IBOV").await.is_some());

        // 경과 시간이 TTL과 정확히 같으면 아직 유효
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("IBOV").await.is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("IBOV").await.is_none());
        // 만료 항목은 조회 시 제거되고, 재조회해도 결과가 같다
        assert_eq!(cache.len().await, 0);
        assert!(cache.get("IBOV").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_len_counts_expired_before_sweep() {
        let cache = cache();
        cache.put(indicator("IBOV", dec!(1))).await;
        cache.put(indicator("GOLD", dec!(2))).await;

        tokio::time::advance(Duration::from_secs(601)).await;

        // 아직 아무도 만료 항목을 건드리지 않았으므로 물리적 개수 유지
        assert_eq!(cache.len().await, 2);

        assert!(cache.get_all().await.is_empty());
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_all_sweeps_only_expired() {
        let cache = cache();
        cache.put(indicator("IBOV", dec!(1))).await;
        cache.put(indicator("GOLD", dec!(2))).await;

        tokio::time::advance(Duration::from_secs(601)).await;
        cache.put(indicator("BTC-USD", dec!(3))).await;

        let remaining = cache.get_all().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].symbol, "BTC-USD");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let cache = cache();
        cache.put(indicator("IBOV", dec!(1))).await;
        cache.put(indicator("GOLD", dec!(2))).await;

        cache.clear().await;

        assert_eq!(cache.len().await, 0);
        assert!(cache.is_empty().await);
        assert!(cache.get("IBOV").await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_put_get_no_torn_reads() {
        let cache = Arc::new(IndicatorCache::new(Duration::from_secs(600)));

        let writer = tokio::spawn({
            let cache = cache.clone();
            async move {
                for i in 0..200u32 {
                    let value = Decimal::from(i);
                    // value와 change에 항상 같은 값을 기록
                    let indicator = Indicator::new(
                        "IBOV",
                        "Índice Bovespa",
                        value,
                        value,
                        Decimal::ZERO,
                        Currency::Brl,
                        "Google Finance",
                    );
                    cache.put(indicator).await;
                }
            }
        });

        let reader = tokio::spawn({
            let cache = cache.clone();
            async move {
                for _ in 0..200 {
                    if let Some(indicator) = cache.get("ibov").await {
                        // 찢어진 읽기가 없다면 두 필드는 항상 일치
                        assert_eq!(indicator.value, indicator.change);
                    }
                }
            }
        });

        writer.await.unwrap();
        reader.await.unwrap();
    }
}
