//! # Pulse Scraper
//!
//! 시장 지표 수집과 캐싱을 담당하는 crate입니다.
//!
//! ## 구성
//! - `provider`: Google Finance 시세 페이지 수집기
//! - `service`: 재시도/백오프/요청 간격이 적용된 수집 서비스
//! - `cache`: TTL 기반 메모리 지표 캐시
//! - `refresh`: 타이머/수동 트리거 갱신 오케스트레이터
//! - `sample`: 수집 전면 실패 시 사용하는 폴백 샘플 데이터

pub mod cache;
pub mod error;
pub mod provider;
pub mod refresh;
pub mod sample;
pub mod service;

pub use cache::IndicatorCache;
pub use error::{Result, ScraperError};
pub use provider::{FetchOutcome, GoogleFinanceFetcher, IndicatorFetcher};
pub use refresh::{default_symbols, RefreshOutcome, RefreshService};
pub use sample::{sample_indicators, SAMPLE_SOURCE};
pub use service::{IndicatorSource, ScraperService};
