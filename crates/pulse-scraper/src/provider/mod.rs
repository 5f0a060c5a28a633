//! 지표 Provider 모듈.
//!
//! 외부 소스에서 지표 한 건을 가져오는 Fetcher를 정의합니다.
//!
//! ## Google Finance
//! - `GoogleFinanceFetcher`: Google Finance 시세 페이지 수집기
//! - 지수, 환율, 암호화폐, 원자재 현재가
//!
//! 재시도와 요청 간격 조절은 이 계층의 책임이 아니며
//! `ScraperService`가 담당합니다.

pub mod google;

pub use google::{FetchOutcome, GoogleFinanceFetcher, IndicatorFetcher};
