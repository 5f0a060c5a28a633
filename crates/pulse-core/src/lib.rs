//! # Pulse Core
//!
//! MarketPulse의 핵심 도메인 모델과 공용 인프라.
//!
//! 이 crate는 다음을 제공합니다:
//! - [`indicator`]: 금융 지표 값 객체와 통화 타입
//! - [`config`]: 파일 + 환경 변수 기반 설정 로딩
//! - [`logging`]: tracing 기반 로깅 초기화

pub mod config;
pub mod indicator;
pub mod logging;

// 주요 타입 재내보내기
pub use config::*;
pub use indicator::*;
pub use logging::*;
