//! 스크래퍼 오류 타입.

use thiserror::Error;

/// 지표 수집 중 발생하는 오류.
#[derive(Debug, Error)]
pub enum ScraperError {
    /// HTTP 요청 실패 (연결/타임아웃 포함)
    #[error("HTTP 요청 실패: {0}")]
    Http(#[from] reqwest::Error),

    /// 성공이 아닌 HTTP 응답 상태
    #[error("HTTP 상태 코드 {0}")]
    Status(u16),

    /// 요청 한도 초과 (HTTP 429)
    #[error("요청 한도 초과")]
    RateLimited,

    /// 데이터 수집 실패
    #[error("데이터 수집 실패: {0}")]
    Fetch(String),
}

/// 스크래퍼 Result 타입 별칭
pub type Result<T> = std::result::Result<T, ScraperError>;
