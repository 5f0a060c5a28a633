//! 애플리케이션 설정 관리.
//!
//! 기본값 → `config/default.toml` → `PULSE__` 접두사 환경 변수 순서로
//! 설정을 병합합니다. 예: `PULSE__SCRAPER__MAX_RETRIES=5`

use serde::{Deserialize, Serialize};
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 지표 스크래퍼 설정
    #[serde(default)]
    pub scraper: ScraperConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// 지표 스크래퍼 설정.
///
/// 모든 필드는 설정 파일에서 생략 가능하며, 생략 시 기본값이 적용됩니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    /// 스크래퍼 활성화 여부
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// 주기 갱신 간격 (초)
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// HTTP 연결 타임아웃 (초)
    #[serde(default = "default_connection_timeout_secs")]
    pub connection_timeout_secs: u64,
    /// HTTP 읽기 타임아웃 (초)
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
    /// 요청 User-Agent 헤더
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// 심볼당 최대 시도 횟수 (0이면 시도하지 않음)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// 재시도 초기 백오프 (밀리초, 실패할 때마다 2배)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// 심볼 간 요청 간격 (밀리초)
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// 캐시 TTL (초)
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// 수집할 심볼 목록 (없으면 기본 목록 사용)
    #[serde(default)]
    pub symbols: Option<Vec<String>>,
    /// 심볼 목록이 명시적으로 비어 있을 때 기본 목록으로 대체할지 여부
    #[serde(default)]
    pub defaults_on_empty_symbols: bool,
    /// 시작 직후 샘플 데이터를 적재할지 여부
    #[serde(default)]
    pub startup_load: bool,
}

fn default_enabled() -> bool {
    true
}

fn default_refresh_interval_secs() -> u64 {
    300
}

fn default_connection_timeout_secs() -> u64 {
    10
}

fn default_read_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_cache_ttl_secs() -> u64 {
    600
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            refresh_interval_secs: default_refresh_interval_secs(),
            connection_timeout_secs: default_connection_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
            user_agent: default_user_agent(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            request_delay_ms: default_request_delay_ms(),
            cache_ttl_secs: default_cache_ttl_secs(),
            symbols: None,
            defaults_on_empty_symbols: false,
            startup_load: false,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("PULSE")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}
