//! tracing 기반 로깅 초기화.
//!
//! 출력 형식(pretty/json/compact)과 필터 수준을 설정으로 제어합니다.
//! 운영 환경에서는 `LOG_FORMAT=json`으로 구조화 로그를 권장합니다.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 사람이 읽기 좋은 멀티라인 출력 (개발용)
    #[default]
    Pretty,
    /// JSON 구조화 출력 (운영용)
    Json,
    /// 한 줄 압축 출력
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 필터 수준 (예: "info", "pulse_scraper=debug,info")
    pub level: String,
    /// 출력 형식
    pub format: LogFormat,
    /// span 시작/종료 이벤트 기록 여부
    pub with_span_events: bool,
    /// 소스 파일/라인 포함 여부
    pub with_file: bool,
    /// 스레드 ID 포함 여부
    pub with_thread_ids: bool,
    /// 타깃 모듈 경로 포함 여부
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            with_span_events: false,
            with_file: false,
            with_thread_ids: false,
            with_target: true,
        }
    }
}

impl LogConfig {
    /// 필터 수준을 설정합니다.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// 출력 형식을 설정합니다.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// span 이벤트 기록 여부를 설정합니다.
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.with_span_events = enabled;
        self
    }

    /// 소스 파일/라인 포함 여부를 설정합니다.
    pub fn with_file(mut self, enabled: bool) -> Self {
        self.with_file = enabled;
        self
    }

    /// 환경 변수에서 설정을 생성합니다.
    ///
    /// 필터 수준은 `RUST_LOG`, 출력 형식은 `LOG_FORMAT`을 읽습니다.
    pub fn from_env() -> Self {
        let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let format = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        Self {
            level,
            format,
            ..Self::default()
        }
    }
}

/// 전역 tracing 구독자를 초기화합니다.
///
/// `RUST_LOG` 환경 변수가 설정되어 있으면 그 필터를 우선 사용하고,
/// 없으면 `config.level`을 필터로 사용합니다. 프로세스당 한 번만
/// 호출해야 하며, 중복 호출은 에러를 반환합니다.
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    let span_events = if config.with_span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    match config.format {
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .pretty()
                .with_file(config.with_file)
                .with_thread_ids(config.with_thread_ids)
                .with_target(config.with_target)
                .with_span_events(span_events);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_file(config.with_file)
                .with_thread_ids(config.with_thread_ids)
                .with_target(config.with_target)
                .with_span_events(span_events);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Compact => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_file(config.with_file)
                .with_thread_ids(config.with_thread_ids)
                .with_target(config.with_target)
                .with_span_events(span_events);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    tracing::info!(format = ?config.format, level = %config.level, "로깅 초기화 완료");
    Ok(())
}

/// 환경 변수 기반으로 로깅을 초기화합니다.
pub fn init_logging_from_env() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LogConfig::from_env())
}
