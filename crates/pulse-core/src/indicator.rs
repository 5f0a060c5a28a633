//! 금융 지표 도메인 모델.
//!
//! 지수, 환율, 원자재, 암호화폐 등 하나의 관측값을 표현합니다.
//! 관측값은 생성 시점에 완성되는 불변 객체이며, 갱신은 수정이 아니라
//! 새 관측값으로의 교체로 표현합니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 지표 통화 코드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum Currency {
    /// 미국 달러
    Usd,
    /// 브라질 헤알
    Brl,
    /// 유로
    Eur,
}

impl Currency {
    /// 심볼 문자열에서 통화를 추론합니다.
    ///
    /// `USD` 또는 `:` 포함 → USD, `BRL` 포함 → BRL, `EUR` 포함 → EUR,
    /// 어느 것도 아니면 USD. 검사 순서가 결과를 결정합니다
    /// (예: "EUR-BRL"은 BRL).
    pub fn from_symbol(symbol: &str) -> Self {
        if symbol.contains("USD") || symbol.contains(':') {
            Currency::Usd
        } else if symbol.contains("BRL") {
            Currency::Brl
        } else if symbol.contains("EUR") {
            Currency::Eur
        } else {
            Currency::Usd
        }
    }

    /// ISO 통화 코드 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Brl => "BRL",
            Currency::Eur => "EUR",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 금융 지표 관측값.
///
/// 캐시 키는 `symbol`을 대문자로 정규화한 값입니다.
/// JSON 직렬화 시 필드명은 camelCase를 사용합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Indicator {
    /// 심볼 (예: "IBOV:INDEXBVMF", "USD-BRL", "BTC-USD")
    pub symbol: String,
    /// 사람이 읽을 수 있는 이름
    pub name: String,
    /// 현재 값
    pub value: Decimal,
    /// 전일 대비 변화량
    pub change: Decimal,
    /// 전일 대비 변화율 (%)
    pub change_percent: Decimal,
    /// 통화
    pub currency: Currency,
    /// 관측 시각
    pub last_updated: DateTime<Utc>,
    /// 데이터 출처 (예: "Google Finance", "Sample Data")
    pub source: String,
}

impl Indicator {
    /// 현재 시각을 관측 시각으로 하는 지표를 생성합니다.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        value: Decimal,
        change: Decimal,
        change_percent: Decimal,
        currency: Currency,
        source: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            value,
            change,
            change_percent,
            currency,
            last_updated: Utc::now(),
            source: source.into(),
        }
    }

    /// 전일 대비 상승 여부.
    pub fn is_up(&self) -> bool {
        self.change > Decimal::ZERO
    }
}
