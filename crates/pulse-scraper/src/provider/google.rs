//! Google Finance 시세 페이지 수집기.
//!
//! 시세 페이지 HTML에서 현재가, 변화량, 변화율, 지표 이름을 추출합니다.
//! 페이지 구조상 값은 data-* 속성에 들어 있어 렌더링 없이 파싱할 수
//! 있습니다.
//!
//! ## 사용 예시
//! ```no_run
//! use pulse_core::ScraperConfig;
//! use pulse_scraper::provider::google::{GoogleFinanceFetcher, IndicatorFetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = GoogleFinanceFetcher::new(&ScraperConfig::default())?;
//! let outcome = fetcher.fetch("BTC-USD").await;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use pulse_core::{Currency, Indicator, ScraperConfig};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::error::{Result, ScraperError};

/// Google Finance 시세 페이지 기본 URL
const GOOGLE_FINANCE_BASE_URL: &str = "https://www.google.com/finance/quote/";

/// 현재가 요소 셀렉터
const SELECTOR_PRICE: &str = "div[data-last-price]";
/// 현재가 폴백 셀렉터
const SELECTOR_PRICE_FALLBACK: &str = "[data-value]";
/// 변화량 요소 셀렉터
const SELECTOR_CHANGE: &str = "div[data-price-change]";
/// 변화율 요소 셀렉터
const SELECTOR_CHANGE_PERCENT: &str = "div[data-price-change-percent]";
/// 지표 이름 요소 셀렉터
const SELECTOR_NAME: &str = "div[class*='zzDege']";

/// 지표 출처 태그
const SOURCE_NAME: &str = "Google Finance";

/// 1회 수집 시도의 결과.
///
/// 재시도 대상 여부를 타입으로 구분합니다. `Empty`는 응답은 받았지만
/// 쓸 만한 값이 없는 경우로, 재시도해도 결과가 달라지지 않습니다.
#[derive(Debug)]
pub enum FetchOutcome {
    /// 수집 성공
    Success(Indicator),
    /// 데이터 없음 (빈 심볼 또는 현재가 파싱 불가)
    Empty,
    /// 일시적 실패 (네트워크, 타임아웃, HTTP 상태)
    Transient(ScraperError),
}

/// 심볼 하나에 대해 수집을 1회 시도하는 Fetcher.
///
/// 재시도와 요청 간격은 상위 계층(`ScraperService`)의 책임입니다.
#[async_trait]
pub trait IndicatorFetcher: Send + Sync {
    /// 심볼 하나를 1회 수집합니다.
    async fn fetch(&self, symbol: &str) -> FetchOutcome;
}

/// Google Finance 시세 페이지 수집기.
pub struct GoogleFinanceFetcher {
    client: Client,
    base_url: String,
}

impl GoogleFinanceFetcher {
    /// 설정된 타임아웃과 User-Agent로 Fetcher를 생성합니다.
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connection_timeout_secs))
            .timeout(Duration::from_secs(config.read_timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: GOOGLE_FINANCE_BASE_URL.to_string(),
        })
    }

    /// 기본 URL을 교체합니다 (테스트/프록시용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 심볼을 시세 페이지 URL로 변환합니다.
    ///
    /// `-` 구분 심볼은 경로 구분자로 바뀝니다
    /// (예: "USD-BRL" → ".../quote/USD/BRL").
    fn build_url(&self, symbol: &str) -> String {
        format!("{}{}", self.base_url, symbol.replace('-', "/"))
    }
}

#[async_trait]
impl IndicatorFetcher for GoogleFinanceFetcher {
    async fn fetch(&self, symbol: &str) -> FetchOutcome {
        if symbol.trim().is_empty() {
            warn!("빈 심볼은 수집하지 않음");
            return FetchOutcome::Empty;
        }

        let url = self.build_url(symbol);
        debug!(%url, "시세 페이지 요청");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::Transient(e.into()),
        };

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                return FetchOutcome::Transient(ScraperError::RateLimited);
            }
            status if !status.is_success() => {
                return FetchOutcome::Transient(ScraperError::Status(status.as_u16()));
            }
            _ => {}
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return FetchOutcome::Transient(e.into()),
        };

        match parse_quote_page(&body, symbol) {
            Some(indicator) => FetchOutcome::Success(indicator),
            None => {
                debug!(symbol, "페이지에서 현재가를 찾지 못함");
                FetchOutcome::Empty
            }
        }
    }
}

/// 시세 페이지 HTML에서 지표를 추출합니다.
///
/// 현재가를 찾지 못하면 None. 변화량/변화율은 없으면 0으로 두고,
/// 이름은 이름 요소 → 문서 제목 → 심볼 순서로 폴백합니다.
fn parse_quote_page(html: &str, symbol: &str) -> Option<Indicator> {
    let document = Html::parse_document(html);

    let value = extract_price(&document)?;
    let change = extract_attr_decimal(&document, SELECTOR_CHANGE, "data-price-change")
        .unwrap_or(Decimal::ZERO);
    let change_percent =
        extract_attr_decimal(&document, SELECTOR_CHANGE_PERCENT, "data-price-change-percent")
            .unwrap_or(Decimal::ZERO);
    let name = extract_name(&document, symbol);
    let currency = Currency::from_symbol(symbol);

    Some(Indicator::new(
        symbol,
        name,
        value,
        change,
        change_percent,
        currency,
        SOURCE_NAME,
    ))
}

/// 현재가 추출. 기본 셀렉터 실패 시 data-value 요소로 폴백합니다.
fn extract_price(document: &Html) -> Option<Decimal> {
    if let Some(value) = extract_attr_decimal(document, SELECTOR_PRICE, "data-last-price") {
        return Some(value);
    }

    extract_attr_decimal(document, SELECTOR_PRICE_FALLBACK, "data-last-price")
        .or_else(|| extract_attr_decimal(document, SELECTOR_PRICE_FALLBACK, "data-value"))
}

/// 셀렉터로 찾은 첫 요소의 속성값을 Decimal로 파싱합니다.
fn extract_attr_decimal(document: &Html, selector: &str, attr: &str) -> Option<Decimal> {
    let selector = Selector::parse(selector).ok()?;
    let element = document.select(&selector).next()?;
    let raw = element.value().attr(attr)?;
    parse_decimal_value(raw)
}

/// 지표 이름 추출. 이름 요소 → 문서 제목 앞부분 → 심볼 순서로 폴백합니다.
fn extract_name(document: &Html, symbol: &str) -> String {
    if let Ok(selector) = Selector::parse(SELECTOR_NAME) {
        if let Some(element) = document.select(&selector).next() {
            let text = element.text().collect::<String>();
            let text = text.trim();
            if !text.is_empty() {
                return text.to_string();
            }
        }
    }

    // 제목은 "지표명 - Google Finance" 형태
    if let Some(title) = extract_title(document) {
        if let Some(prefix) = title.split(" - ").next() {
            let prefix = prefix.trim();
            if !prefix.is_empty() {
                return prefix.to_string();
            }
        }
    }

    symbol.to_string()
}

/// 문서 제목 텍스트 추출.
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let element = document.select(&selector).next()?;
    let title = element.text().collect::<String>();
    let title = title.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

// ==================== 파싱 유틸리티 함수 ====================

/// 숫자 문자열을 Decimal로 파싱합니다.
///
/// 통화 기호, 쉼표, % 같은 장식 문자를 제거한 뒤 파싱합니다.
/// 유효한 숫자가 남지 않으면 None.
fn parse_decimal_value(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<Decimal>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_fetcher() -> GoogleFinanceFetcher {
        GoogleFinanceFetcher::new(&ScraperConfig::default()).unwrap()
    }

    // ==================== 파싱 테스트 ====================

    #[test]
    fn test_parse_decimal_value() {
        assert_eq!(parse_decimal_value("128500.00"), Some(dec!(128500.00)));
        assert_eq!(parse_decimal_value("-0.02"), Some(dec!(-0.02)));
        assert_eq!(parse_decimal_value("1,234.56"), Some(dec!(1234.56)));
        assert_eq!(parse_decimal_value("2.04%"), Some(dec!(2.04)));
        assert_eq!(parse_decimal_value(" 4.95 "), Some(dec!(4.95)));
        assert_eq!(parse_decimal_value(""), None);
        assert_eq!(parse_decimal_value("N/A"), None);
    }

    #[test]
    fn test_parse_quote_page_full() {
        let html = r#"
            <html>
              <head><title>Bitcoin (BTC / USD) - Google Finance</title></head>
              <body>
                <div class="zzDege">Bitcoin</div>
                <div data-last-price="42500.00">42,500.00</div>
                <div data-price-change="850.00"></div>
                <div data-price-change-percent="2.04"></div>
              </body>
            </html>
        "#;

        let indicator = parse_quote_page(html, "BTC-USD").unwrap();
        assert_eq!(indicator.symbol, "BTC-USD");
        assert_eq!(indicator.name, "Bitcoin");
        assert_eq!(indicator.value, dec!(42500.00));
        assert_eq!(indicator.change, dec!(850.00));
        assert_eq!(indicator.change_percent, dec!(2.04));
        assert_eq!(indicator.currency, Currency::Usd);
        assert_eq!(indicator.source, "Google Finance");
    }

    #[test]
    fn test_parse_quote_page_fallback_price_element() {
        let html = r#"<html><body><span data-value="4.95"></span></body></html>"#;

        let indicator = parse_quote_page(html, "USD-BRL").unwrap();
        assert_eq!(indicator.value, dec!(4.95));
        assert_eq!(indicator.change, Decimal::ZERO);
        assert_eq!(indicator.change_percent, Decimal::ZERO);
        // 이름 요소도 제목도 없으면 심볼로 폴백
        assert_eq!(indicator.name, "USD-BRL");
    }

    #[test]
    fn test_parse_quote_page_title_name_fallback() {
        let html = r#"
            <html>
              <head><title>Euro / Brazilian Real - Google Finance</title></head>
              <body><div data-last-price="5.35"></div></body>
            </html>
        "#;

        let indicator = parse_quote_page(html, "EUR-BRL").unwrap();
        assert_eq!(indicator.name, "Euro / Brazilian Real");
        assert_eq!(indicator.currency, Currency::Brl);
    }

    #[test]
    fn test_parse_quote_page_without_price_is_none() {
        let html = r#"<html><body><div class="zzDege">Gold</div></body></html>"#;
        assert!(parse_quote_page(html, "GOLD").is_none());
    }

    #[test]
    fn test_build_url_replaces_dash() {
        let fetcher = test_fetcher();
        assert_eq!(
            fetcher.build_url("USD-BRL"),
            "https://www.google.com/finance/quote/USD/BRL"
        );
        assert_eq!(
            fetcher.build_url("IBOV:INDEXBVMF"),
            "https://www.google.com/finance/quote/IBOV:INDEXBVMF"
        );
    }

    // ==================== Fetcher 동작 테스트 ====================

    #[tokio::test]
    async fn test_fetch_blank_symbol_is_empty_without_request() {
        let fetcher = test_fetcher();
        assert!(matches!(fetcher.fetch("   ").await, FetchOutcome::Empty));
    }

    #[tokio::test]
    async fn test_fetch_success_via_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/quote/BTC/USD")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(
                r#"<html><head><title>Bitcoin - Google Finance</title></head>
                   <body><div data-last-price="42500.00"></div></body></html>"#,
            )
            .create_async()
            .await;

        let fetcher = test_fetcher().with_base_url(format!("{}/quote/", server.url()));
        let outcome = fetcher.fetch("BTC-USD").await;

        match outcome {
            FetchOutcome::Success(indicator) => {
                assert_eq!(indicator.value, dec!(42500.00));
                assert_eq!(indicator.name, "Bitcoin");
                assert_eq!(indicator.source, "Google Finance");
            }
            other => panic!("수집 성공을 기대했지만 {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_page_without_price_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/quote/GOLD")
            .with_status(200)
            .with_body("<html><body><p>No quote here</p></body></html>")
            .create_async()
            .await;

        let fetcher = test_fetcher().with_base_url(format!("{}/quote/", server.url()));
        assert!(matches!(fetcher.fetch("GOLD").await, FetchOutcome::Empty));
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_transient() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/quote/GOLD")
            .with_status(500)
            .create_async()
            .await;

        let fetcher = test_fetcher().with_base_url(format!("{}/quote/", server.url()));
        assert!(matches!(
            fetcher.fetch("GOLD").await,
            FetchOutcome::Transient(ScraperError::Status(500))
        ));
    }

    #[tokio::test]
    async fn test_fetch_rate_limited_is_transient() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/quote/BTC/USD")
            .with_status(429)
            .create_async()
            .await;

        let fetcher = test_fetcher().with_base_url(format!("{}/quote/", server.url()));
        assert!(matches!(
            fetcher.fetch("BTC-USD").await,
            FetchOutcome::Transient(ScraperError::RateLimited)
        ));
    }

    #[tokio::test]
    async fn test_fetch_connection_error_is_transient() {
        // 아무도 수신하지 않는 포트
        let fetcher = test_fetcher().with_base_url("http://127.0.0.1:9/quote/");
        assert!(matches!(
            fetcher.fetch("BTC-USD").await,
            FetchOutcome::Transient(ScraperError::Http(_))
        ));
    }

    /// 실제 Google Finance 호출 (수동 실행 전용).
    #[tokio::test]
    #[ignore]
    async fn test_fetch_live() {
        let fetcher = test_fetcher();
        let outcome = fetcher.fetch("BTC-USD").await;
        println!("실시간 수집 결과: {:?}", outcome);
    }
}
