//! 폴백 샘플 데이터.
//!
//! 실시간 수집이 전부 실패했을 때 캐시를 채우는 고정 샘플 지표입니다.
//! API가 빈 응답 대신 형태가 올바른 데이터를 돌려줄 수 있게 합니다.

use pulse_core::{Currency, Indicator};
use rust_decimal_macros::dec;

/// 샘플 데이터 출처 태그
pub const SAMPLE_SOURCE: &str = "Sample Data";

/// 고정 샘플 지표 6종을 생성합니다.
///
/// 값은 형태를 보여주기 위한 예시일 뿐 실제 시세가 아닙니다.
pub fn sample_indicators() -> Vec<Indicator> {
    vec![
        Indicator::new(
            "IBOV",
            "Índice Bovespa",
            dec!(128500.00),
            dec!(1500.00),
            dec!(1.18),
            Currency::Brl,
            SAMPLE_SOURCE,
        ),
        Indicator::new(
            "USD-BRL",
            "Dólar/Real",
            dec!(4.95),
            dec!(-0.02),
            dec!(-0.40),
            Currency::Brl,
            SAMPLE_SOURCE,
        ),
        Indicator::new(
            "EUR-BRL",
            "Euro/Real",
            dec!(5.35),
            dec!(0.03),
            dec!(0.56),
            Currency::Brl,
            SAMPLE_SOURCE,
        ),
        Indicator::new(
            "BTC-USD",
            "Bitcoin",
            dec!(42500.00),
            dec!(850.00),
            dec!(2.04),
            Currency::Usd,
            SAMPLE_SOURCE,
        ),
        Indicator::new(
            "ETH-USD",
            "Ethereum",
            dec!(2250.00),
            dec!(45.00),
            dec!(2.04),
            Currency::Usd,
            SAMPLE_SOURCE,
        ),
        Indicator::new(
            "GOLD",
            "Ouro",
            dec!(2050.00),
            dec!(15.00),
            dec!(0.74),
            Currency::Usd,
            SAMPLE_SOURCE,
        ),
    ]
}
