//! 외부 소스에서 들어오는 알림 레코드.
//!
//! 두 종류의 페이로드를 다룹니다:
//! - [`AlertRecord`]: MetaTrader EA가 보내는 신호 (분류/라우팅 대상)
//! - [`TradingViewAlert`]: 차트 플랫폼 웹훅 (분류 없이 그대로 전달)
//!
//! 두 페이로드 모두 신뢰할 수 없는 입력이므로 필드 존재 여부와 타입을 직접 확인합니다.

use serde_json::{Map, Value};

use crate::error::{AlertError, AlertResult};

/// MetaTrader 알림 레코드.
///
/// [`AlertRecord::from_value`]를 통해서만 생성되며, 생성 시점에
/// `symbol`과 `signal`이 문자열인지 검증합니다.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRecord {
    /// 종목 식별자 (형식 검증 없음)
    pub symbol: String,
    /// 분류 태그 (예: "BULLISH_CROSS", "TREND_UP")
    pub signal: String,
    /// 타임프레임 코드 (예: "M1"), 없으면 빈 문자열
    pub timeframe: String,
    /// 가격 원본 값 (숫자 또는 숫자 문자열)
    pub price: Option<Value>,
    /// EA가 보낸 시각. 메시지에는 사용하지 않고 항상 전송 시각을 씁니다.
    pub timestamp: Option<Value>,
}

impl AlertRecord {
    /// 원시 요청 본문에서 레코드를 파싱합니다.
    ///
    /// MT5 `WebRequest`는 본문 끝에 NUL 문자를 붙이는 경우가 있어 앞뒤 공백과 함께 제거합니다.
    pub fn parse(body: &str) -> AlertResult<Self> {
        let trimmed = body.trim_matches(|c: char| c == '\0' || c.is_whitespace());
        if trimmed.is_empty() {
            return Err(AlertError::invalid("빈 요청 본문"));
        }

        let value: Value = serde_json::from_str(trimmed)?;
        Self::from_value(value)
    }

    /// JSON 값에서 레코드를 생성합니다.
    ///
    /// # Errors
    /// - 객체가 아닌 경우
    /// - `signal` 또는 `symbol`이 없거나 문자열이 아닌 경우
    ///
    /// `timeframe`은 어떤 값이든 텍스트로 받습니다 (EA가 `Period()`를 숫자로 보내기도 함).
    pub fn from_value(value: Value) -> AlertResult<Self> {
        let Value::Object(mut fields) = value else {
            return Err(AlertError::invalid("페이로드가 JSON 객체가 아닙니다"));
        };

        let signal = required_string(&mut fields, "signal")?;
        let symbol = required_string(&mut fields, "symbol")?;

        let timeframe = match fields.remove("timeframe") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(tf)) => tf,
            Some(other) => other.to_string(),
        };

        Ok(Self {
            symbol,
            signal,
            timeframe,
            price: fields.remove("price"),
            timestamp: fields.remove("timestamp"),
        })
    }

    /// 가격을 유한한 `f64`로 변환합니다.
    pub fn price(&self) -> AlertResult<f64> {
        let parsed = match &self.price {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        match parsed {
            Some(price) if price.is_finite() => Ok(price),
            _ => Err(AlertError::invalid(format!(
                "price 값을 숫자로 변환할 수 없습니다: {}",
                self.price
                    .as_ref()
                    .map(Value::to_string)
                    .unwrap_or_else(|| "없음".to_string())
            ))),
        }
    }
}

fn required_string(fields: &mut Map<String, Value>, key: &str) -> AlertResult<String> {
    match fields.remove(key) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(AlertError::invalid(format!("{key} 필드는 문자열이어야 합니다"))),
        None => Err(AlertError::invalid(format!("{key} 필드가 없습니다"))),
    }
}

/// 차트 플랫폼 웹훅 알림.
///
/// 필드 타입을 강제하지 않고 받은 그대로 보관합니다. 누락된 필드는 `None`입니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradingViewAlert {
    pub pair: Option<Value>,
    pub event: Option<Value>,
    pub timeframe: Option<Value>,
    pub timestamp: Option<Value>,
    pub volume: Option<Value>,
}

impl TradingViewAlert {
    /// JSON 값에서 알림을 추출합니다. 객체가 아니면 모든 필드가 비어 있습니다.
    pub fn from_value(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::default();
        };

        Self {
            pair: fields.get("pair").cloned(),
            event: fields.get("event").cloned(),
            timeframe: fields.get("timeframe").cloned(),
            timestamp: fields.get("timestamp").cloned(),
            volume: fields.get("volume").cloned(),
        }
    }
}
