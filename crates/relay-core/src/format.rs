//! 텔레그램 메시지 포맷터.
//!
//! 모든 함수는 순수 함수이며 I/O를 하지 않습니다.
//! 메시지는 텔레그램 `Markdown` 파싱 모드 기준입니다.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Number, Value};

use crate::alert::{AlertRecord, TradingViewAlert};
use crate::classify::ClassificationResult;
use crate::error::AlertResult;

/// `/start` 인사말에서 이름이 없을 때 쓰는 호칭.
pub const DEFAULT_FIRST_NAME: &str = "friend";

const LONG_UTC_FORMAT: &str = "%B %-d, %Y, %-I:%M %p";
const INVALID_DATE: &str = "Invalid Date";
const UNDEFINED: &str = "undefined";

/// 시각을 UTC 기준 긴 형식으로 렌더링합니다 (예: `October 18, 2026, 3:05 PM`).
pub fn format_long_utc(time: DateTime<Utc>) -> String {
    time.format(LONG_UTC_FORMAT).to_string()
}

/// 가격을 소수점 둘째 자리까지 렌더링합니다.
pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

/// MetaTrader 알림 메시지를 생성합니다.
///
/// `dispatched_at`은 전송 시각이며 레코드의 `timestamp`는 사용하지 않습니다.
///
/// # Errors
/// 가격을 유한한 숫자로 변환할 수 없으면 `InvalidPayload`.
pub fn format_meta_alert(
    record: &AlertRecord,
    classification: &ClassificationResult,
    dispatched_at: DateTime<Utc>,
) -> AlertResult<String> {
    let price = format_price(record.price()?);
    let timeframe = match classification.icon {
        Some(icon) => format!("{icon} {}", record.timeframe),
        None => record.timeframe.clone(),
    };
    let time = format_long_utc(dispatched_at);

    Ok(format!(
        "📊 *MT5 Alert Triggered!*\n\n\
         *Symbol:* {symbol}\n\
         *Signal:* {label}\n\
         *Timeframe:* {timeframe}\n\
         *Price:* {price}\n\
         *Time:* {time} UTC",
        symbol = record.symbol,
        label = classification.display_label,
    ))
}

/// 차트 플랫폼 알림 메시지를 생성합니다.
///
/// 누락된 필드는 `undefined`로, 해석할 수 없는 시각은 `Invalid Date`로 표시됩니다.
pub fn format_tradingview_alert(alert: &TradingViewAlert) -> String {
    let time = alert
        .timestamp
        .as_ref()
        .and_then(parse_alert_time)
        .map(format_long_utc)
        .unwrap_or_else(|| INVALID_DATE.to_string());

    format!(
        "📡 *Alert Triggered!*\n\n\
         *Pair:* {pair}\n\
         *Event:* {event}\n\
         *Timeframe:* {timeframe}\n\
         *Timestamp:* {time} UTC\n\
         *Volume:* {volume}",
        pair = render_field(alert.pair.as_ref()),
        event = render_field(alert.event.as_ref()),
        timeframe = render_field(alert.timeframe.as_ref()),
        volume = render_field(alert.volume.as_ref()),
    )
}

/// `/start` 명령 인사말을 생성합니다.
pub fn format_welcome(first_name: Option<&str>, channel_link: &str) -> String {
    let name = first_name
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_FIRST_NAME);

    format!(
        "👋 Hi *{name}*!\n\n\
         Welcome to our trading alert system.\n\
         Click below to join our private channel:\n\
         👉 [Join Now]({channel_link})"
    )
}

/// 알림 시각을 해석합니다. 숫자는 epoch 밀리초, 문자열은 RFC 3339 또는 `YYYY-MM-DD`.
///
/// `null`은 epoch 0으로 취급합니다.
pub fn parse_alert_time(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Null => DateTime::from_timestamp_millis(0),
        Value::Number(n) => {
            let millis = n.as_f64()?;
            if !millis.is_finite() {
                return None;
            }
            DateTime::from_timestamp_millis(millis.trunc() as i64)
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(time) = DateTime::parse_from_rfc3339(s) {
                return Some(time.with_timezone(&Utc));
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
        _ => None,
    }
}

/// 값이 템플릿 문자열에 들어갈 때의 텍스트 표현.
fn render_field(value: Option<&Value>) -> String {
    match value {
        None => UNDEFINED.to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => render_number(n),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => render_field(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

/// 숫자 렌더링. 정수 값인 실수는 소수점 없이 표시합니다 (`1500.0` → `1500`).
fn render_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, Classification};
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 15, 5, 0).unwrap()
    }

    fn routed(signal: &str, timeframe: &str) -> ClassificationResult {
        match classify(signal, timeframe) {
            Classification::Routed(result) => result,
            Classification::Suppressed => panic!("unexpected suppression"),
        }
    }

    fn record(signal: &str, timeframe: &str, price: Value) -> AlertRecord {
        AlertRecord::from_value(json!({
            "symbol": "EURUSD",
            "signal": signal,
            "timeframe": timeframe,
            "price": price,
        }))
        .unwrap()
    }

    #[test]
    fn test_format_meta_alert_full_message() {
        let record = record("TREND_UP", "M5", json!("101.5"));
        let message = format_meta_alert(&record, &routed("TREND_UP", "M5"), fixed_time()).unwrap();

        assert_eq!(
            message,
            "📊 *MT5 Alert Triggered!*\n\n\
             *Symbol:* EURUSD\n\
             *Signal:* Trend UP\n\
             *Timeframe:* ⏱️ M5\n\
             *Price:* 101.50\n\
             *Time:* October 18, 2026, 3:05 PM UTC"
        );
    }

    #[test]
    fn test_format_meta_alert_without_icon() {
        let record = record("BULLISH", "M30", json!(1.23456));
        let message = format_meta_alert(&record, &routed("BULLISH", "M30"), fixed_time()).unwrap();

        assert!(message.contains("*Timeframe:* M30\n"));
        assert!(message.contains("*Price:* 1.23\n"));
    }

    #[test]
    fn test_format_meta_alert_rejects_bad_price() {
        let record = record("BULLISH", "M1", json!("abc"));
        assert!(format_meta_alert(&record, &routed("BULLISH", "M1"), fixed_time()).is_err());
    }

    #[test]
    fn test_format_long_utc_midnight_and_noon() {
        let midnight = Utc.with_ymd_and_hms(2025, 1, 2, 0, 7, 0).unwrap();
        assert_eq!(format_long_utc(midnight), "January 2, 2025, 12:07 AM");

        let noon = Utc.with_ymd_and_hms(2025, 7, 30, 12, 0, 0).unwrap();
        assert_eq!(format_long_utc(noon), "July 30, 2025, 12:00 PM");
    }

    #[test]
    fn test_format_tradingview_alert() {
        let alert = TradingViewAlert::from_value(&json!({
            "pair": "BTCUSDT",
            "event": "Breakout",
            "timeframe": "1h",
            "timestamp": "2026-10-18T15:05:00Z",
            "volume": 1520.5
        }));

        assert_eq!(
            format_tradingview_alert(&alert),
            "📡 *Alert Triggered!*\n\n\
             *Pair:* BTCUSDT\n\
             *Event:* Breakout\n\
             *Timeframe:* 1h\n\
             *Timestamp:* October 18, 2026, 3:05 PM UTC\n\
             *Volume:* 1520.5"
        );
    }

    #[test]
    fn test_format_tradingview_missing_fields() {
        let alert = TradingViewAlert::from_value(&json!({"pair": null}));
        let message = format_tradingview_alert(&alert);

        assert!(message.contains("*Pair:* null\n"));
        assert!(message.contains("*Event:* undefined\n"));
        assert!(message.contains("*Timestamp:* Invalid Date UTC\n"));
        assert!(message.ends_with("*Volume:* undefined"));
    }

    #[test]
    fn test_format_tradingview_whole_volume_and_null_timestamp() {
        let alert = TradingViewAlert::from_value(&json!({
            "pair": "ETHUSDT",
            "timestamp": null,
            "volume": 1500.0
        }));
        let message = format_tradingview_alert(&alert);

        assert!(message.contains("*Timestamp:* January 1, 1970, 12:00 AM UTC\n"));
        assert!(message.ends_with("*Volume:* 1500"));

        let fractional = TradingViewAlert::from_value(&json!({"volume": 0.25}));
        assert!(format_tradingview_alert(&fractional).ends_with("*Volume:* 0.25"));
    }

    #[test]
    fn test_parse_alert_time_variants() {
        assert_eq!(parse_alert_time(&json!(1_791_990_300_000_i64)).map(|t| t.timestamp()), Some(1_791_990_300));
        assert!(parse_alert_time(&json!("2026-10-18")).is_some());
        assert!(parse_alert_time(&json!("yesterday")).is_none());
        assert!(parse_alert_time(&json!(true)).is_none());
    }

    #[test]
    fn test_format_welcome() {
        let message = format_welcome(Some("Alice"), "https://t.me/+invite");
        assert!(message.starts_with("👋 Hi *Alice*!"));
        assert!(message.ends_with("👉 [Join Now](https://t.me/+invite)"));

        assert!(format_welcome(None, "link").contains("Hi *friend*!"));
        assert!(format_welcome(Some(""), "link").contains("Hi *friend*!"));
    }
}
