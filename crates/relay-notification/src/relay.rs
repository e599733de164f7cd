//! 알림 중계.
//!
//! 요청 하나를 레코드 파싱 → 분류 → 포맷 → 전송 순서로 처리하고
//! 결과를 [`RelayOutcome`] 또는 [`RelayError`]로 돌려줍니다.
//!
//! 전송은 요청당 최대 한 번이며 실패해도 재시도하지 않습니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::counter;
use relay_core::{
    alert_span, classify, format_meta_alert, format_tradingview_alert, format_welcome,
    AlertError, AlertRecord, AlertSource, Classification, Destination, TradingViewAlert,
};
use serde_json::Value;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::bot_handler::{BotCommand, BotReply, TelegramUpdate};
use crate::types::{AlertDispatcher, NotificationError};

/// 중계 작업용 Result 타입.
pub type RelayResult<T> = Result<T, RelayError>;

/// 정상 처리 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// 채널로 전송됨
    Dispatched { destination: Destination },
    /// 인식하지 못한 신호라서 전송하지 않음
    Suppressed,
}

impl RelayOutcome {
    fn label(&self) -> &'static str {
        match self {
            Self::Dispatched { .. } => "dispatched",
            Self::Suppressed => "suppressed",
        }
    }
}

/// 중계 에러.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// 페이로드 검증 실패. 전송을 시도하지 않습니다.
    #[error(transparent)]
    InvalidPayload(#[from] AlertError),

    /// 봇 업데이트에 메시지가 없음
    #[error("업데이트에 메시지가 없습니다")]
    MissingMessage,

    /// 전송 실패
    #[error("전송 실패: {0}")]
    DispatchFailure(#[from] NotificationError),
}

impl RelayError {
    /// 호출자 입력 문제인지 확인합니다.
    pub fn is_invalid_payload(&self) -> bool {
        matches!(self, Self::InvalidPayload(_) | Self::MissingMessage)
    }

    fn label(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) | Self::MissingMessage => "invalid_payload",
            Self::DispatchFailure(_) => "dispatch_failure",
        }
    }
}

/// 알림 중계기.
#[derive(Clone)]
pub struct AlertRelay {
    dispatcher: Arc<dyn AlertDispatcher>,
    channel_link: String,
}

impl AlertRelay {
    /// 새 중계기를 생성합니다.
    pub fn new(dispatcher: Arc<dyn AlertDispatcher>, channel_link: impl Into<String>) -> Self {
        Self {
            dispatcher,
            channel_link: channel_link.into(),
        }
    }

    /// MetaTrader 알림 본문을 처리합니다. 메시지 시각은 현재 시각입니다.
    pub async fn relay_meta(&self, body: &str) -> RelayResult<RelayOutcome> {
        let request_id = Uuid::new_v4();
        let result = match AlertRecord::parse(body) {
            Ok(record) => {
                let span = alert_span!("meta_alert", request_id, record.symbol);
                self.relay_record(record, Utc::now()).instrument(span).await
            }
            Err(e) => {
                warn!(%request_id, error = %e, "Rejected MetaTrader payload");
                Err(e.into())
            }
        };

        record_outcome(AlertSource::MetaTrader, &result);
        result
    }

    /// 검증된 레코드를 분류하고 전송합니다.
    pub async fn relay_record(
        &self,
        record: AlertRecord,
        dispatched_at: DateTime<Utc>,
    ) -> RelayResult<RelayOutcome> {
        let result = match classify(&record.signal, &record.timeframe) {
            Classification::Suppressed => {
                info!(signal = %record.signal, "Ignoring unrecognized signal");
                return Ok(RelayOutcome::Suppressed);
            }
            Classification::Routed(result) => result,
        };

        let message = format_meta_alert(&record, &result, dispatched_at)?;
        let destination = result.destination;

        self.dispatcher.send(destination, &message).await?;

        info!(
            %destination,
            signal = %record.signal,
            label = %result.display_label,
            "MT5 alert sent to Telegram"
        );
        Ok(RelayOutcome::Dispatched { destination })
    }

    /// 차트 플랫폼 알림을 일반 채널로 전송합니다.
    pub async fn relay_tradingview(&self, payload: &Value) -> RelayResult<RelayOutcome> {
        let request_id = Uuid::new_v4();
        let alert = TradingViewAlert::from_value(payload);
        let message = format_tradingview_alert(&alert);

        let result = async {
            self.dispatcher.send(Destination::Main, &message).await?;
            info!("Alert sent to Telegram channel");
            Ok::<_, RelayError>(RelayOutcome::Dispatched {
                destination: Destination::Main,
            })
        }
        .instrument(alert_span!("tradingview_alert", request_id))
        .await;

        record_outcome(AlertSource::TradingView, &result);
        result
    }

    /// 봇 웹훅 업데이트를 처리합니다.
    ///
    /// `/start`에만 인사말로 답하고 그 외에는 아무것도 보내지 않습니다.
    pub async fn handle_update(&self, payload: &Value) -> RelayResult<BotReply> {
        let update: TelegramUpdate =
            serde_json::from_value(payload.clone()).map_err(AlertError::from)?;
        let message = update.message.ok_or(RelayError::MissingMessage)?;

        let Some(text) = message.text.as_deref() else {
            return Ok(BotReply::Ignored);
        };

        match BotCommand::parse(text) {
            BotCommand::Start => {
                let welcome =
                    format_welcome(message.chat.first_name.as_deref(), &self.channel_link);
                self.dispatcher.reply(message.chat.id, &welcome).await?;
                info!(chat_id = message.chat.id, "Sent welcome message");
                Ok(BotReply::WelcomeSent)
            }
            BotCommand::Unknown(_) => Ok(BotReply::Ignored),
        }
    }
}

fn record_outcome(source: AlertSource, result: &RelayResult<RelayOutcome>) {
    let outcome = match result {
        Ok(outcome) => outcome.label(),
        Err(e) => e.label(),
    };
    counter!("relay_alerts_total", "source" => source.as_str(), "outcome" => outcome).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::Mutex;

    use crate::types::NotificationResult;

    #[derive(Debug, Clone, PartialEq)]
    enum Sent {
        Channel(Destination, String),
        Reply(i64, String),
    }

    #[derive(Default)]
    struct RecordingDispatcher {
        sent: Mutex<Vec<Sent>>,
        fail: bool,
    }

    impl RecordingDispatcher {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AlertDispatcher for RecordingDispatcher {
        async fn send(&self, destination: Destination, text: &str) -> NotificationResult<()> {
            if self.fail {
                return Err(NotificationError::SendFailed("HTTP 500".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push(Sent::Channel(destination, text.to_string()));
            Ok(())
        }

        async fn reply(&self, chat_id: i64, text: &str) -> NotificationResult<()> {
            if self.fail {
                return Err(NotificationError::SendFailed("HTTP 500".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push(Sent::Reply(chat_id, text.to_string()));
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn relay_with(dispatcher: Arc<RecordingDispatcher>) -> AlertRelay {
        AlertRelay::new(dispatcher, "https://t.me/+invite")
    }

    #[tokio::test]
    async fn test_relay_record_uses_dispatch_time() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let relay = relay_with(dispatcher.clone());
        let record = AlertRecord::from_value(json!({
            "symbol": "EURUSD",
            "signal": "BEARISH",
            "timeframe": "M15",
            "price": 1.08,
            "timestamp": "2001-01-01T00:00:00Z"
        }))
        .unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();

        let outcome = relay.relay_record(record, now).await.unwrap();

        assert_eq!(outcome, RelayOutcome::Dispatched { destination: Destination::Main });
        let sent = dispatcher.sent();
        let Sent::Channel(Destination::Main, text) = &sent[0] else {
            panic!("unexpected dispatch: {sent:?}");
        };
        assert!(text.contains("*Time:* October 18, 2026, 9:30 AM UTC"));
        assert!(!text.contains("2001"));
    }

    #[tokio::test]
    async fn test_relay_meta_suppressed_does_not_dispatch() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let relay = relay_with(dispatcher.clone());

        let outcome = relay
            .relay_meta(r#"{"symbol":"EURUSD","signal":"NOISE_123","timeframe":"M1","price":1}"#)
            .await
            .unwrap();

        assert_eq!(outcome, RelayOutcome::Suppressed);
        assert!(dispatcher.sent().is_empty());
    }

    #[tokio::test]
    async fn test_relay_meta_bad_price_does_not_dispatch() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let relay = relay_with(dispatcher.clone());

        let err = relay
            .relay_meta(r#"{"symbol":"EURUSD","signal":"BULLISH","price":"abc"}"#)
            .await
            .unwrap_err();

        assert!(err.is_invalid_payload());
        assert!(dispatcher.sent().is_empty());
    }

    #[tokio::test]
    async fn test_relay_meta_dispatch_failure() {
        let relay = relay_with(Arc::new(RecordingDispatcher::failing()));

        let err = relay
            .relay_meta(r#"{"symbol":"EURUSD","signal":"TREND_UP","price":1}"#)
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::DispatchFailure(_)));
        assert!(!err.is_invalid_payload());
    }

    #[tokio::test]
    async fn test_relay_tradingview_always_main() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let relay = relay_with(dispatcher.clone());

        let outcome = relay
            .relay_tradingview(&json!({"pair": "BTCUSDT", "event": "TREND_UP"}))
            .await
            .unwrap();

        assert_eq!(outcome, RelayOutcome::Dispatched { destination: Destination::Main });
        let sent = dispatcher.sent();
        assert_eq!(sent.len(), 1);
        let Sent::Channel(Destination::Main, text) = &sent[0] else {
            panic!("unexpected dispatch: {sent:?}");
        };
        assert!(text.contains("*Event:* TREND_UP"));
        assert!(text.contains("*Volume:* undefined"));
    }

    #[tokio::test]
    async fn test_handle_update_start_sends_welcome() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let relay = relay_with(dispatcher.clone());

        let reply = relay
            .handle_update(&json!({"message": {"chat": {"id": 7, "first_name": "Ann"}, "text": "/Start"}}))
            .await
            .unwrap();

        assert_eq!(reply, BotReply::WelcomeSent);
        let sent = dispatcher.sent();
        let Sent::Reply(7, text) = &sent[0] else {
            panic!("unexpected dispatch: {sent:?}");
        };
        assert!(text.contains("Hi *Ann*!"));
        assert!(text.contains("(https://t.me/+invite)"));
    }

    #[tokio::test]
    async fn test_handle_update_other_messages_are_ignored() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let relay = relay_with(dispatcher.clone());

        let with_text = json!({"message": {"chat": {"id": 7}, "text": "hello"}});
        let without_text = json!({"message": {"chat": {"id": 7}}});

        assert_eq!(relay.handle_update(&with_text).await.unwrap(), BotReply::Ignored);
        assert_eq!(relay.handle_update(&without_text).await.unwrap(), BotReply::Ignored);
        assert!(dispatcher.sent().is_empty());
    }

    #[tokio::test]
    async fn test_handle_update_without_message() {
        let relay = relay_with(Arc::new(RecordingDispatcher::default()));

        let err = relay.handle_update(&json!({"update_id": 1})).await.unwrap_err();
        assert!(matches!(err, RelayError::MissingMessage));

        let err = relay
            .handle_update(&json!({"message": {"text": "/start"}}))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::InvalidPayload(_)));
    }
}
