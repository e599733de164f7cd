//! 텔레그램 전송 서비스.
//!
//! Telegram Bot API `sendMessage`로 포맷된 알림을 채널에 전송합니다.
//! 채널마다 봇/채팅 한 쌍을 쓰며 (`MAIN`, `TREND`), 요청당 한 번만 시도합니다.

use std::time::Duration;

use async_trait::async_trait;
use relay_core::config::{ChannelCredentials, TelegramSettings};
use relay_core::Destination;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::types::{AlertDispatcher, NotificationError, NotificationResult};

/// 기본 Bot API 주소.
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// 429 응답에 `retry_after`가 없을 때 보고할 대기 시간 (초).
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// 텔레그램 채널 전송 설정.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// @BotFather에서 받은 봇 토큰
    pub bot_token: String,
    /// 메시지를 보낼 채팅 ID
    pub chat_id: String,
    /// 파싱 모드
    pub parse_mode: String,
    /// Bot API 기본 URL
    pub api_base_url: String,
}

impl TelegramConfig {
    /// 새 텔레그램 설정을 생성합니다.
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            parse_mode: "Markdown".to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// 채널 자격증명과 API 주소로 설정을 생성합니다.
    pub fn from_credentials(credentials: &ChannelCredentials, api_base_url: &str) -> Self {
        Self::new(credentials.bot_token.trim(), credentials.chat_id.trim())
            .with_api_base_url(api_base_url)
    }

    /// Bot API 기본 URL을 설정합니다.
    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base_url, self.bot_token)
    }
}

/// 텔레그램 메시지 전송기.
pub struct TelegramSender {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramSender {
    /// 새 텔레그램 전송기를 생성합니다.
    pub fn new(config: TelegramConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// 공유 HTTP 클라이언트로 전송기를 생성합니다.
    pub fn with_client(config: TelegramConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &TelegramConfig {
        &self.config
    }

    /// 설정된 채팅으로 메시지를 전송합니다.
    pub async fn send_text(&self, text: &str) -> NotificationResult<()> {
        let chat_id = Value::String(self.config.chat_id.clone());
        self.send_message(chat_id, text, false).await
    }

    /// 지정한 채팅으로 메시지를 전송합니다. 링크 미리보기는 끕니다.
    pub async fn send_to_chat(&self, chat_id: i64, text: &str) -> NotificationResult<()> {
        self.send_message(json!(chat_id), text, true).await
    }

    /// 텔레그램에 원시 메시지를 전송합니다.
    async fn send_message(
        &self,
        chat_id: Value,
        text: &str,
        disable_preview: bool,
    ) -> NotificationResult<()> {
        let mut params = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": self.config.parse_mode,
        });
        if disable_preview {
            params["disable_web_page_preview"] = Value::Bool(true);
        }

        debug!(chat_id = %chat_id, "Sending Telegram message");

        let response = self
            .client
            .post(self.config.send_message_url())
            .json(&params)
            .send()
            .await
            .map_err(NotificationError::NetworkError)?;

        if response.status().is_success() {
            info!(chat_id = %chat_id, "Telegram message sent successfully");
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        // 요청 한도 제한 확인
        if status.as_u16() == 429 {
            let retry_after = retry_after_secs(&body).unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            warn!(retry_after, "Telegram rate limited");
            return Err(NotificationError::RateLimited(retry_after));
        }

        error!("Failed to send Telegram message: {} - {}", status, body);
        Err(NotificationError::SendFailed(format!(
            "HTTP {}: {}",
            status, body
        )))
    }
}

/// 429 응답 본문의 `parameters.retry_after` 값.
fn retry_after_secs(body: &str) -> Option<u64> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("parameters")?.get("retry_after")?.as_u64()
}

/// 채널별 텔레그램 전송기.
///
/// `MAIN`과 `TREND` 채널이 각자의 봇 토큰을 가지며 HTTP 클라이언트는 공유합니다.
pub struct TelegramDispatcher {
    main: TelegramSender,
    trend: TelegramSender,
}

impl TelegramDispatcher {
    /// 두 채널 전송기로 생성합니다.
    pub fn new(main: TelegramSender, trend: TelegramSender) -> Self {
        Self { main, trend }
    }

    /// 설정에서 생성합니다. 추세 채널이 없으면 일반 채널 자격증명을 재사용합니다.
    ///
    /// # Errors
    /// 일반 채널 자격증명이 비어 있거나 HTTP 클라이언트를 만들 수 없는 경우.
    pub fn from_settings(settings: &TelegramSettings) -> NotificationResult<Self> {
        if !settings.main.is_configured() {
            return Err(NotificationError::InvalidConfig(
                "일반 채널 봇 토큰 또는 채팅 ID가 비어 있습니다".to_string(),
            ));
        }
        if !settings.trend.is_configured() {
            warn!("Trend channel not configured, trend alerts will use the main channel");
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        let main = TelegramSender::with_client(
            TelegramConfig::from_credentials(&settings.main, &settings.api_base_url),
            client.clone(),
        );
        let trend = TelegramSender::with_client(
            TelegramConfig::from_credentials(settings.trend_or_main(), &settings.api_base_url),
            client,
        );

        Ok(Self::new(main, trend))
    }

    /// 목적지 채널의 전송기.
    pub fn sender(&self, destination: Destination) -> &TelegramSender {
        match destination {
            Destination::Main => &self.main,
            Destination::Trend => &self.trend,
        }
    }
}

#[async_trait]
impl AlertDispatcher for TelegramDispatcher {
    async fn send(&self, destination: Destination, text: &str) -> NotificationResult<()> {
        debug!(%destination, "Dispatching alert");
        self.sender(destination).send_text(text).await
    }

    async fn reply(&self, chat_id: i64, text: &str) -> NotificationResult<()> {
        self.main.send_to_chat(chat_id, text).await
    }

    fn name(&self) -> &str {
        "telegram"
    }
}
