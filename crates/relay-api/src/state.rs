//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! 요청 간 공유되는 가변 상태는 없습니다. 중계기와 HTTP 클라이언트는 불변이며
//! Arc로 래핑되어 핸들러에 주입됩니다.

use std::sync::Arc;

use relay_core::RelayConfig;
use relay_notification::{AlertDispatcher, AlertRelay, NotificationResult, TelegramDispatcher};
use tracing::warn;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 알림 중계기
    pub relay: AlertRelay,

    /// 전송기 이름 (헬스 체크 표시용)
    pub dispatcher_name: String,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 전송기와 채널 초대 링크로 상태를 생성합니다.
    pub fn new(dispatcher: Arc<dyn AlertDispatcher>, channel_link: impl Into<String>) -> Self {
        let dispatcher_name = dispatcher.name().to_string();

        Self {
            relay: AlertRelay::new(dispatcher, channel_link),
            dispatcher_name,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 설정에서 텔레그램 전송기를 만들어 상태를 생성합니다.
    pub fn from_config(config: &RelayConfig) -> NotificationResult<Self> {
        let dispatcher = TelegramDispatcher::from_settings(&config.telegram)?;

        if config.telegram.channel_link.is_empty() {
            warn!("Channel link not configured, /start replies will have an empty join link");
        }

        Ok(Self::new(
            Arc::new(dispatcher),
            config.telegram.channel_link.clone(),
        ))
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}
