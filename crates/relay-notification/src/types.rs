//! 전송 에러 및 전송기 trait 정의.

use async_trait::async_trait;
use relay_core::Destination;

/// 알림 작업용 Result 타입.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// 알림 에러.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("알림 전송 실패: {0}")]
    SendFailed(String),

    #[error("잘못된 설정: {0}")]
    InvalidConfig(String),

    #[error("요청 한도 초과: {0}초 후 재시도")]
    RateLimited(u64),

    #[error("네트워크 에러: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// 메시지 전송기 trait.
///
/// 요청마다 정확히 한 번 호출되며 재시도나 큐잉을 하지 않습니다.
#[async_trait]
pub trait AlertDispatcher: Send + Sync {
    /// 목적지 채널로 메시지를 전송합니다.
    async fn send(&self, destination: Destination, text: &str) -> NotificationResult<()>;

    /// 일반 채널 봇으로 임의의 채팅에 답장합니다 (봇 명령어 응답용).
    async fn reply(&self, chat_id: i64, text: &str) -> NotificationResult<()>;

    /// 전송기 이름을 반환합니다.
    fn name(&self) -> &str;
}
