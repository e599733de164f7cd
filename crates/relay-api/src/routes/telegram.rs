//! 텔레그램 봇 웹훅.

use axum::{body::Bytes, extract::State};
use relay_notification::BotReply;
use std::sync::Arc;
use tracing::{error, warn};

use super::parse_json_body;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// 인사말 전송 실패 응답 본문.
pub const WELCOME_FAILED_BODY: &str = "Failed to send welcome message";

/// 봇 업데이트를 처리합니다. `/start`에는 채널 초대 인사말로 답합니다.
///
/// POST /telegram-webhook
pub async fn telegram_webhook(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<&'static str> {
    let payload = parse_json_body(&body)?;

    match state.relay.handle_update(&payload).await {
        Ok(BotReply::WelcomeSent) => Ok("Welcome sent"),
        Ok(BotReply::Ignored) => Ok("OK"),
        Err(e) if e.is_invalid_payload() => {
            warn!(error = %e, "Rejected bot update");
            Err(ApiError::from_relay(&e, WELCOME_FAILED_BODY))
        }
        Err(e) => {
            error!(error = %e, "Failed to send welcome message");
            Err(ApiError::from_relay(&e, WELCOME_FAILED_BODY))
        }
    }
}
