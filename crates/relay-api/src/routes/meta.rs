//! MetaTrader EA 알림 웹훅.
//!
//! EA는 JSON 본문을 보내지만 Content-Type을 신뢰할 수 없고 끝에 NUL 바이트가
//! 붙기도 하므로 원시 본문을 받아 직접 해석합니다.

use axum::{body::Bytes, extract::State};
use relay_notification::RelayOutcome;
use std::sync::Arc;
use tracing::{error, warn};

use crate::error::{ApiError, ApiResult, INVALID_PAYLOAD_BODY, SEND_FAILED_BODY};
use crate::state::AppState;

/// 알림을 분류해 일반/추세 채널로 전달합니다.
///
/// 인식하지 못한 신호는 전송 없이 `Ignored`로 응답합니다.
/// POST /meta
pub async fn meta_webhook(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<&'static str> {
    let body = std::str::from_utf8(&body).map_err(|e| {
        warn!(error = %e, "MT5 payload is not valid UTF-8");
        ApiError::BadRequest(INVALID_PAYLOAD_BODY)
    })?;

    match state.relay.relay_meta(body).await {
        Ok(RelayOutcome::Dispatched { .. }) => Ok("OK"),
        Ok(RelayOutcome::Suppressed) => Ok("Ignored"),
        Err(e) if e.is_invalid_payload() => Err(ApiError::from_relay(&e, SEND_FAILED_BODY)),
        Err(e) => {
            error!(error = %e, "Failed to send MT5 alert");
            Err(ApiError::from_relay(&e, SEND_FAILED_BODY))
        }
    }
}
