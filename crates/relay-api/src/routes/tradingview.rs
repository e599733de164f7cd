//! 차트 플랫폼(TradingView) 알림 웹훅.

use axum::{body::Bytes, extract::State};
use std::sync::Arc;
use tracing::error;

use super::parse_json_body;
use crate::error::{ApiError, ApiResult, SEND_FAILED_BODY};
use crate::state::AppState;

/// 알림을 일반 채널로 전달합니다.
///
/// POST /tradingview-webhook
pub async fn tradingview_webhook(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<&'static str> {
    let payload = parse_json_body(&body)?;

    state
        .relay
        .relay_tradingview(&payload)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to send TradingView alert");
            ApiError::from_relay(&e, SEND_FAILED_BODY)
        })?;

    Ok("OK")
}
