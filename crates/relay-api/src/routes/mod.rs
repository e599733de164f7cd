//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/` - 서비스 배너
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/tradingview-webhook` - 차트 플랫폼 알림
//! - `/telegram-webhook` - 텔레그램 봇 업데이트
//! - `/meta` - MetaTrader EA 알림

pub mod health;
pub mod meta;
pub mod telegram;
pub mod tradingview;

pub use health::{banner, health_router, HealthResponse, BANNER};
pub use meta::meta_webhook;
pub use telegram::telegram_webhook;
pub use tradingview::tradingview_webhook;

use axum::{
    body::Bytes,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult, INVALID_PAYLOAD_BODY};
use crate::state::AppState;

/// API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(banner))
        .nest("/health", health_router())
        .route("/tradingview-webhook", post(tradingview_webhook))
        .route("/telegram-webhook", post(telegram_webhook))
        .route("/meta", post(meta_webhook))
}

/// 요청 본문을 JSON으로 해석합니다. 빈 본문은 빈 객체로 취급합니다.
pub(crate) fn parse_json_body(body: &Bytes) -> ApiResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(body).map_err(|_| ApiError::BadRequest(INVALID_PAYLOAD_BODY))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_body() {
        assert_eq!(
            parse_json_body(&Bytes::new()).unwrap(),
            Value::Object(Default::default())
        );
        assert_eq!(
            parse_json_body(&Bytes::from_static(b"{\"pair\":\"BTC\"}")).unwrap()["pair"],
            "BTC"
        );
        assert_eq!(
            parse_json_body(&Bytes::from_static(b"{oops")),
            Err(ApiError::BadRequest(INVALID_PAYLOAD_BODY))
        );
    }
}
