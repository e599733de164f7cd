//! API 에러 응답.
//!
//! 웹훅 호출자(EA, 차트 플랫폼, 텔레그램)는 본문을 해석하지 않으므로
//! 상태 코드와 짧은 텍스트 본문만 돌려줍니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use relay_notification::RelayError;

/// 잘못된 페이로드 응답 본문.
pub const INVALID_PAYLOAD_BODY: &str = "Invalid payload";
/// 메시지 없는 봇 업데이트 응답 본문.
pub const NO_MESSAGE_BODY: &str = "No message found";
/// 알림 전송 실패 응답 본문.
pub const SEND_FAILED_BODY: &str = "Failed to send message";

/// 핸들러 에러.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// 400 - 호출자 입력 문제
    #[error("{0}")]
    BadRequest(&'static str),

    /// 500 - 외부 전송 실패
    #[error("{0}")]
    DispatchFailed(&'static str),
}

impl ApiError {
    /// 중계 에러를 응답으로 변환합니다. 전송 실패 본문은 라우트마다 다릅니다.
    pub fn from_relay(err: &RelayError, failure_body: &'static str) -> Self {
        match err {
            RelayError::InvalidPayload(_) => Self::BadRequest(INVALID_PAYLOAD_BODY),
            RelayError::MissingMessage => Self::BadRequest(NO_MESSAGE_BODY),
            RelayError::DispatchFailure(_) => Self::DispatchFailed(failure_body),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::DispatchFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self {
            Self::BadRequest(body) | Self::DispatchFailed(body) => body,
        };
        (self.status_code(), body).into_response()
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;
