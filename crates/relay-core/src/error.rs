//! 알림 처리 에러 타입.
//!
//! 외부에서 들어온 알림 페이로드를 검증하고 포맷하는 과정에서 발생하는 에러를 정의합니다.

use thiserror::Error;

/// 알림 레코드 처리 에러.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlertError {
    /// 잘못된 페이로드 (JSON 파싱 실패, 필수 필드 누락, 숫자 변환 실패)
    #[error("잘못된 페이로드: {0}")]
    InvalidPayload(String),
}

impl AlertError {
    /// 잘못된 페이로드 에러를 생성합니다.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidPayload(message.into())
    }
}

impl From<serde_json::Error> for AlertError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidPayload(format!("JSON 파싱 실패: {err}"))
    }
}

/// 알림 처리 작업을 위한 Result 타입.
pub type AlertResult<T> = Result<T, AlertError>;
