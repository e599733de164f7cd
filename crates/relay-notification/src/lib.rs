//! # Relay Notification
//!
//! 알림 전송 및 중계 서비스.
//!
//! - [`telegram`]: Telegram Bot API 전송기 (`MAIN` / `TREND` 채널)
//! - [`bot_handler`]: 봇 웹훅 업데이트와 `/start` 명령어
//! - [`relay`]: 요청 단위 파싱 → 분류 → 포맷 → 전송

pub mod bot_handler;
pub mod relay;
pub mod telegram;
pub mod types;

pub use bot_handler::*;
pub use relay::*;
pub use telegram::*;
pub use types::*;
