//! # Relay Core
//!
//! 트레이딩 알림 중계기의 핵심 로직을 제공합니다.
//!
//! - 알림 레코드 파싱 및 검증 ([`alert`])
//! - 신호 분류 및 채널 라우팅 ([`classify`])
//! - 텔레그램 메시지 포맷 ([`format`])
//! - 설정 관리 ([`config`])
//! - 로깅 인프라 ([`logging`])
//!
//! 분류와 포맷은 상태가 없는 순수 함수라서 요청 간 동기화가 필요 없습니다.

pub mod alert;
pub mod classify;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod types;

pub use alert::{AlertRecord, TradingViewAlert};
pub use classify::{classify, Classification, ClassificationResult, SignalKind, Timeframe};
pub use self::config::*;
pub use error::*;
pub use format::{format_meta_alert, format_tradingview_alert, format_welcome};
pub use logging::*;
pub use types::*;
