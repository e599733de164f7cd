//! 신호 중계 웹훅 서버.
//!
//! 차트 플랫폼, 텔레그램 봇, MetaTrader EA의 웹훅을 받아 텔레그램 채널로 전달하는
//! HTTP 계층을 제공합니다.

pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_api_router;
pub use state::AppState;
