//! 라우팅 공통 타입.

use serde::{Deserialize, Serialize};

/// 메시지를 보낼 목적지 채널.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Destination {
    /// 일반 신호 채널
    Main,
    /// 추세 신호 전용 채널
    Trend,
}

impl Destination {
    /// 로그와 메트릭 라벨에 쓰는 채널 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "MAIN",
            Self::Trend => "TREND",
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 알림이 들어온 소스.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSource {
    /// 차트 플랫폼 웹훅
    TradingView,
    /// MetaTrader EA
    MetaTrader,
}

impl AlertSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TradingView => "tradingview",
            Self::MetaTrader => "metatrader",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_serializes_uppercase() {
        let json = serde_json::to_string(&Destination::Trend).unwrap();
        assert_eq!(json, r#""TREND""#);
        assert_eq!(Destination::Main.to_string(), "MAIN");
    }
}
