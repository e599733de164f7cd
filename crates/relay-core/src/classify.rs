//! 신호 분류 및 채널 라우팅.
//!
//! MetaTrader 신호 태그를 보고 다음을 결정합니다:
//! - 표시 라벨 (우선순위 규칙, 첫 번째 일치 적용)
//! - 타임프레임 아이콘
//! - 목적지 채널 (`MAIN` / `TREND`) 또는 무시(Suppressed)
//!
//! 라벨 규칙과 채널 선택은 서로 독립된 두 번의 부분 문자열 검사입니다.
//! `BULLISH_TREND` 같은 태그는 라벨이 "Bullish"이면서 `TREND` 채널로 갑니다.

use crate::types::Destination;

pub const BULLISH_MARKER: &str = "BULLISH";
pub const BEARISH_MARKER: &str = "BEARISH";
pub const CROSS_MARKER: &str = "CROSS";
pub const VOLUME_SPIKE_MARKER: &str = "VOLUME_SPIKE";
pub const TREND_MARKER: &str = "TREND";

const TREND_PREFIX: &str = "TREND_";
const TREND_LABEL_PREFIX: &str = "Trend ";

/// 신호 종류. 선언 순서가 곧 매칭 우선순위입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Bullish,
    Bearish,
    Cross,
    VolumeSpike,
    Trend,
}

impl SignalKind {
    const PRIORITY: [SignalKind; 5] = [
        SignalKind::Bullish,
        SignalKind::Bearish,
        SignalKind::Cross,
        SignalKind::VolumeSpike,
        SignalKind::Trend,
    ];

    /// 태그에서 찾을 부분 문자열 (대소문자 구분).
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Bullish => BULLISH_MARKER,
            Self::Bearish => BEARISH_MARKER,
            Self::Cross => CROSS_MARKER,
            Self::VolumeSpike => VOLUME_SPIKE_MARKER,
            Self::Trend => TREND_MARKER,
        }
    }

    /// 우선순위대로 검사해 처음 일치하는 종류를 반환합니다.
    pub fn detect(signal: &str) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|kind| signal.contains(kind.marker()))
    }

    /// 표시 라벨.
    ///
    /// 추세 신호만 고정 라벨이 아니라 태그의 첫 `TREND_`를 `Trend `로 바꾼 값을 씁니다.
    pub fn label(&self, signal: &str) -> String {
        match self {
            Self::Bullish => "Bullish".to_string(),
            Self::Bearish => "Bearish".to_string(),
            Self::Cross => "EMA/SMA Cross".to_string(),
            Self::VolumeSpike => "Volume Spike".to_string(),
            Self::Trend => signal.replacen(TREND_PREFIX, TREND_LABEL_PREFIX, 1),
        }
    }
}

/// 아이콘이 있는 타임프레임.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    M1,
    M5,
    M15,
}

impl Timeframe {
    /// 코드 정확히 일치할 때만 인식합니다.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M1" => Some(Self::M1),
            "M5" => Some(Self::M5),
            "M15" => Some(Self::M15),
            _ => None,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::M1 => "⚡",
            Self::M5 => "⏱️",
            Self::M15 => "🕒",
        }
    }
}

/// 타임프레임 아이콘. 알 수 없는 코드는 `None`이며 에러가 아닙니다.
pub fn timeframe_icon(timeframe: &str) -> Option<&'static str> {
    Timeframe::from_code(timeframe).map(|tf| tf.icon())
}

/// 원본 태그 기준 목적지 채널.
pub fn destination_for(signal: &str) -> Destination {
    if signal.contains(TREND_MARKER) {
        Destination::Trend
    } else {
        Destination::Main
    }
}

/// 분류 결과 (전송 대상).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub kind: SignalKind,
    pub display_label: String,
    pub icon: Option<&'static str>,
    pub destination: Destination,
}

/// 분류 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// 채널로 전송할 신호
    Routed(ClassificationResult),
    /// 인식할 수 없는 신호 (에러가 아닌 정상적인 무시)
    Suppressed,
}

impl Classification {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppressed)
    }
}

/// 신호 태그와 타임프레임을 분류합니다.
pub fn classify(signal: &str, timeframe: &str) -> Classification {
    let Some(kind) = SignalKind::detect(signal) else {
        return Classification::Suppressed;
    };

    Classification::Routed(ClassificationResult {
        kind,
        display_label: kind.label(signal),
        icon: timeframe_icon(timeframe),
        destination: destination_for(signal),
    })
}
