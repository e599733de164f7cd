//! 설정 관리.
//!
//! 설정은 다음 순서로 병합됩니다 (뒤가 우선):
//! 1. 기본값
//! 2. 설정 파일 (`config/default.toml`, 없어도 됨)
//! 3. `RELAY__` 접두사 환경 변수 (예: `RELAY__TELEGRAM__MAIN__BOT_TOKEN`)
//! 4. 기존 배포 환경 변수 (`PORT`, `TELEGRAM_TOKEN`, `CHANNEL_CHAT_ID`, `CHANNEL_LINK`,
//!    `TREND_TELEGRAM_TOKEN`, `TREND_CHANNEL_CHAT_ID`)

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 기존 배포 환경 변수와 설정 키 매핑.
const LEGACY_ENV_OVERRIDES: [(&str, &str); 6] = [
    ("PORT", "server.port"),
    ("TELEGRAM_TOKEN", "telegram.main.bot_token"),
    ("CHANNEL_CHAT_ID", "telegram.main.chat_id"),
    ("CHANNEL_LINK", "telegram.channel_link"),
    ("TREND_TELEGRAM_TOKEN", "telegram.trend.bot_token"),
    ("TREND_CHANNEL_CHAT_ID", "telegram.trend.chat_id"),
];

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 텔레그램 설정
    pub telegram: TelegramSettings,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 전체 타임아웃 (초)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// 텔레그램 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramSettings {
    /// Bot API 기본 URL
    pub api_base_url: String,
    /// 전송 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
    /// `/start` 인사말에 넣을 채널 초대 링크
    #[serde(default)]
    pub channel_link: String,
    /// 일반 신호 채널
    #[serde(default)]
    pub main: ChannelCredentials,
    /// 추세 신호 채널 (미설정 시 일반 채널 사용)
    #[serde(default)]
    pub trend: ChannelCredentials,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.telegram.org".to_string(),
            request_timeout_secs: 10,
            channel_link: String::new(),
            main: ChannelCredentials::default(),
            trend: ChannelCredentials::default(),
        }
    }
}

impl TelegramSettings {
    /// 추세 채널 자격증명. 설정되지 않았으면 일반 채널로 대체합니다.
    pub fn trend_or_main(&self) -> &ChannelCredentials {
        if self.trend.is_configured() {
            &self.trend
        } else {
            &self.main
        }
    }
}

/// 봇 토큰과 채팅 ID 한 쌍.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChannelCredentials {
    /// @BotFather에서 받은 봇 토큰
    #[serde(default)]
    pub bot_token: String,
    /// 메시지를 보낼 채팅 ID
    #[serde(default)]
    pub chat_id: String,
}

impl ChannelCredentials {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    /// 토큰과 채팅 ID가 모두 있는지 확인합니다.
    pub fn is_configured(&self) -> bool {
        !self.bot_token.trim().is_empty() && !self.chat_id.trim().is_empty()
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl RelayConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("server.request_timeout_secs", default_request_timeout())?
            .set_default("telegram.api_base_url", "https://api.telegram.org")?
            .set_default("telegram.request_timeout_secs", 10)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("RELAY")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in LEGACY_ENV_OVERRIDES {
            let value = std::env::var(var).ok().filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(key, value)?;
        }

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load(DEFAULT_CONFIG_PATH)
    }

    /// 필수 설정을 확인합니다.
    ///
    /// 일반 채널 자격증명은 반드시 있어야 합니다.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if !self.telegram.main.is_configured() {
            return Err(config::ConfigError::Message(
                "일반 채널 봇 토큰과 채팅 ID가 필요합니다 (TELEGRAM_TOKEN, CHANNEL_CHAT_ID)"
                    .to_string(),
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "server.request_timeout_secs는 0보다 커야 합니다".to_string(),
            ));
        }
        if self.telegram.request_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "telegram.request_timeout_secs는 0보다 커야 합니다".to_string(),
            ));
        }
        // 전송 타임아웃 < 라우터 타임아웃
        if self.telegram.request_timeout_secs >= self.server.request_timeout_secs {
            return Err(config::ConfigError::Message(format!(
                "telegram.request_timeout_secs({})는 server.request_timeout_secs({})보다 작아야 합니다",
                self.telegram.request_timeout_secs, self.server.request_timeout_secs
            )));
        }
        Ok(())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            telegram: TelegramSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}
