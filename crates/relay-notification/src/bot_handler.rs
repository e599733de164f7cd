//! 텔레그램 봇 명령어 처리.
//!
//! 웹훅으로 들어온 업데이트에서 명령어를 파싱합니다.
//! 응답을 보내는 명령어는 `/start` 하나뿐이며 나머지 메시지는 확인 응답만 합니다.

use serde::Deserialize;

/// 웹훅으로 받은 업데이트.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    #[serde(default)]
    pub message: Option<TelegramMessage>,
}

/// 메시지 정보.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    pub chat: TelegramChat,
    #[serde(default)]
    pub text: Option<String>,
}

/// 채팅 정보.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
}

/// 봇 명령어 타입.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// 인사말과 채널 초대 링크
    Start,
    /// 그 외 모든 메시지
    Unknown(String),
}

impl BotCommand {
    /// 텍스트에서 명령어 파싱.
    ///
    /// 소문자로 바꾼 뒤 정확히 `/start`인 경우만 인식합니다 (공백이나 인자 허용 안 함).
    pub fn parse(text: &str) -> Self {
        if text.to_lowercase() == "/start" {
            BotCommand::Start
        } else {
            BotCommand::Unknown(text.to_string())
        }
    }
}

/// 봇 업데이트 처리 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotReply {
    /// 인사말 전송 완료
    WelcomeSent,
    /// 응답 없이 확인만 함
    Ignored,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start_command() {
        assert_eq!(BotCommand::parse("/start"), BotCommand::Start);
        assert_eq!(BotCommand::parse("/START"), BotCommand::Start);
    }

    #[test]
    fn test_parse_other_text() {
        assert!(matches!(BotCommand::parse(" /start"), BotCommand::Unknown(_)));
        assert!(matches!(BotCommand::parse("/start now"), BotCommand::Unknown(_)));
        assert!(matches!(BotCommand::parse("/help"), BotCommand::Unknown(_)));
        assert!(matches!(BotCommand::parse(""), BotCommand::Unknown(_)));
    }

    #[test]
    fn test_deserialize_update() {
        let update: TelegramUpdate = serde_json::from_str(
            r#"{"update_id":1,"message":{"message_id":5,"chat":{"id":99,"first_name":"Bob","type":"private"},"text":"/start","date":0}}"#,
        )
        .unwrap();

        let message = update.message.unwrap();
        assert_eq!(message.chat.id, 99);
        assert_eq!(message.chat.first_name.as_deref(), Some("Bob"));
        assert_eq!(message.text.as_deref(), Some("/start"));
    }

    #[test]
    fn test_deserialize_update_without_message() {
        let update: TelegramUpdate = serde_json::from_str(r#"{"update_id":2}"#).unwrap();
        assert!(update.message.is_none());
    }
}
