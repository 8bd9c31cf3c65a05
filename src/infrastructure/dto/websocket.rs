//! WebSocket message DTOs for the collaborative editing application.

use serde::{Deserialize, Serialize};

/// Message type enum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    Role,
    CodeUpdate,
    CodeChange,
    StudentsCountUpdate,
    MentorLeft,
}

/// Role assignment sent once to a connection right after it joins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleMessage {
    pub r#type: MessageType,
    pub role: String,
}

/// Current code text; sent as the join snapshot and on every edit broadcast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeUpdateMessage {
    pub r#type: MessageType,
    pub code: String,
}

/// Code edit submitted by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeChangeMessage {
    pub r#type: MessageType,
    pub code: String,
}

/// Student count notification broadcast on any membership change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentsCountUpdateMessage {
    pub r#type: MessageType,
    pub count: usize,
}

/// Mentor departure notification broadcast immediately before dissolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorLeftMessage {
    pub r#type: MessageType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_wire_names() {
        // テスト項目: type タグはクライアントが期待する camelCase 名で直列化される
        // when (操作) / then (期待する結果):
        assert_eq!(
            serde_json::to_string(&MessageType::StudentsCountUpdate).unwrap(),
            "\"studentsCountUpdate\""
        );
        assert_eq!(
            serde_json::to_string(&MessageType::MentorLeft).unwrap(),
            "\"mentorLeft\""
        );
        assert_eq!(
            serde_json::to_string(&MessageType::CodeUpdate).unwrap(),
            "\"codeUpdate\""
        );
    }

    #[test]
    fn test_code_change_message_roundtrip() {
        // テスト項目: クライアントから届く codeChange メッセージを復元できる
        // given (前提条件):
        let json = r#"{"type":"codeChange","code":"x = 1"}"#;

        // when (操作):
        let msg: CodeChangeMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(msg.r#type, MessageType::CodeChange);
        assert_eq!(msg.code, "x = 1");
    }
}
