use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::dto::groups::GroupResponse;
use crate::domain::dto::users::UserSummary;
use crate::domain::entities::messaging::{Conversation, Message};
use crate::utils::time_utils::{opt_to_chrono, to_chrono};

#[derive(Debug, Clone, Serialize)]
pub struct ConversationResponse {
    pub id: String,
    pub group_id: String,
    pub teacher_id: String,
    pub created_at: DateTime<Utc>,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
}

impl From<Conversation> for ConversationResponse {
    fn from(conversation: Conversation) -> Self {
        Self {
            id: conversation.id_string().unwrap_or_default(),
            group_id: conversation.group_id,
            teacher_id: conversation.teacher_id,
            created_at: to_chrono(conversation.created_at),
            last_message: conversation.last_message,
            last_message_at: opt_to_chrono(conversation.last_message_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageResponse {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub read: bool,
}

impl ChatMessageResponse {
    /// `read`는 요청한 사용자 기준
    pub fn for_reader(message: Message, reader_id: &str) -> Self {
        let read = message.is_read_by(reader_id);
        Self {
            id: message.id.map(|id| id.to_hex()).unwrap_or_default(),
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            sender_name: message.sender_name,
            content: message.content,
            sent_at: to_chrono(message.sent_at),
            read,
        }
    }
}

/// 대화방 화면용 그룹 정보와 구성원
#[derive(Debug, Serialize)]
pub struct GroupMembersResponse {
    #[serde(flatten)]
    pub group: GroupResponse,
    pub students: Vec<UserSummary>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread: u64,
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub updated: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_flag_follows_reader() {
        let mut message = Message::new("c1".into(), "prof".into(), "M. Sow".into(), "Salut".into());
        message.mark_read_by("s1");

        assert!(ChatMessageResponse::for_reader(message.clone(), "s1").read);
        assert!(ChatMessageResponse::for_reader(message.clone(), "prof").read);
        assert!(!ChatMessageResponse::for_reader(message, "s2").read);
    }
}
