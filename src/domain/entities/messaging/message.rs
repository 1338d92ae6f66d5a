use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// 읽음 상태는 참여자별로 `read_by`에 기록
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub conversation_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    pub sent_at: DateTime,
    #[serde(default)]
    pub read_by: Vec<String>,
}

impl Message {
    pub fn new(conversation_id: String, sender_id: String, sender_name: String, content: String) -> Self {
        Self {
            id: None,
            conversation_id,
            sender_id,
            sender_name,
            content,
            sent_at: DateTime::now(),
            read_by: Vec::new(),
        }
    }

    /// 보낸 사람에게는 항상 읽은 메시지
    pub fn is_read_by(&self, user_id: &str) -> bool {
        self.sender_id == user_id || self.read_by.iter().any(|id| id == user_id)
    }

    pub fn mark_read_by(&mut self, user_id: &str) -> bool {
        if self.is_read_by(user_id) {
            return false;
        }
        self.read_by.push(user_id.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::messaging::Conversation;

    #[test]
    fn test_recording_message_updates_preview() {
        let mut conversation = Conversation::new("g1".into(), "t1".into());
        let message = Message::new("c1".into(), "s1".into(), "Alice".into(), "Bonjour".into());

        conversation.record_message(&message);

        assert!(message.read_by.is_empty());
        assert_eq!(conversation.last_message.as_deref(), Some("Bonjour"));
        assert_eq!(conversation.last_message_at, Some(message.sent_at));
    }

    #[test]
    fn test_read_state_is_per_reader() {
        let mut message = Message::new("c1".into(), "prof".into(), "M. Sow".into(), "Rendu vendredi".into());
        assert!(message.is_read_by("prof"));
        assert!(!message.is_read_by("s1"));

        assert!(message.mark_read_by("s1"));
        assert!(!message.mark_read_by("s1"));
        assert!(!message.mark_read_by("prof"));

        assert!(message.is_read_by("s1"));
        assert!(!message.is_read_by("s2"));
        assert_eq!(message.read_by, vec!["s1".to_string()]);
    }
}
