use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use super::message::Message;

/// 그룹과 담당 교수 사이의 대화방. (group_id, teacher_id) 쌍마다 하나
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub group_id: String,
    pub teacher_id: String,
    pub created_at: DateTime,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime>,
}

impl Conversation {
    pub fn new(group_id: String, teacher_id: String) -> Self {
        Self {
            id: None,
            group_id,
            teacher_id,
            created_at: DateTime::now(),
            last_message: None,
            last_message_at: None,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn record_message(&mut self, message: &Message) {
        self.last_message = Some(message.content.clone());
        self.last_message_at = Some(message.sent_at);
    }
}
