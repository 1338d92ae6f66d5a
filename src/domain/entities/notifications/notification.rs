use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// 앱 내 알림. 메일 알림을 보낼 때 수신자별로 함께 저장됨
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub recipient_id: String,
    pub title: String,
    pub message: String,
    pub created_at: DateTime,
    pub read: bool,
}

impl Notification {
    pub fn new(recipient_id: String, title: String, message: String) -> Self {
        Self {
            id: None,
            recipient_id,
            title,
            message,
            created_at: DateTime::now(),
            read: false,
        }
    }
}
