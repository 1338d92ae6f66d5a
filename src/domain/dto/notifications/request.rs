use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

/// 프로젝트 생성/마감 알림. 지정한 그룹의 학생 전원에게 발송
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProjectNotificationRequest {
    #[validate(length(min = 1, message = "Le projet est obligatoire"))]
    pub project_id: String,

    #[validate(length(min = 1, message = "Au moins un groupe est requis"))]
    pub group_ids: Vec<String>,

    /// 마감 알림에서 프로젝트 종료일 대신 표시할 날짜
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomNotificationRequest {
    #[validate(length(min = 1, message = "Au moins un destinataire est requis"))]
    pub recipient_ids: Vec<String>,

    #[validate(length(min = 1, max = 200, message = "Le titre est obligatoire"))]
    pub title: String,

    #[validate(length(min = 1, message = "Le message est obligatoire"))]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notification_requests_need_recipients() {
        let project: ProjectNotificationRequest =
            serde_json::from_value(json!({ "project_id": "p1", "group_ids": [] })).unwrap();
        assert!(project.validate().is_err());

        let custom: CustomNotificationRequest = serde_json::from_value(json!({
            "recipient_ids": ["u1", "u2"],
            "title": "Soutenance",
            "message": "La soutenance aura lieu lundi",
        }))
        .unwrap();
        assert!(custom.validate().is_ok());
    }
}
