use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateConversationRequest {
    #[validate(length(min = 1, message = "Le groupe est obligatoire"))]
    pub group_id: String,

    #[validate(length(min = 1, message = "L'enseignant est obligatoire"))]
    pub teacher_id: String,
}

/// 보낸 사람은 인증된 사용자로 고정
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, message = "La conversation est obligatoire"))]
    pub conversation_id: String,

    #[validate(length(max = 5000, message = "Le message est trop long"))]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_limits() {
        let request = SendMessageRequest {
            conversation_id: "c1".into(),
            content: "x".repeat(5001),
        };
        assert!(request.validate().is_err());

        let request = SendMessageRequest {
            conversation_id: String::new(),
            content: "Bonjour".into(),
        };
        assert!(request.validate().is_err());
    }
}
