//! 이메일 인증 / 비밀번호 재설정용 일회성 토큰

use chrono::Duration;
use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::time_utils::add_duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    EmailVerification,
    PasswordReset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationToken {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// UUID v4
    pub token: String,
    pub user_id: String,
    pub email: String,
    pub token_type: TokenType,
    pub expires_at: DateTime,
    pub created_at: DateTime,
}

impl VerificationToken {
    pub fn issue(user_id: String, email: String, token_type: TokenType, ttl: Duration) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            token: Uuid::new_v4().to_string(),
            user_id,
            email,
            token_type,
            expires_at: add_duration(now, ttl),
            created_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime) -> bool {
        self.expires_at < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_token_expires_after_ttl() {
        let token = VerificationToken::issue(
            "u1".into(),
            "a@b.fr".into(),
            TokenType::PasswordReset,
            Duration::minutes(60),
        );

        assert!(Uuid::parse_str(&token.token).is_ok());
        assert!(!token.is_expired(token.created_at));
        assert!(!token.is_expired(add_duration(token.created_at, Duration::minutes(59))));
        assert!(token.is_expired(add_duration(token.created_at, Duration::minutes(61))));
    }

    #[test]
    fn test_token_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&TokenType::EmailVerification).unwrap(),
            "\"EMAIL_VERIFICATION\""
        );
    }
}
