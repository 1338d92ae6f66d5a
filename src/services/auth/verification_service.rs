use std::sync::Arc;

use chrono::Duration;
use mongodb::bson::DateTime;
use singleton_macro::service;

use crate::{
    config::VerificationConfig,
    domain::entities::tokens::{TokenType, VerificationToken},
    domain::entities::users::User,
    errors::AppError,
    repositories::{tokens::VerificationTokenRepository, users::UserRepository},
};

/// 이메일 인증 / 비밀번호 재설정 토큰 발급과 검증
#[service(name = "verification")]
pub struct VerificationService {
    verification_token_repo: Arc<VerificationTokenRepository>,
    user_repo: Arc<UserRepository>,
}

fn ttl_for(token_type: TokenType) -> Duration {
    match token_type {
        TokenType::EmailVerification => {
            Duration::hours(VerificationConfig::email_verification_ttl_hours())
        }
        TokenType::PasswordReset => Duration::minutes(VerificationConfig::password_reset_ttl_minutes()),
    }
}

impl VerificationService {
    /// 같은 종류의 기존 토큰을 지우고 새 토큰 발급
    pub async fn issue(&self, user: &User, token_type: TokenType) -> Result<VerificationToken, AppError> {
        let user_id = user
            .id_string()
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;

        let removed = self
            .verification_token_repo
            .delete_by_user_and_type(&user_id, token_type)
            .await?;
        if removed > 0 {
            log::debug!("기존 {:?} 토큰 {}개 삭제 - user_id: {}", token_type, removed, user_id);
        }

        let token = VerificationToken::issue(user_id, user.email.clone(), token_type, ttl_for(token_type));
        self.verification_token_repo.create(token).await
    }

    /// 만료된 토큰은 삭제 후 `ValidationError`
    pub async fn validate(&self, token: &str, token_type: TokenType) -> Result<VerificationToken, AppError> {
        let found = self
            .verification_token_repo
            .find_by_token(token.trim())
            .await?
            .filter(|t| t.token_type == token_type)
            .ok_or_else(|| AppError::ValidationError("Jeton invalide".to_string()))?;

        if found.is_expired(DateTime::now()) {
            self.verification_token_repo.delete(&found).await?;
            return Err(AppError::ValidationError("Le jeton a expiré".to_string()));
        }

        Ok(found)
    }

    pub async fn invalidate(&self, token: &VerificationToken) -> Result<(), AppError> {
        self.verification_token_repo.delete(token).await
    }

    /// 이메일 인증 토큰을 소비하고 사용자를 인증 완료로 표시
    pub async fn verify_email(&self, token: &str) -> Result<User, AppError> {
        let verification = self.validate(token, TokenType::EmailVerification).await?;

        let mut user = self.user_repo.get_by_id(&verification.user_id).await?;
        user.email_verified = true;
        user.touch();
        self.user_repo.save(&user).await?;

        self.invalidate(&verification).await?;
        log::info!("이메일 인증 완료 - {}", user.email);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_token_lifetimes() {
        if std::env::var("EMAIL_VERIFICATION_TTL_HOURS").is_err() {
            assert_eq!(ttl_for(TokenType::EmailVerification), Duration::hours(24));
        }
        if std::env::var("PASSWORD_RESET_TTL_MINUTES").is_err() {
            assert_eq!(ttl_for(TokenType::PasswordReset), Duration::minutes(60));
        }
    }
}
