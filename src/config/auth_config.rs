//! 인증 관련 설정
//!
//! JWT 서명, Google OAuth 2.0, 이메일 인증/비밀번호 재설정 토큰 수명을 다룹니다.

use std::env;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

fn required(key: &str) -> Result<String, AppError> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::InternalError(format!("{} 환경 변수가 설정되지 않았습니다", key)))
}

/// Google OAuth 2.0 클라이언트 설정
///
/// 필수 값이 없으면 `InternalError`를 반환하므로 OAuth를 쓰지 않는 배포에서도
/// 서버는 정상적으로 시작됩니다.
pub struct GoogleOAuthConfig;

impl GoogleOAuthConfig {
    pub fn client_id() -> Result<String, AppError> {
        required("GOOGLE_CLIENT_ID")
    }

    pub fn client_secret() -> Result<String, AppError> {
        required("GOOGLE_CLIENT_SECRET")
    }

    pub fn redirect_uri() -> Result<String, AppError> {
        required("GOOGLE_REDIRECT_URI")
    }

    pub fn auth_uri() -> String {
        env::var("GOOGLE_AUTH_URI")
            .unwrap_or_else(|_| "https://accounts.google.com/o/oauth2/auth".to_string())
    }

    pub fn token_uri() -> String {
        env::var("GOOGLE_TOKEN_URI")
            .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string())
    }

    pub fn userinfo_uri() -> String {
        env::var("GOOGLE_USERINFO_URI")
            .unwrap_or_else(|_| "https://www.googleapis.com/oauth2/v2/userinfo".to_string())
    }
}

pub struct JwtConfig;

impl JwtConfig {
    pub fn secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using default (not secure for production!)");
            "scolab-dev-secret-key".to_string()
        })
    }

    /// 액세스 토큰 유효 시간
    pub fn expiration_hours() -> i64 {
        env::var("JWT_EXPIRATION_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24)
    }

    pub fn refresh_expiration_days() -> i64 {
        env::var("JWT_REFRESH_EXPIRATION_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(7)
    }
}

pub struct OAuthConfig;

impl OAuthConfig {
    pub fn state_secret() -> String {
        env::var("OAUTH_STATE_SECRET").unwrap_or_else(|_| {
            log::warn!("OAUTH_STATE_SECRET not set, using default (not secure for production!)");
            "scolab-oauth-state-secret".to_string()
        })
    }

    /// OAuth state 파라미터 유효 시간
    pub fn state_timeout_minutes() -> i64 {
        env::var("OAUTH_STATE_TIMEOUT_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10)
    }
}

/// 일회용 인증 토큰 수명
pub struct VerificationConfig;

impl VerificationConfig {
    pub fn email_verification_ttl_hours() -> i64 {
        env::var("EMAIL_VERIFICATION_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24)
    }

    pub fn password_reset_ttl_minutes() -> i64 {
        env::var("PASSWORD_RESET_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60)
    }
}

/// 계정 인증 제공자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthProvider {
    Local,
    Google,
}

impl AuthProvider {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "local" => Ok(AuthProvider::Local),
            "google" => Ok(AuthProvider::Google),
            _ => Err(format!("Unsupported auth provider: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Local => "LOCAL",
            AuthProvider::Google => "GOOGLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_provider_from_string_is_case_insensitive() {
        assert_eq!(AuthProvider::from_str("local").unwrap(), AuthProvider::Local);
        assert_eq!(AuthProvider::from_str("GOOGLE").unwrap(), AuthProvider::Google);
        assert!(AuthProvider::from_str("github").is_err());
    }

    #[test]
    fn test_auth_provider_wire_format() {
        assert_eq!(serde_json::to_string(&AuthProvider::Google).unwrap(), "\"GOOGLE\"");
        let parsed: AuthProvider = serde_json::from_str("\"LOCAL\"").unwrap();
        assert_eq!(parsed, AuthProvider::Local);
        assert_eq!(AuthProvider::Local.as_str(), "LOCAL");
    }

    #[test]
    fn test_token_lifetimes_default() {
        if env::var("PASSWORD_RESET_TTL_MINUTES").is_err() {
            assert_eq!(VerificationConfig::password_reset_ttl_minutes(), 60);
        }
        if env::var("EMAIL_VERIFICATION_TTL_HOURS").is_err() {
            assert_eq!(VerificationConfig::email_verification_ttl_hours(), 24);
        }
        if env::var("JWT_EXPIRATION_HOURS").is_err() {
            assert_eq!(JwtConfig::expiration_hours(), 24);
        }
    }

    #[test]
    fn test_missing_google_client_id_is_an_error() {
        if env::var("GOOGLE_CLIENT_ID").is_err() {
            assert!(matches!(
                GoogleOAuthConfig::client_id(),
                Err(AppError::InternalError(_))
            ));
        }
    }
}
