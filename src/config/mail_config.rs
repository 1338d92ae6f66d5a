//! SMTP 메일 발송 설정

use std::env;

pub struct MailConfig;

impl MailConfig {
    /// `false`이면 메일을 실제로 보내지 않고 로그로만 남김
    pub fn enabled() -> bool {
        env::var("MAIL_ENABLED")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false)
    }

    pub fn smtp_host() -> String {
        env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string())
    }

    pub fn smtp_port() -> u16 {
        env::var("SMTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(587)
    }

    /// `false`이면 평문 SMTP (로컬 메일 캐처용)
    pub fn smtp_tls() -> bool {
        env::var("SMTP_TLS")
            .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true)
    }

    pub fn smtp_username() -> Option<String> {
        env::var("SMTP_USERNAME").ok().filter(|v| !v.is_empty())
    }

    pub fn smtp_password() -> Option<String> {
        env::var("SMTP_PASSWORD").ok().filter(|v| !v.is_empty())
    }

    pub fn from_address() -> String {
        env::var("MAIL_FROM").unwrap_or_else(|_| "EduProject <no-reply@scolab.local>".to_string())
    }

    pub fn frontend_base_url() -> String {
        env::var("FRONTEND_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn verification_url() -> String {
        env::var("EMAIL_VERIFICATION_URL")
            .unwrap_or_else(|_| format!("{}/verify-email", Self::frontend_base_url()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontend_defaults() {
        if env::var("FRONTEND_BASE_URL").is_err() && env::var("EMAIL_VERIFICATION_URL").is_err() {
            assert_eq!(MailConfig::frontend_base_url(), "http://localhost:3000");
            assert_eq!(MailConfig::verification_url(), "http://localhost:3000/verify-email");
        }
    }

    #[test]
    fn test_mail_disabled_by_default() {
        if env::var("MAIL_ENABLED").is_err() {
            assert!(!MailConfig::enabled());
        }
    }
}
