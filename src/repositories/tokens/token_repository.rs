use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use singleton_macro::repository;

use crate::caching::redis::RedisClient;
use crate::core::registry::Repository;
use crate::errors::AppError;

/// Redis 기반 토큰 저장소
///
/// - `refresh_token:{user_id}`: 사용자별 최신 리프레시 토큰 하나 (회전 시 덮어씀)
/// - `blacklist_token:{sha256}`: 로그아웃된 액세스 토큰, 원래 만료 시각까지만 유지
#[repository(name = "token", collection = "tokens")]
pub struct TokenRepository {
    redis: Arc<RedisClient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenInfo {
    pub user_id: String,
    pub refresh_token: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistedTokenInfo {
    pub user_id: String,
    pub blacklisted_at: i64,
    pub original_exp: i64,
    pub reason: BlacklistReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlacklistReason {
    Logout,
    PasswordChanged,
}

impl BlacklistReason {
    pub fn describe(self) -> &'static str {
        match self {
            BlacklistReason::Logout => "로그아웃된 토큰",
            BlacklistReason::PasswordChanged => "비밀번호 변경으로 폐기된 토큰",
        }
    }
}

/// 저장된 값이 깨져 있어도 키가 있으면 블랙리스트로 취급
fn parse_blacklist_reason(json: &str) -> BlacklistReason {
    serde_json::from_str::<BlacklistedTokenInfo>(json)
        .map(|info| info.reason)
        .unwrap_or(BlacklistReason::Logout)
}

fn redis_error(error: impl std::fmt::Display) -> AppError {
    AppError::RedisError(error.to_string())
}

impl TokenRepository {
    fn refresh_key(user_id: &str) -> String {
        format!("refresh_token:{}", user_id)
    }

    fn blacklist_key(access_token: &str) -> String {
        format!("blacklist_token:{:x}", Sha256::digest(access_token.as_bytes()))
    }

    pub async fn store_refresh_token(
        &self,
        user_id: &str,
        refresh_token: &str,
        ttl_seconds: u64,
    ) -> Result<(), AppError> {
        if ttl_seconds == 0 {
            return Err(AppError::InternalError(
                "TTL de jeton de rafraîchissement nul".to_string(),
            ));
        }

        let now = Utc::now().timestamp();
        let info = RefreshTokenInfo {
            user_id: user_id.to_string(),
            refresh_token: refresh_token.to_string(),
            issued_at: now,
            expires_at: now + ttl_seconds as i64,
        };

        let json = serde_json::to_string(&info).map_err(redis_error)?;
        self.redis
            .setex(&Self::refresh_key(user_id), ttl_seconds, &json)
            .await
            .map_err(redis_error)?;

        log::debug!("Refresh token 저장 - user_id: {}, ttl: {}초", user_id, ttl_seconds);
        Ok(())
    }

    /// 저장된 토큰과 일치하고 만료 전이면 `true`
    pub async fn is_refresh_token_current(
        &self,
        user_id: &str,
        refresh_token: &str,
    ) -> Result<bool, AppError> {
        let key = Self::refresh_key(user_id);
        let Some(json) = self.redis.get_string(&key).await.map_err(redis_error)? else {
            return Ok(false);
        };

        let info: RefreshTokenInfo = match serde_json::from_str(&json) {
            Ok(info) => info,
            Err(e) => {
                log::warn!("Refresh token 정보 파싱 실패 - user_id: {}, 에러: {}", user_id, e);
                return Ok(false);
            }
        };

        if info.expires_at <= Utc::now().timestamp() {
            self.redis.del(&key).await.map_err(redis_error)?;
            return Ok(false);
        }

        Ok(info.refresh_token == refresh_token)
    }

    pub async fn delete_refresh_token(&self, user_id: &str) -> Result<(), AppError> {
        self.redis
            .del(&Self::refresh_key(user_id))
            .await
            .map_err(redis_error)
    }

    /// 액세스 토큰을 원래 만료 시각까지 블랙리스트에 등록
    pub async fn blacklist_token(
        &self,
        access_token: &str,
        user_id: &str,
        original_exp: i64,
        reason: BlacklistReason,
    ) -> Result<(), AppError> {
        let now = Utc::now().timestamp();
        let remaining = original_exp - now;
        if remaining <= 0 {
            return Ok(());
        }

        let info = BlacklistedTokenInfo {
            user_id: user_id.to_string(),
            blacklisted_at: now,
            original_exp,
            reason,
        };
        let json = serde_json::to_string(&info).map_err(redis_error)?;

        self.redis
            .setex(&Self::blacklist_key(access_token), remaining as u64, &json)
            .await
            .map_err(redis_error)?;

        log::info!(
            "액세스 토큰 블랙리스트 등록 - user_id: {}, 이유: {:?}, TTL: {}초",
            user_id,
            reason,
            remaining
        );
        Ok(())
    }

    pub async fn blacklist_reason(&self, access_token: &str) -> Result<Option<BlacklistReason>, AppError> {
        let entry = self
            .redis
            .get_string(&Self::blacklist_key(access_token))
            .await
            .map_err(redis_error)?;
        Ok(entry.as_deref().map(parse_blacklist_reason))
    }

    pub async fn is_token_blacklisted(&self, access_token: &str) -> Result<bool, AppError> {
        self.redis
            .exists(&Self::blacklist_key(access_token))
            .await
            .map_err(redis_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!(TokenRepository::refresh_key("u1"), "refresh_token:u1");

        let key = TokenRepository::blacklist_key("header.payload.signature");
        assert!(key.starts_with("blacklist_token:"));
        assert_eq!(key.len(), "blacklist_token:".len() + 64);
        assert_eq!(key, TokenRepository::blacklist_key("header.payload.signature"));
        assert_ne!(key, TokenRepository::blacklist_key("autre.jeton.signe"));
    }

    #[test]
    fn test_blacklist_reason_is_read_back() {
        let info = BlacklistedTokenInfo {
            user_id: "u1".into(),
            blacklisted_at: 0,
            original_exp: 60,
            reason: BlacklistReason::PasswordChanged,
        };
        let json = serde_json::to_string(&info).unwrap();

        assert_eq!(parse_blacklist_reason(&json), BlacklistReason::PasswordChanged);
        assert_eq!(parse_blacklist_reason("pas du json"), BlacklistReason::Logout);
        assert_eq!(
            BlacklistReason::PasswordChanged.describe(),
            "비밀번호 변경으로 폐기된 토큰"
        );
    }
}
