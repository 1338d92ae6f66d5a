//! # Google OAuth 2.0 로그인
//!
//! Authorization Code 플로우:
//!
//! ```text
//! 클라이언트 ─GET /auth/oauth2/google──► 서버: state 생성, 동의 URL 반환
//! 클라이언트 ─(Google 동의)────────────► Google
//! Google ─GET /auth/oauth2/callback?code&state─► 서버
//!     서버: state 검증 → code를 토큰으로 교환 → userinfo 조회 → 사용자 조회/생성 → JWT 발급
//! ```
//!
//! ## 계정 연동 정책
//!
//! - 처음 보는 이메일: `GOOGLE` 제공자의 `ETUDIANT` 계정을 이메일 인증 완료 상태로 생성
//! - 기존 `GOOGLE` 계정: 그대로 로그인
//! - 같은 이메일의 `LOCAL` 계정: `ConflictError`
//!
//! ## State
//!
//! `{unix_timestamp}.{sha256("{timestamp}:{OAUTH_STATE_SECRET}")}` 형식으로, 서버에 저장하지 않고
//! 콜백에서 다시 계산해 비교합니다. `OAUTH_STATE_TIMEOUT_MINUTES`가 지나면 거부합니다.

use std::sync::Arc;

use chrono::Utc;
use sha2::{Digest, Sha256};
use singleton_macro::service;

use crate::{
    config::{AuthProvider, GoogleOAuthConfig, OAuthConfig},
    domain::entities::users::{Role, User},
    domain::models::oauth::{GoogleTokenResponse, GoogleUserInfo, OAuthLoginUrlResponse},
    errors::AppError,
    repositories::users::UserRepository,
};

#[service(name = "googleauth")]
pub struct GoogleAuthService {
    user_repo: Arc<UserRepository>,
}

fn sign_state(timestamp: i64, secret: &str) -> String {
    format!("{:x}", Sha256::digest(format!("{}:{}", timestamp, secret).as_bytes()))
}

/// `now` 기준으로 state 서명과 유효 기간을 검사
fn check_state(state: &str, secret: &str, timeout_minutes: i64, now: i64) -> Result<(), AppError> {
    let invalid = || AppError::AuthenticationError("Paramètre state OAuth invalide".to_string());

    let (timestamp, signature) = state.split_once('.').ok_or_else(invalid)?;
    let timestamp: i64 = timestamp.parse().map_err(|_| invalid())?;

    if sign_state(timestamp, secret) != signature {
        return Err(invalid());
    }

    let age = now - timestamp;
    if age < 0 || age > timeout_minutes * 60 {
        return Err(AppError::AuthenticationError(
            "La session OAuth a expiré, veuillez recommencer".to_string(),
        ));
    }

    Ok(())
}

fn google_error(context: &str, error: impl std::fmt::Display) -> AppError {
    AppError::ExternalServiceError(format!("{} : {}", context, error))
}

impl GoogleAuthService {
    fn generate_oauth_state(&self) -> String {
        let timestamp = Utc::now().timestamp();
        format!("{}.{}", timestamp, sign_state(timestamp, &OAuthConfig::state_secret()))
    }

    fn verify_oauth_state(&self, state: &str) -> Result<(), AppError> {
        check_state(
            state,
            &OAuthConfig::state_secret(),
            OAuthConfig::state_timeout_minutes(),
            Utc::now().timestamp(),
        )
    }

    pub fn get_login_url(&self) -> Result<OAuthLoginUrlResponse, AppError> {
        let state = self.generate_oauth_state();

        let params = [
            ("client_id", GoogleOAuthConfig::client_id()?),
            ("redirect_uri", GoogleOAuthConfig::redirect_uri()?),
            ("scope", "openid email profile".to_string()),
            ("response_type", "code".to_string()),
            ("access_type", "online".to_string()),
            ("state", state.clone()),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let login_url = format!("{}?{}", GoogleOAuthConfig::auth_uri(), query_string);

        Ok(OAuthLoginUrlResponse { login_url, state })
    }

    /// 콜백 처리 후 로그인할 사용자를 반환
    pub async fn authenticate_with_code(&self, auth_code: &str, state: &str) -> Result<User, AppError> {
        self.verify_oauth_state(state)?;

        let token_response = self.exchange_code_for_token(auth_code).await?;
        let google_user = self.get_user_info(&token_response.access_token).await?;

        match self.user_repo.find_by_email(&google_user.email).await? {
            Some(existing) => match existing.auth_provider {
                AuthProvider::Google => {
                    if !existing.is_active {
                        return Err(AppError::AuthorizationError(
                            "Ce compte est désactivé".to_string(),
                        ));
                    }
                    log::info!("Google 사용자 로그인: {}", existing.email);
                    Ok(existing)
                }
                AuthProvider::Local => Err(AppError::ConflictError(
                    "Un compte local existe déjà avec cet email. Connectez-vous avec votre mot de passe."
                        .to_string(),
                )),
            },
            None => {
                log::info!("새 Google 사용자 등록: {}", google_user.email);
                self.create_google_user(google_user).await
            }
        }
    }

    async fn exchange_code_for_token(&self, auth_code: &str) -> Result<GoogleTokenResponse, AppError> {
        let client_id = GoogleOAuthConfig::client_id()?;
        let client_secret = GoogleOAuthConfig::client_secret()?;
        let redirect_uri = GoogleOAuthConfig::redirect_uri()?;

        let params = [
            ("code", auth_code),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = reqwest::Client::new()
            .post(GoogleOAuthConfig::token_uri())
            .form(&params)
            .send()
            .await
            .map_err(|e| google_error("Échec de la requête de jeton Google", e))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::warn!("Google 토큰 교환 실패: {}", error_text);
            return Err(AppError::AuthenticationError(
                "Code d'autorisation Google invalide".to_string(),
            ));
        }

        response
            .json::<GoogleTokenResponse>()
            .await
            .map_err(|e| google_error("Réponse de jeton Google illisible", e))
    }

    async fn get_user_info(&self, access_token: &str) -> Result<GoogleUserInfo, AppError> {
        let response = reqwest::Client::new()
            .get(GoogleOAuthConfig::userinfo_uri())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| google_error("Échec de la requête de profil Google", e))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(google_error("Profil Google indisponible", error_text));
        }

        response
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| google_error("Profil Google illisible", e))
    }

    async fn create_google_user(&self, google_user: GoogleUserInfo) -> Result<User, AppError> {
        let user = User::new_oauth(
            google_user.family_name.unwrap_or_default(),
            google_user.given_name.unwrap_or_default(),
            google_user.email,
            AuthProvider::Google,
            google_user.id,
            google_user.picture,
            Role::Etudiant,
        );

        self.user_repo.create(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "state-secret";

    fn state_at(timestamp: i64) -> String {
        format!("{}.{}", timestamp, sign_state(timestamp, SECRET))
    }

    #[test]
    fn test_fresh_state_is_accepted() {
        assert!(check_state(&state_at(1_000), SECRET, 10, 1_000 + 60).is_ok());
    }

    #[test]
    fn test_expired_state_is_rejected() {
        let result = check_state(&state_at(1_000), SECRET, 10, 1_000 + 11 * 60);
        assert!(matches!(result, Err(AppError::AuthenticationError(_))));
    }

    #[test]
    fn test_forged_state_is_rejected() {
        assert!(check_state(&state_at(1_000), "autre-secret", 10, 1_000).is_err());
        assert!(check_state("1000.deadbeef", SECRET, 10, 1_000).is_err());
        assert!(check_state("pas-de-point", SECRET, 10, 1_000).is_err());
        assert!(check_state("abc.def", SECRET, 10, 1_000).is_err());
    }

    #[test]
    fn test_state_from_the_future_is_rejected() {
        assert!(check_state(&state_at(5_000), SECRET, 10, 1_000).is_err());
    }
}
