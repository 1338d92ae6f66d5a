use std::sync::Arc;

use bcrypt::verify;
use singleton_macro::service;

use crate::{
    domain::{
        dto::auth::{
            AuthResponse, ChangePasswordRequest, RegisterRequest, ResetPasswordRequest,
            TokenValidationResponse,
        },
        entities::{tokens::TokenType, users::{Role, User}},
        models::AuthenticatedUser,
    },
    errors::AppError,
    repositories::{
        tokens::{BlacklistReason, TokenRepository},
        users::UserRepository,
    },
    services::{
        auth::{GoogleAuthService, TokenService, VerificationService},
        notifications::{EmailService, EmailTemplate},
        users::UserService,
    },
};

/// 인증 흐름 조합
///
/// 회원가입부터 로그아웃, 이메일 인증, 비밀번호 재설정까지 토큰 발급과 메일 발송을 묶습니다.
/// 메일 발송 실패는 로그만 남기고 요청은 성공시킵니다.
#[service(name = "auth")]
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    token_repo: Arc<TokenRepository>,
    token_service: Arc<TokenService>,
    verification_service: Arc<VerificationService>,
    email_service: Arc<EmailService>,
    google_auth_service: Arc<GoogleAuthService>,
    user_service: Arc<UserService>,
}

impl AuthService {
    /// 역할 생략 시 `ENSEIGNANT`
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AppError> {
        let role = request
            .role
            .as_deref()
            .and_then(Role::from_str)
            .unwrap_or(Role::Enseignant);

        let user = self.user_service.create_user(request, role).await?;
        self.send_verification(&user).await?;

        Ok(user)
    }

    async fn send_verification(&self, user: &User) -> Result<(), AppError> {
        let token = self
            .verification_service
            .issue(user, TokenType::EmailVerification)
            .await?;

        self.email_service
            .send_logged(
                &user.email,
                &EmailTemplate::Verification {
                    first_name: &user.first_name,
                    token: &token.token,
                },
            )
            .await;
        Ok(())
    }

    /// 토큰 쌍을 발급하고 리프레시 토큰을 Redis에 저장 (이전 리프레시 토큰은 덮어씀)
    async fn issue_session(&self, user: User) -> Result<AuthResponse, AppError> {
        let user_id = user
            .id_string()
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;

        let tokens = self.token_service.generate_token_pair(&user)?;
        let ttl = self.token_service.refresh_ttl().num_seconds().max(1) as u64;
        self.token_repo
            .store_refresh_token(&user_id, &tokens.refresh_token, ttl)
            .await?;

        Ok(AuthResponse::new(user.into(), tokens))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let mut user = self.user_service.verify_password(email, password).await?;
        self.user_service.record_login(&mut user).await?;

        log::info!("로그인 성공 - {}", user.email);
        self.issue_session(user).await
    }

    pub async fn login_with_google(&self, code: &str, state: &str) -> Result<AuthResponse, AppError> {
        let mut user = self.google_auth_service.authenticate_with_code(code, state).await?;
        self.user_service.record_login(&mut user).await?;

        log::info!("Google OAuth 로그인 성공 - {}", user.email);
        self.issue_session(user).await
    }

    /// 리프레시 토큰 회전
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, AppError> {
        let claims = self.token_service.verify_refresh_token(refresh_token)?;

        if !self
            .token_repo
            .is_refresh_token_current(&claims.sub, refresh_token)
            .await?
        {
            log::warn!("저장되지 않은 리프레시 토큰 사용 시도 - user_id: {}", claims.sub);
            return Err(AppError::AuthenticationError(
                "Jeton de rafraîchissement invalide ou révoqué".to_string(),
            ));
        }

        let user = self
            .user_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| AppError::AuthenticationError("Utilisateur introuvable".to_string()))?;

        if !user.is_active {
            log::warn!("비활성 사용자의 토큰 갱신 시도: {}", claims.sub);
            return Err(AppError::AuthorizationError("Ce compte est désactivé".to_string()));
        }

        log::info!("토큰 갱신 성공: 사용자 ID {}", claims.sub);
        self.issue_session(user).await
    }

    /// 유효하지 않은 토큰은 에러 대신 `valid: false`
    pub async fn validate_token(&self, token: &str) -> Result<TokenValidationResponse, AppError> {
        let claims = match self.token_service.verify_access_token(token) {
            Ok(claims) => claims,
            Err(_) => return Ok(TokenValidationResponse::default()),
        };

        if self.token_repo.is_token_blacklisted(token).await? {
            return Ok(TokenValidationResponse::default());
        }

        Ok(TokenValidationResponse {
            valid: true,
            user_id: Some(claims.sub),
            email: Some(claims.email),
            roles: claims.roles,
            expires_at: Some(claims.exp),
        })
    }

    pub async fn logout(&self, user: &AuthenticatedUser) -> Result<(), AppError> {
        self.token_repo
            .blacklist_token(
                &user.access_token,
                &user.user_id,
                user.expires_at,
                BlacklistReason::Logout,
            )
            .await?;
        self.token_repo.delete_refresh_token(&user.user_id).await?;

        log::info!("로그아웃 - user_id: {}", user.user_id);
        Ok(())
    }

    pub async fn verify_email(&self, token: &str) -> Result<User, AppError> {
        self.verification_service.verify_email(token).await
    }

    pub async fn resend_verification(&self, email: &str) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("Aucun compte associé à cet email".to_string()))?;

        if user.email_verified {
            return Err(AppError::ValidationError(
                "Cet email est déjà vérifié".to_string(),
            ));
        }

        self.send_verification(&user).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("Aucun compte associé à cet email".to_string()))?;

        if !user.is_active {
            return Err(AppError::AuthorizationError("Ce compte est désactivé".to_string()));
        }
        if !user.can_authenticate_with_password() {
            return Err(AppError::ValidationError(
                "Ce compte utilise une connexion Google".to_string(),
            ));
        }

        let token = self
            .verification_service
            .issue(&user, TokenType::PasswordReset)
            .await?;

        self.email_service
            .send_logged(
                &user.email,
                &EmailTemplate::PasswordReset {
                    first_name: &user.first_name,
                    token: &token.token,
                },
            )
            .await;

        log::info!("비밀번호 재설정 토큰 발급 - {}", user.email);
        Ok(())
    }

    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), AppError> {
        let token = self
            .verification_service
            .validate(&request.token, TokenType::PasswordReset)
            .await?;

        let mut user = self.user_repo.get_by_id(&token.user_id).await?;
        self.user_service
            .update_password(&mut user, &request.new_password)
            .await?;
        self.verification_service.invalidate(&token).await?;

        // 재설정 이전 세션은 더 이상 갱신할 수 없음
        self.token_repo.delete_refresh_token(&token.user_id).await?;

        self.send_password_changed(&user).await;
        log::info!("비밀번호 재설정 완료 - {}", user.email);
        Ok(())
    }

    pub async fn change_password(
        &self,
        current: &AuthenticatedUser,
        request: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let mut user = self.user_repo.get_by_id(&current.user_id).await?;

        let password_hash = user.password_hash.as_deref().ok_or_else(|| {
            AppError::ValidationError("Ce compte utilise une connexion Google".to_string())
        })?;

        let matches = verify(&request.current_password, password_hash)
            .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))?;
        if !matches {
            return Err(AppError::ValidationError(
                "Le mot de passe actuel est incorrect".to_string(),
            ));
        }

        self.user_service
            .update_password(&mut user, &request.new_password)
            .await?;

        // 변경에 쓴 세션도 폐기. 새 비밀번호로 다시 로그인
        self.token_repo
            .blacklist_token(
                &current.access_token,
                &current.user_id,
                current.expires_at,
                BlacklistReason::PasswordChanged,
            )
            .await?;
        self.token_repo.delete_refresh_token(&current.user_id).await?;

        self.send_password_changed(&user).await;

        log::info!("비밀번호 변경 - user_id: {}", current.user_id);
        Ok(())
    }

    async fn send_password_changed(&self, user: &User) {
        self.email_service
            .send_logged(
                &user.email,
                &EmailTemplate::PasswordChanged {
                    first_name: &user.first_name,
                },
            )
            .await;
    }
}
