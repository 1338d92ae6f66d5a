//! 인증 HTTP 핸들러
//!
//! - 로컬 회원가입/로그인, 토큰 갱신/검증, 로그아웃
//! - 이메일 인증, 비밀번호 재설정/변경
//! - 본인 프로필 조회/수정/사진 업로드
//! - Google OAuth 2.0 (`/auth/oauth2/google`, `/auth/oauth2/callback`)
//!
//! 로그아웃, 비밀번호 변경, 프로필 엔드포인트는 `AuthMiddleware::required()`로 감쌉니다.

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, get, http::header::AUTHORIZATION, post, put, web};
use validator::Validate;

use crate::{
    domain::{
        dto::{
            MessageResponse,
            auth::{
                ChangePasswordRequest, EmailRequest, LoginRequest, RefreshTokenRequest, RegisterRequest,
                RegisterResponse, ResetPasswordRequest, TokenQuery, VerifyTokenRequest,
            },
            users::{ProfilePhotoResponse, UpdateProfileRequest, UserResponse},
        },
        models::{AuthenticatedUser, OAuthCallbackQuery},
    },
    errors::AppError,
    handlers::upload::read_file_field,
    middlewares::AuthMiddleware,
    services::{
        auth::{AuthService, GoogleAuthService, TokenService},
        users::UserService,
    },
};

/// `POST /auth/register`
#[post("/register")]
pub async fn register(payload: web::Json<RegisterRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = AuthService::instance().register(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        user: user.into(),
        message: "Inscription réussie. Un email de vérification vous a été envoyé.".to_string(),
    }))
}

/// `POST /auth/login`
#[post("/login")]
pub async fn login(payload: web::Json<LoginRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    log::info!("로컬 로그인 시도 - 사용자: {}", payload.email);
    let response = AuthService::instance()
        .login(&payload.email, &payload.password)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// `POST /auth/refresh`
///
/// 본문에 `refresh_token`이 없으면 `Authorization: Bearer` 헤더 값을 사용합니다.
#[post("/refresh")]
pub async fn refresh(
    req: HttpRequest,
    payload: Option<web::Json<RefreshTokenRequest>>,
) -> Result<HttpResponse, AppError> {
    let token = match payload.and_then(|p| p.into_inner().refresh_token) {
        Some(token) => token,
        None => bearer_from(&req)?,
    };

    let response = AuthService::instance().refresh(&token).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// `POST /auth/verify-token`
#[post("/verify-token")]
pub async fn verify_token(
    req: HttpRequest,
    payload: Option<web::Json<VerifyTokenRequest>>,
) -> Result<HttpResponse, AppError> {
    let token = match payload.and_then(|p| p.into_inner().token) {
        Some(token) => token,
        None => bearer_from(&req)?,
    };

    let response = AuthService::instance().validate_token(&token).await?;
    Ok(HttpResponse::Ok().json(response))
}

fn bearer_from(req: &HttpRequest) -> Result<String, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::ValidationError("Jeton manquant".to_string()))?;

    Ok(TokenService::instance().extract_bearer_token(header)?.to_string())
}

/// `POST /auth/logout`
#[post("/logout", wrap = "AuthMiddleware::required()")]
pub async fn logout(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    AuthService::instance().logout(&user).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Déconnexion réussie")))
}

/// `POST /auth/verify-email` (`{"token": "..."}`)
#[post("/verify-email")]
pub async fn verify_email(payload: web::Json<TokenQuery>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    AuthService::instance().verify_email(&payload.token).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Adresse email vérifiée avec succès")))
}

#[post("/resend-verification")]
pub async fn resend_verification(payload: web::Json<EmailRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    AuthService::instance().resend_verification(&payload.email).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Email de vérification renvoyé")))
}

#[post("/forgot-password")]
pub async fn forgot_password(payload: web::Json<EmailRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    AuthService::instance().forgot_password(&payload.email).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok(
        "Un email de réinitialisation vous a été envoyé",
    )))
}

#[post("/reset-password")]
pub async fn reset_password(payload: web::Json<ResetPasswordRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    AuthService::instance().reset_password(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Mot de passe réinitialisé avec succès")))
}

#[put("/change-password", wrap = "AuthMiddleware::required()")]
pub async fn change_password(
    user: AuthenticatedUser,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    AuthService::instance()
        .change_password(&user, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Mot de passe modifié avec succès")))
}

/// `GET /auth/profile`
#[get("")]
pub async fn get_profile(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let user = UserService::instance().get_user(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// `PUT /auth/profile/update`
#[put("/update")]
pub async fn update_profile(
    user: AuthenticatedUser,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let updated = UserService::instance()
        .update_user(&user.user_id, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// `POST /auth/profile/photo` (multipart `photo`, images uniquement)
#[post("/photo")]
pub async fn upload_profile_photo(
    user: AuthenticatedUser,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let file = read_file_field(payload, "photo").await?;

    let updated = UserService::instance()
        .update_profile_photo(&user.user_id, &file.name, &file.bytes)
        .await?;

    Ok(HttpResponse::Ok().json(ProfilePhotoResponse {
        profile_photo_url: updated.profile_photo_url.unwrap_or_default(),
    }))
}

/// `GET /auth/oauth2/google`
#[get("/google")]
pub async fn google_login_url() -> Result<HttpResponse, AppError> {
    let url_response = GoogleAuthService::instance().get_login_url()?;
    Ok(HttpResponse::Ok().json(url_response))
}

/// `GET /auth/oauth2/callback?code={code}&state={state}`
#[get("/callback")]
pub async fn google_oauth_callback(query: web::Query<OAuthCallbackQuery>) -> Result<HttpResponse, AppError> {
    // 사용자가 동의를 거부한 경우
    if let Some(error) = &query.error {
        let error_msg = query
            .error_description
            .as_deref()
            .unwrap_or("L'authentification Google a été annulée");
        log::warn!("Google OAuth 에러: {} - {}", error, error_msg);
        return Err(AppError::AuthenticationError(error_msg.to_string()));
    }

    query.validate()?;

    let response = AuthService::instance()
        .login_with_google(&query.code, &query.state)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
