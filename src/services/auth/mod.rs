//! 인증 서비스
//!
//! - [`TokenService`] - HS256 액세스/리프레시 JWT
//! - [`GoogleAuthService`] - Google OAuth 2.0 로그인
//! - [`VerificationService`] - 이메일 인증/비밀번호 재설정 토큰
//! - [`AuthService`] - 위 서비스를 묶은 인증 흐름

pub mod auth_service;
pub mod google_auth_service;
pub mod token_service;
pub mod verification_service;

pub use auth_service::AuthService;
pub use google_auth_service::GoogleAuthService;
pub use token_service::TokenService;
pub use verification_service::VerificationService;
