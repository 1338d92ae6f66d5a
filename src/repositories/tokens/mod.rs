//! 토큰 저장소
//!
//! - [`TokenRepository`]: Redis에 리프레시 토큰과 로그아웃된 액세스 토큰 블랙리스트 보관 (TTL 자동 만료)
//! - [`VerificationTokenRepository`]: MongoDB에 이메일 인증/비밀번호 재설정 토큰 보관

pub mod token_repository;
pub mod verification_token_repo;

pub use token_repository::{BlacklistReason, TokenRepository};
pub use verification_token_repo::VerificationTokenRepository;
