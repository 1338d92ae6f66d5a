//! 저장되지 않는 인증/토큰 모델

pub mod auth;
pub mod oauth;
pub mod token;

pub use auth::*;
pub use oauth::*;
pub use token::*;
