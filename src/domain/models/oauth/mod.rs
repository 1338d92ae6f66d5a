//! Google OAuth 2.0 교환 모델

pub mod google;

pub use google::{GoogleTokenResponse, GoogleUserInfo, OAuthCallbackQuery, OAuthLoginUrlResponse};
