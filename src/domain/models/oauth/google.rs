use serde::{Deserialize, Serialize};
use validator::Validate;

/// `oauth2/v2/userinfo` 응답
#[derive(Debug, Deserialize)]
pub struct GoogleUserInfo {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    pub picture: Option<String>,
    #[serde(default)]
    pub verified_email: bool,
}

/// authorization code 교환 응답
#[derive(Debug, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OAuthLoginUrlResponse {
    pub login_url: String,
    pub state: String,
}

/// 콜백 쿼리. 사용자가 동의를 거부하면 `error`만 채워져서 옴
#[derive(Debug, Deserialize, Validate)]
pub struct OAuthCallbackQuery {
    #[serde(default)]
    #[validate(length(min = 1, message = "Code d'autorisation manquant"))]
    pub code: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Paramètre state manquant"))]
    pub state: String,

    pub error: Option<String>,
    pub error_description: Option<String>,
}
