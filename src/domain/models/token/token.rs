//! JWT 클레임과 발급 토큰 쌍

use serde::{Deserialize, Serialize};

use crate::config::AuthProvider;

/// 토큰 용도. 리프레시 토큰으로 API를 호출하거나 그 반대를 막기 위해 클레임에 포함
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 사용자 ID
    pub sub: String,
    pub email: String,
    pub auth_provider: AuthProvider,
    /// `ETUDIANT` / `ENSEIGNANT` / `ADMIN`
    pub roles: Vec<String>,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
    /// 같은 초에 발급된 토큰도 서로 다르도록 하는 고유 ID
    pub jti: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// 액세스 토큰 유효 시간 (초)
    pub expires_in: i64,
    pub token_type: &'static str,
}
