use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use singleton_macro::service;
use uuid::Uuid;

use crate::{
    config::JwtConfig,
    domain::entities::users::User,
    domain::models::token::token::{TokenClaims, TokenKind, TokenPair},
    errors::AppError,
};

/// HS256 JWT 발급/검증
///
/// 액세스 토큰과 리프레시 토큰은 같은 비밀키로 서명하고 `kind` 클레임으로 구분합니다.
#[service(name = "token")]
pub struct TokenService {}

impl TokenService {
    fn issue(&self, user: &User, kind: TokenKind, ttl: Duration) -> Result<(String, i64), AppError> {
        let now = Utc::now();
        let expiration = now + ttl;

        let claims = TokenClaims {
            sub: user
                .id_string()
                .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?,
            email: user.email.clone(),
            auth_provider: user.auth_provider.clone(),
            roles: user.role_claims(),
            kind,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let encoding_key = EncodingKey::from_secret(JwtConfig::secret().as_ref());
        let token = encode(&Header::default(), &claims, &encoding_key)
            .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))?;

        Ok((token, claims.exp))
    }

    pub fn generate_token_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        let access_ttl = Duration::hours(JwtConfig::expiration_hours());
        let (access_token, _) = self.issue(user, TokenKind::Access, access_ttl)?;
        let (refresh_token, _) = self.issue(user, TokenKind::Refresh, self.refresh_ttl())?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: access_ttl.num_seconds(),
            token_type: "Bearer",
        })
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::days(JwtConfig::refresh_expiration_days())
    }

    fn verify(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, AppError> {
        let decoding_key = DecodingKey::from_secret(JwtConfig::secret().as_ref());

        let claims = decode::<TokenClaims>(token, &decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::AuthenticationError("Le jeton a expiré".to_string())
                }
                _ => {
                    log::debug!("JWT 검증 실패: {}", e);
                    AppError::AuthenticationError("Jeton invalide".to_string())
                }
            })?;

        if claims.kind != expected {
            return Err(AppError::AuthenticationError("Type de jeton invalide".to_string()));
        }
        Ok(claims)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        self.verify(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        self.verify(token, TokenKind::Refresh)
    }

    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> Result<&'a str, AppError> {
        match auth_header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim()),
            _ => Err(AppError::AuthenticationError(
                "En-tête d'autorisation invalide".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::users::Role;
    use mongodb::bson::oid::ObjectId;

    fn user() -> User {
        let mut user = User::new_local(
            "Martin".into(),
            "Paul".into(),
            "paul@univ.fr".into(),
            "hash".into(),
            Role::Enseignant,
        );
        user.id = Some(ObjectId::new());
        user
    }

    #[test]
    fn test_token_pair_round_trip() {
        let service = TokenService::instance();
        let user = user();

        let pair = service.generate_token_pair(&user).unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, JwtConfig::expiration_hours() * 3600);

        let claims = service.verify_access_token(&pair.access_token).unwrap();
        assert_eq!(claims.sub, user.id_string().unwrap());
        assert_eq!(claims.email, "paul@univ.fr");
        assert_eq!(claims.roles, vec!["ENSEIGNANT".to_string()]);
        assert!(claims.exp > claims.iat);

        let refresh = service.verify_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(refresh.sub, claims.sub);
        assert_ne!(refresh.jti, claims.jti);
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let service = TokenService::instance();
        let pair = service.generate_token_pair(&user()).unwrap();

        assert!(service.verify_access_token(&pair.refresh_token).is_err());
        assert!(service.verify_refresh_token(&pair.access_token).is_err());
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let service = TokenService::instance();
        let pair = service.generate_token_pair(&user()).unwrap();

        let mut tampered = pair.access_token.clone();
        tampered.push('x');
        assert!(matches!(
            service.verify_access_token(&tampered),
            Err(AppError::AuthenticationError(_))
        ));
        assert!(service.verify_access_token("pas.un.jwt").is_err());
    }

    #[test]
    fn test_user_without_id_cannot_get_tokens() {
        let mut user = user();
        user.id = None;
        assert!(TokenService::instance().generate_token_pair(&user).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        let service = TokenService::instance();
        assert_eq!(service.extract_bearer_token("Bearer abc.def").unwrap(), "abc.def");
        assert!(service.extract_bearer_token("Basic abc").is_err());
        assert!(service.extract_bearer_token("Bearer ").is_err());
        assert!(service.extract_bearer_token("abc.def").is_err());
    }
}
