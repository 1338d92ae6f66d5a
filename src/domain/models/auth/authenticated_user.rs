use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::config::AuthProvider;
use crate::domain::entities::users::Role;
use crate::errors::AppError;

/// 인증 미들웨어가 요청 extensions에 넣어 두는 호출자 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub auth_provider: AuthProvider,
    pub roles: Vec<String>,
    /// 로그아웃 시 블랙리스트에 올릴 원본 액세스 토큰
    #[serde(skip)]
    pub access_token: String,
    #[serde(skip)]
    pub expires_at: i64,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is(&self, role: Role) -> bool {
        self.has_role(role.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.is(Role::Admin)
    }

    /// 역할 중 하나를 요구. 없으면 403
    pub fn require_any(&self, roles: &[Role]) -> Result<(), AppError> {
        if roles.iter().any(|role| self.is(*role)) {
            Ok(())
        } else {
            Err(AppError::AuthorizationError(
                "Vous n'avez pas les droits nécessaires pour cette action".to_string(),
            ))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| AppError::AuthenticationError("Authentification requise".to_string())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn caller(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: "u1".to_string(),
            email: "u1@univ.fr".to_string(),
            auth_provider: AuthProvider::Local,
            roles: roles.iter().map(|r| r.to_string()).collect(),
            access_token: String::new(),
            expires_at: 0,
        }
    }

    #[test]
    fn test_role_helpers() {
        let user = caller(&["ENSEIGNANT"]);
        assert!(user.has_role("ENSEIGNANT"));
        assert!(!user.is_admin());
        assert!(user.require_any(&[Role::Enseignant, Role::Admin]).is_ok());
        assert!(matches!(
            user.require_any(&[Role::Etudiant]),
            Err(AppError::AuthorizationError(_))
        ));
    }

    #[actix_web::test]
    async fn test_extractor_reads_extensions() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(caller(&["ETUDIANT"]));

        let user = AuthenticatedUser::extract(&req).await.unwrap();
        assert_eq!(user.user_id, "u1");
    }

    #[actix_web::test]
    async fn test_extractor_without_user_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            AuthenticatedUser::extract(&req).await,
            Err(AppError::AuthenticationError(_))
        ));
    }
}
