//! JWT 인증 미들웨어
//!
//! 스코프 단위로 감싸서 Bearer 토큰을 검증하고, 필요한 경우 역할을 확인합니다.

use std::future::{Ready, ready};
use std::rc::Rc;

use actix_web::{
    Error, Result,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
};

use crate::domain::entities::users::Role;
use crate::domain::models::auth::RequiredRole;
use crate::middlewares::auth_inner::AuthMiddlewareService;

/// JWT 인증 미들웨어. 토큰이 없거나 유효하지 않으면 401, 역할이 부족하면 403
pub struct AuthMiddleware {
    /// 접근에 필요한 역할 (선택사항)
    required_role: Option<RequiredRole>,
}

impl AuthMiddleware {
    pub fn new(required_role: Option<RequiredRole>) -> Self {
        Self { required_role }
    }

    /// 로그인만 요구
    pub fn required() -> Self {
        Self::new(None)
    }

    pub fn required_with_role(role: Role) -> Self {
        Self::new(Some(RequiredRole::Single(role.as_str().to_string())))
    }

    /// 나열한 역할 중 하나 요구
    pub fn required_with_roles(roles: &[Role]) -> Self {
        let role_strings = roles.iter().map(|r| r.as_str().to_string()).collect();
        Self::new(Some(RequiredRole::Any(role_strings)))
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            required_role: self.required_role.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test as actix_test;
    use actix_web::{App, HttpResponse, http::StatusCode, web};

    #[test]
    fn test_role_constructors() {
        let teacher_or_admin = AuthMiddleware::required_with_roles(&[Role::Enseignant, Role::Admin]);
        let Some(RequiredRole::Any(roles)) = teacher_or_admin.required_role else {
            panic!("expected Any");
        };
        assert_eq!(roles, vec!["ENSEIGNANT".to_string(), "ADMIN".to_string()]);

        let admin = AuthMiddleware::required_with_role(Role::Admin);
        assert!(matches!(admin.required_role, Some(RequiredRole::Single(ref r)) if r == "ADMIN"));
        assert!(AuthMiddleware::required().required_role.is_none());
    }

    #[actix_web::test]
    async fn test_missing_header_is_rejected_with_json() {
        let app = actix_test::init_service(
            App::new().service(
                web::scope("/api/projets")
                    .wrap(AuthMiddleware::required())
                    .route("", web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/api/projets").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = actix_test::read_body_json(res).await;
        assert_eq!(body["error"], "authentication_required");
    }
}
