//! AuthMiddleware의 요청 처리 부분
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, forward_ready};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;

use crate::domain::models::auth::{AuthenticatedUser, RequiredRole};
use crate::errors::AppError;
use crate::repositories::tokens::TokenRepository;
use crate::services::auth::TokenService;

pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub required_role: Option<RequiredRole>,
}

fn reject<B>(req: ServiceRequest, response: HttpResponse) -> ServiceResponse<EitherBody<B>> {
    let (req, _) = req.into_parts();
    ServiceResponse::new(req, response).map_into_right_body()
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let required_role = self.required_role.clone();

        Box::pin(async move {
            let user = match authenticate(&req).await {
                Ok(user) => user,
                Err(err) => {
                    log::warn!("인증 실패 - {} {}: {}", req.method(), req.path(), err);
                    let response = HttpResponse::Unauthorized().json(serde_json::json!({
                        "error": "authentication_required",
                        "message": "Un jeton d'authentification valide est requis"
                    }));
                    return Ok(reject(req, response));
                }
            };

            if let Some(ref required) = required_role {
                if !required.is_satisfied(&user.roles) {
                    log::warn!(
                        "권한 부족: 사용자 ID {} ({:?}), 필요 권한: {:?}",
                        user.user_id,
                        user.roles,
                        required
                    );
                    let response = HttpResponse::Forbidden().json(serde_json::json!({
                        "error": "insufficient_permissions",
                        "message": "Accès refusé : droits insuffisants"
                    }));
                    return Ok(reject(req, response));
                }
            }

            log::debug!("인증 성공: 사용자 ID {}", user.user_id);
            req.extensions_mut().insert(user);

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Bearer 토큰 추출, 서명/만료 검증, 블랙리스트 확인
async fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Authorization 헤더가 없습니다".to_string()))?;

    let token_service = TokenService::instance();
    let token = token_service.extract_bearer_token(auth_header)?;
    let claims = token_service.verify_access_token(token)?;

    if let Some(reason) = TokenRepository::instance().blacklist_reason(token).await? {
        return Err(AppError::AuthenticationError(reason.describe().to_string()));
    }

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
        auth_provider: claims.auth_provider,
        roles: claims.roles,
        access_token: token.to_string(),
        expires_at: claims.exp,
    })
}
