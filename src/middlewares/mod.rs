//! 미들웨어 모듈
//!
//! # 인증 미들웨어 (AuthMiddleware)
//! - Bearer 토큰 추출 및 JWT 검증
//! - 로그아웃 블랙리스트 확인 (Redis)
//! - 스코프별 역할 확인 후 [`AuthenticatedUser`](crate::domain::models::AuthenticatedUser)를 request extension에 저장
//!
//! ```rust,ignore
//! App::new().service(
//!     web::scope("/api/admin")
//!         .wrap(AuthMiddleware::required_with_role(Role::Admin))
//!         .route("/dashboard", web::get().to(dashboard)),
//! )
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
