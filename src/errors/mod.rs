//! 애플리케이션 전역 에러 타입
//!
//! 모든 서비스와 리포지토리는 [`AppError`]를 반환하며, 핸들러에서는
//! `actix_web::ResponseError` 구현을 통해 일관된 JSON 에러 응답으로 변환됩니다.

pub mod errors;

pub use errors::{AppError, AppResult, ErrorContext};
