//! 에러 정의 및 HTTP 응답 매핑
//!
//! | 변형 | HTTP 상태 |
//! |------|-----------|
//! | `ValidationError` | 400 |
//! | `AuthenticationError` | 401 |
//! | `AuthorizationError` | 403 |
//! | `NotFound` | 404 |
//! | `ConflictError` | 409 |
//! | 그 외 | 500 |
//!
//! 응답 본문은 `{"error": "<코드>", "message": "<메시지>"}` 형식입니다.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Redis error: {0}")]
    RedisError(String),

    /// 요청 값 검증 실패 및 잘못된 상태 전이
    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ConflictError(String),

    #[error("{0}")]
    AuthenticationError(String),

    /// 역할 또는 소유권 부족
    #[error("{0}")]
    AuthorizationError(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 응답 본문에 들어가는 기계 판독용 에러 코드
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_) => "database_error",
            AppError::RedisError(_) => "cache_error",
            AppError::ValidationError(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::ConflictError(_) => "conflict",
            AppError::AuthenticationError(_) => "authentication_failed",
            AppError::AuthorizationError(_) => "forbidden",
            AppError::ExternalServiceError(_) => "external_service_error",
            AppError::InternalError(_) => "internal_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // 내부 오류의 상세 내용은 로그로만 남김
        let message = if status.is_server_error() {
            log::error!("{}", self);
            "Une erreur interne est survenue".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.code(),
            "message": message
        }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 `AppError::InternalError`로 감싸는 확장 trait
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> AppResult<T>;

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    fn body_json(error: AppError) -> serde_json::Value {
        let bytes = error.error_response().into_body().try_into_bytes().unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_client_errors_map_to_their_status() {
        let cases = [
            (AppError::ValidationError("x".into()), StatusCode::BAD_REQUEST),
            (AppError::AuthenticationError("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::AuthorizationError("x".into()), StatusCode::FORBIDDEN),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::ConflictError("x".into()), StatusCode::CONFLICT),
        ];

        for (error, status) in cases {
            assert_eq!(error.error_response().status(), status);
        }
    }

    #[test]
    fn test_server_errors_are_500() {
        assert_eq!(
            AppError::DatabaseError("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::ExternalServiceError("smtp".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_error_body_carries_message() {
        let body = body_json(AppError::NotFound("Projet non trouvé".into()));
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], "Projet non trouvé");
    }

    #[test]
    fn test_internal_error_body_hides_details() {
        let body = body_json(AppError::DatabaseError("connection refused 10.0.0.3".into()));
        assert_eq!(body["error"], "database_error");
        assert!(!body["message"].as_str().unwrap().contains("10.0.0.3"));
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        match result.context("Additional context") {
            Err(AppError::InternalError(msg)) => {
                assert!(msg.contains("Additional context"));
                assert!(msg.contains("original error"));
            }
            other => panic!("Expected InternalError, got {:?}", other),
        }
    }
}
