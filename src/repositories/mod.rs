//! 데이터 액세스 계층
//!
//! `#[repository]` 매크로로 싱글톤 등록되는 MongoDB 리포지토리들입니다.
//! `db` 필드는 [`crate::db::Database`], `redis` 필드는 [`crate::caching::redis::RedisClient`]로
//! 자동 주입됩니다. 사용자 조회만 Redis에 캐싱하고 나머지는 MongoDB를 직접 조회합니다.
//!
//! ```rust,ignore
//! use crate::repositories::users::UserRepository;
//!
//! let user_repo = UserRepository::instance();
//! let user = user_repo.find_by_email("etudiant@univ.fr").await?;
//! ```

pub mod deliverables;
pub mod groups;
pub mod messaging;
pub mod notifications;
pub mod projects;
pub mod tokens;
pub mod users;

use mongodb::bson::oid::ObjectId;
use mongodb::error::{ErrorKind, WriteError, WriteFailure};
use mongodb::results::InsertOneResult;

use crate::errors::AppError;

pub(crate) fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::ValidationError(format!("Identifiant invalide : {}", id)))
}

/// 형식이 잘못된 ID는 건너뜀 (참조 목록 조회용)
pub(crate) fn parse_object_ids(ids: &[String]) -> Vec<ObjectId> {
    ids.iter()
        .filter_map(|id| ObjectId::parse_str(id).ok())
        .collect()
}

pub(crate) fn inserted_object_id(result: &InsertOneResult) -> Result<ObjectId, AppError> {
    result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::DatabaseError("insert_one이 ObjectId를 반환하지 않았습니다".to_string()))
}

pub(crate) fn db_error(error: mongodb::error::Error) -> AppError {
    AppError::DatabaseError(error.to_string())
}

/// 유니크 인덱스 위반 (E11000)
pub(crate) fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    const DUPLICATE_KEY: i32 = 11000;
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(WriteError { code: DUPLICATE_KEY, .. }))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, from_document};

    fn write_error(code: i32) -> mongodb::error::Error {
        let write_error: WriteError =
            from_document(doc! { "code": code, "errmsg": "E11000 duplicate key error" }).unwrap();
        ErrorKind::Write(WriteFailure::WriteError(write_error)).into()
    }

    #[test]
    fn test_is_duplicate_key() {
        assert!(is_duplicate_key(&write_error(11000)));
        assert!(!is_duplicate_key(&write_error(121)));
        assert!(!is_duplicate_key(&mongodb::error::Error::custom("réseau")));
    }

    #[test]
    fn test_parse_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
        assert!(matches!(
            parse_object_id("pas-un-id"),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_parse_object_ids_skips_invalid() {
        let id = ObjectId::new();
        let ids = vec![id.to_hex(), "x".to_string()];
        assert_eq!(parse_object_ids(&ids), vec![id]);
    }
}
