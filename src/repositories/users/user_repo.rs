use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::{
    IndexModel,
    bson::{Document, doc},
    options::IndexOptions,
};
use singleton_macro::repository;

use crate::{
    caching::redis::RedisClient,
    config::DatabaseConfig,
    core::registry::Repository,
    db::Database,
    domain::entities::users::{Role, User},
    errors::AppError,
    repositories::{db_error, inserted_object_id, parse_object_id, parse_object_ids},
    utils::string_utils::normalize_email,
};

/// 사용자 리포지토리
///
/// ID/이메일 단건 조회는 Redis에 캐싱합니다 (`user_repository:{id}`, `user:email:{email}`).
/// 저장/삭제 시 두 키를 모두 무효화합니다.
#[repository(name = "user", collection = "users")]
pub struct UserRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl UserRepository {
    fn email_cache_key(email: &str) -> String {
        format!("user:email:{}", email)
    }

    async fn cache_user(&self, user: &User) {
        let ttl = DatabaseConfig::cache_ttl_seconds();
        if let Some(id) = user.id_string() {
            let _ = self.redis.set_with_expiry(&self.cache_key(&id), user, ttl).await;
        }
        let _ = self
            .redis
            .set_with_expiry(&Self::email_cache_key(&user.email), user, ttl)
            .await;
    }

    async fn evict_user(&self, user: &User) {
        if let Some(id) = user.id_string() {
            if let Err(e) = self.invalidate_cache(&id).await {
                log::warn!("사용자 캐시 무효화 실패 - id: {}, 에러: {}", id, e);
            }
        }
        let _ = self.redis.del(&Self::email_cache_key(&user.email)).await;
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = normalize_email(email);
        let cache_key = Self::email_cache_key(&email);

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self
            .collection::<User>()
            .find_one(doc! { "email": &email })
            .await
            .map_err(db_error)?;

        if let Some(ref user) = user {
            self.cache_user(user).await;
        }

        Ok(user)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let object_id = parse_object_id(id)?;
        let cache_key = self.cache_key(id);

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self
            .collection::<User>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(db_error)?;

        if let Some(ref user) = user {
            self.cache_user(user).await;
        }

        Ok(user)
    }

    /// 없으면 `NotFound`
    pub async fn get_by_id(&self, id: &str) -> Result<User, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Utilisateur introuvable : {}", id)))
    }

    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<User>, AppError> {
        let object_ids = parse_object_ids(ids);
        if object_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_many(doc! { "_id": { "$in": object_ids } }).await
    }

    pub async fn find_all(&self) -> Result<Vec<User>, AppError> {
        self.find_many(doc! {}).await
    }

    pub async fn find_by_role(&self, role: Role) -> Result<Vec<User>, AppError> {
        self.find_many(doc! { "role": role.as_str() }).await
    }

    /// 이름/성/이메일 부분 일치 (대소문자 무시)
    pub async fn search(&self, keyword: &str) -> Result<Vec<User>, AppError> {
        let pattern = escape_regex(keyword.trim());
        let regex = doc! { "$regex": pattern, "$options": "i" };
        self.find_many(doc! {
            "$or": [
                { "last_name": regex.clone() },
                { "first_name": regex.clone() },
                { "email": regex },
            ]
        })
        .await
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<User>, AppError> {
        self.collection::<User>()
            .find(filter)
            .sort(doc! { "last_name": 1, "first_name": 1 })
            .await
            .map_err(db_error)?
            .try_collect()
            .await
            .map_err(db_error)
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    pub async fn create(&self, mut user: User) -> Result<User, AppError> {
        user.email = normalize_email(&user.email);
        if self.exists_by_email(&user.email).await? {
            return Err(AppError::ConflictError(
                "Un compte existe déjà avec cet email".to_string(),
            ));
        }

        let result = self
            .collection::<User>()
            .insert_one(&user)
            .await
            .map_err(db_error)?;
        user.id = Some(inserted_object_id(&result)?);

        log::info!("사용자 생성 - email: {}, role: {}", user.email, user.role);
        Ok(user)
    }

    /// 문서 전체를 교체 저장
    pub async fn save(&self, user: &User) -> Result<(), AppError> {
        let id = user
            .id
            .ok_or_else(|| AppError::InternalError("ID 없는 사용자는 저장할 수 없습니다".to_string()))?;

        let result = self
            .collection::<User>()
            .replace_one(doc! { "_id": id }, user)
            .await
            .map_err(db_error)?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Utilisateur introuvable : {}",
                id.to_hex()
            )));
        }

        self.evict_user(user).await;
        Ok(())
    }

    pub async fn delete(&self, user: &User) -> Result<bool, AppError> {
        let Some(id) = user.id else {
            return Ok(false);
        };

        let result = self
            .collection::<User>()
            .delete_one(doc! { "_id": id })
            .await
            .map_err(db_error)?;

        self.evict_user(user).await;
        Ok(result.deleted_count > 0)
    }

    pub async fn count(&self, filter: Document) -> Result<u64, AppError> {
        self.collection::<User>()
            .count_documents(filter)
            .await
            .map_err(db_error)
    }

    pub async fn count_by_role(&self, role: Role) -> Result<u64, AppError> {
        self.count(doc! { "role": role.as_str() }).await
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let collection = self.collection::<User>();

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        let role_index = IndexModel::builder()
            .keys(doc! { "role": 1 })
            .options(IndexOptions::builder().name("role".to_string()).build())
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        collection
            .create_indexes([email_index, role_index, created_at_index])
            .await
            .map_err(db_error)?;

        Ok(())
    }
}

/// 검색어를 MongoDB 정규식 리터럴로 이스케이프
fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(
            c,
            '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '^' | '$' | '\\'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_regex() {
        assert_eq!(escape_regex("dupont"), "dupont");
        assert_eq!(escape_regex("a.b+c"), "a\\.b\\+c");
        assert_eq!(escape_regex("(x)"), "\\(x\\)");
    }

    #[test]
    fn test_email_cache_key() {
        assert_eq!(
            UserRepository::email_cache_key("awa@univ.fr"),
            "user:email:awa@univ.fr"
        );
    }
}
