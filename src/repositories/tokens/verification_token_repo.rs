use std::sync::Arc;
use std::time::Duration;

use mongodb::{IndexModel, bson::doc, options::IndexOptions};
use singleton_macro::repository;

use crate::{
    db::Database,
    domain::entities::tokens::{TokenType, VerificationToken},
    errors::AppError,
    repositories::{db_error, inserted_object_id},
};

#[repository(name = "verificationtoken", collection = "verification_tokens")]
pub struct VerificationTokenRepository {
    db: Arc<Database>,
}

impl VerificationTokenRepository {
    pub async fn create(&self, mut token: VerificationToken) -> Result<VerificationToken, AppError> {
        let result = self
            .collection::<VerificationToken>()
            .insert_one(&token)
            .await
            .map_err(db_error)?;
        token.id = Some(inserted_object_id(&result)?);
        Ok(token)
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<VerificationToken>, AppError> {
        self.collection::<VerificationToken>()
            .find_one(doc! { "token": token })
            .await
            .map_err(db_error)
    }

    pub async fn delete(&self, token: &VerificationToken) -> Result<(), AppError> {
        if let Some(id) = token.id {
            self.collection::<VerificationToken>()
                .delete_one(doc! { "_id": id })
                .await
                .map_err(db_error)?;
        }
        Ok(())
    }

    /// 같은 종류의 기존 토큰을 모두 삭제
    pub async fn delete_by_user_and_type(
        &self,
        user_id: &str,
        token_type: TokenType,
    ) -> Result<u64, AppError> {
        let token_type = mongodb::bson::to_bson(&token_type)
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let result = self
            .collection::<VerificationToken>()
            .delete_many(doc! { "user_id": user_id, "token_type": token_type })
            .await
            .map_err(db_error)?;
        Ok(result.deleted_count)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let token_index = IndexModel::builder()
            .keys(doc! { "token": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("token_unique".to_string())
                    .build(),
            )
            .build();

        // 만료된 토큰은 MongoDB TTL 모니터가 정리
        let expiry_index = IndexModel::builder()
            .keys(doc! { "expires_at": 1 })
            .options(
                IndexOptions::builder()
                    .expire_after(Duration::from_secs(0))
                    .name("expires_at_ttl".to_string())
                    .build(),
            )
            .build();

        self.collection::<VerificationToken>()
            .create_indexes([token_index, expiry_index])
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
