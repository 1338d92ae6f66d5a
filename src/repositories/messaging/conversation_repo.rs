use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::{
    IndexModel,
    bson::{Document, doc},
    options::IndexOptions,
};
use singleton_macro::repository;

use crate::{
    db::Database,
    domain::entities::messaging::Conversation,
    errors::AppError,
    repositories::{db_error, inserted_object_id, is_duplicate_key, parse_object_id},
};

#[repository(name = "conversation", collection = "conversations")]
pub struct ConversationRepository {
    db: Arc<Database>,
}

impl ConversationRepository {
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Conversation>, AppError> {
        let object_id = parse_object_id(id)?;
        self.collection::<Conversation>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(db_error)
    }

    pub async fn find_by_group_and_teacher(
        &self,
        group_id: &str,
        teacher_id: &str,
    ) -> Result<Option<Conversation>, AppError> {
        self.collection::<Conversation>()
            .find_one(doc! { "group_id": group_id, "teacher_id": teacher_id })
            .await
            .map_err(db_error)
    }

    pub async fn find_by_group(&self, group_id: &str) -> Result<Vec<Conversation>, AppError> {
        self.find_many(doc! { "group_id": group_id }).await
    }

    pub async fn find_by_teacher(&self, teacher_id: &str) -> Result<Vec<Conversation>, AppError> {
        self.find_many(doc! { "teacher_id": teacher_id }).await
    }

    /// 교수로 참여하거나 소속 그룹의 대화방
    pub async fn find_for_participant(
        &self,
        user_id: &str,
        group_ids: &[String],
    ) -> Result<Vec<Conversation>, AppError> {
        self.find_many(doc! {
            "$or": [
                { "teacher_id": user_id },
                { "group_id": { "$in": group_ids } },
            ]
        })
        .await
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<Conversation>, AppError> {
        self.collection::<Conversation>()
            .find(filter)
            .sort(doc! { "last_message_at": -1, "created_at": -1 })
            .await
            .map_err(db_error)?
            .try_collect()
            .await
            .map_err(db_error)
    }

    /// 같은 (그룹, 교수) 쌍이 동시에 생성되면 먼저 들어간 문서를 반환
    pub async fn create_or_existing(&self, mut conversation: Conversation) -> Result<Conversation, AppError> {
        match self.collection::<Conversation>().insert_one(&conversation).await {
            Ok(result) => {
                conversation.id = Some(inserted_object_id(&result)?);
                Ok(conversation)
            }
            Err(e) if is_duplicate_key(&e) => {
                log::debug!(
                    "대화방 중복 생성 경합 - group_id: {}, teacher_id: {}",
                    conversation.group_id,
                    conversation.teacher_id
                );
                self.find_by_group_and_teacher(&conversation.group_id, &conversation.teacher_id)
                    .await?
                    .ok_or_else(|| AppError::DatabaseError(e.to_string()))
            }
            Err(e) => Err(db_error(e)),
        }
    }

    pub async fn save(&self, conversation: &Conversation) -> Result<(), AppError> {
        let id = conversation
            .id
            .ok_or_else(|| AppError::InternalError("ID 없는 대화방은 저장할 수 없습니다".to_string()))?;

        self.collection::<Conversation>()
            .replace_one(doc! { "_id": id }, conversation)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let pair_index = IndexModel::builder()
            .keys(doc! { "group_id": 1, "teacher_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("group_teacher_unique".to_string())
                    .build(),
            )
            .build();

        self.collection::<Conversation>()
            .create_indexes([pair_index])
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
