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
    domain::entities::messaging::Message,
    errors::AppError,
    repositories::{db_error, inserted_object_id},
};

/// `scope` 조건에 "남이 보냈고 `reader_id`가 읽지 않음"을 덧붙임
fn unread_filter(mut scope: Document, reader_id: &str) -> Document {
    scope.insert("sender_id", doc! { "$ne": reader_id });
    scope.insert("read_by", doc! { "$ne": reader_id });
    scope
}

/// 메시지는 추가만 하고 수정하지 않음 (읽음 표시 제외)
#[repository(name = "message", collection = "messages")]
pub struct MessageRepository {
    db: Arc<Database>,
}

impl MessageRepository {
    pub async fn find_by_conversation(&self, conversation_id: &str) -> Result<Vec<Message>, AppError> {
        self.collection::<Message>()
            .find(doc! { "conversation_id": conversation_id })
            .sort(doc! { "sent_at": 1 })
            .await
            .map_err(db_error)?
            .try_collect()
            .await
            .map_err(db_error)
    }

    pub async fn create(&self, mut message: Message) -> Result<Message, AppError> {
        let result = self
            .collection::<Message>()
            .insert_one(&message)
            .await
            .map_err(db_error)?;
        message.id = Some(inserted_object_id(&result)?);
        Ok(message)
    }

    /// 다른 사람이 보낸 메시지 중 `reader_id`가 아직 안 읽은 것만 읽음 처리
    pub async fn mark_read(&self, conversation_id: &str, reader_id: &str) -> Result<u64, AppError> {
        let result = self
            .collection::<Message>()
            .update_many(
                unread_filter(doc! { "conversation_id": conversation_id }, reader_id),
                doc! { "$addToSet": { "read_by": reader_id } },
            )
            .await
            .map_err(db_error)?;
        Ok(result.modified_count)
    }

    pub async fn count_unread(&self, conversation_ids: &[String], reader_id: &str) -> Result<u64, AppError> {
        if conversation_ids.is_empty() {
            return Ok(0);
        }
        self.collection::<Message>()
            .count_documents(unread_filter(
                doc! { "conversation_id": { "$in": conversation_ids } },
                reader_id,
            ))
            .await
            .map_err(db_error)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let conversation_index = IndexModel::builder()
            .keys(doc! { "conversation_id": 1, "sent_at": 1 })
            .options(
                IndexOptions::builder()
                    .name("conversation_sent_at".to_string())
                    .build(),
            )
            .build();

        self.collection::<Message>()
            .create_indexes([conversation_index])
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unread_filter_is_scoped_to_reader() {
        let for_alice = unread_filter(doc! { "conversation_id": "c1" }, "alice");
        assert_eq!(
            for_alice,
            doc! {
                "conversation_id": "c1",
                "sender_id": { "$ne": "alice" },
                "read_by": { "$ne": "alice" },
            }
        );

        // 다른 참여자의 읽음 여부는 조건에 들어가지 않음
        let for_bob = unread_filter(doc! { "conversation_id": "c1" }, "bob");
        assert_eq!(for_bob.get_document("read_by").unwrap(), &doc! { "$ne": "bob" });
        assert!(!for_bob.contains_key("read"));
    }
}
