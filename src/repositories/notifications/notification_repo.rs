use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::{IndexModel, bson::doc, options::IndexOptions};
use singleton_macro::repository;

use crate::{
    db::Database,
    domain::entities::notifications::Notification,
    errors::AppError,
    repositories::{db_error, inserted_object_id, parse_object_id},
};

#[repository(name = "notification", collection = "notifications")]
pub struct NotificationRepository {
    db: Arc<Database>,
}

impl NotificationRepository {
    pub async fn create(&self, mut notification: Notification) -> Result<Notification, AppError> {
        let result = self
            .collection::<Notification>()
            .insert_one(&notification)
            .await
            .map_err(db_error)?;
        notification.id = Some(inserted_object_id(&result)?);
        Ok(notification)
    }

    /// 최신순
    pub async fn find_by_recipient(&self, recipient_id: &str) -> Result<Vec<Notification>, AppError> {
        self.collection::<Notification>()
            .find(doc! { "recipient_id": recipient_id })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(db_error)?
            .try_collect()
            .await
            .map_err(db_error)
    }

    /// 수신자 본인의 알림만 읽음 처리. 대상이 없으면 `false`
    pub async fn mark_read(&self, id: &str, recipient_id: &str) -> Result<bool, AppError> {
        let object_id = parse_object_id(id)?;
        let result = self
            .collection::<Notification>()
            .update_one(
                doc! { "_id": object_id, "recipient_id": recipient_id },
                doc! { "$set": { "read": true } },
            )
            .await
            .map_err(db_error)?;
        Ok(result.matched_count > 0)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let recipient_index = IndexModel::builder()
            .keys(doc! { "recipient_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("recipient_created_at".to_string())
                    .build(),
            )
            .build();

        self.collection::<Notification>()
            .create_indexes([recipient_index])
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
