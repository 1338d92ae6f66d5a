use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::{
    IndexModel,
    bson::{DateTime, Document, doc},
    options::IndexOptions,
};
use singleton_macro::repository;

use crate::{
    db::Database,
    domain::entities::deliverables::{Deliverable, DeliverableStatus},
    errors::AppError,
    repositories::{db_error, inserted_object_id, parse_object_id},
};

#[repository(name = "deliverable", collection = "deliverables")]
pub struct DeliverableRepository {
    db: Arc<Database>,
}

impl DeliverableRepository {
    /// 마감일이 지났고 아직 제출 단계인 산출물 필터
    fn late_filter(now: DateTime) -> Document {
        doc! {
            "due_date": { "$lt": now },
            "status": {
                "$in": [
                    DeliverableStatus::ASoumettre.as_str(),
                    DeliverableStatus::Soumis.as_str(),
                ]
            },
        }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Deliverable>, AppError> {
        let object_id = parse_object_id(id)?;
        self.collection::<Deliverable>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(db_error)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Deliverable, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Livrable introuvable : {}", id)))
    }

    pub async fn find_by_project(&self, project_id: &str) -> Result<Vec<Deliverable>, AppError> {
        self.find_many(doc! { "project_id": project_id }).await
    }

    pub async fn find_by_projects(&self, project_ids: &[String]) -> Result<Vec<Deliverable>, AppError> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_many(doc! { "project_id": { "$in": project_ids } }).await
    }

    pub async fn find_by_group(&self, group_id: &str) -> Result<Vec<Deliverable>, AppError> {
        self.find_many(doc! { "group_id": group_id }).await
    }

    pub async fn find_late(&self, now: DateTime) -> Result<Vec<Deliverable>, AppError> {
        self.find_many(Self::late_filter(now)).await
    }

    pub async fn count_late(&self, now: DateTime) -> Result<u64, AppError> {
        self.collection::<Deliverable>()
            .count_documents(Self::late_filter(now))
            .await
            .map_err(db_error)
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<Deliverable>, AppError> {
        self.collection::<Deliverable>()
            .find(filter)
            .sort(doc! { "due_date": 1 })
            .await
            .map_err(db_error)?
            .try_collect()
            .await
            .map_err(db_error)
    }

    pub async fn create(&self, mut deliverable: Deliverable) -> Result<Deliverable, AppError> {
        let result = self
            .collection::<Deliverable>()
            .insert_one(&deliverable)
            .await
            .map_err(db_error)?;
        deliverable.id = Some(inserted_object_id(&result)?);
        Ok(deliverable)
    }

    pub async fn save(&self, deliverable: &Deliverable) -> Result<(), AppError> {
        let id = deliverable
            .id
            .ok_or_else(|| AppError::InternalError("ID 없는 산출물은 저장할 수 없습니다".to_string()))?;

        let result = self
            .collection::<Deliverable>()
            .replace_one(doc! { "_id": id }, deliverable)
            .await
            .map_err(db_error)?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Livrable introuvable : {}", id.to_hex())));
        }
        Ok(())
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let project_index = IndexModel::builder()
            .keys(doc! { "project_id": 1 })
            .options(IndexOptions::builder().name("project_id".to_string()).build())
            .build();

        let group_index = IndexModel::builder()
            .keys(doc! { "group_id": 1 })
            .options(IndexOptions::builder().name("group_id".to_string()).build())
            .build();

        let due_index = IndexModel::builder()
            .keys(doc! { "due_date": 1, "status": 1 })
            .options(IndexOptions::builder().name("due_date_status".to_string()).build())
            .build();

        self.collection::<Deliverable>()
            .create_indexes([project_index, group_index, due_index])
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_late_filter_targets_pending_statuses() {
        let filter = DeliverableRepository::late_filter(DateTime::from_millis(1_000));
        let statuses = filter
            .get_document("status")
            .and_then(|s| s.get_array("$in"))
            .unwrap();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].as_str(), Some("A_SOUMETTRE"));
        assert_eq!(statuses[1].as_str(), Some("SOUMIS"));
    }
}
