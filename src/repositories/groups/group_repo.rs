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
    domain::entities::groups::Group,
    errors::AppError,
    repositories::{db_error, inserted_object_id, parse_object_id, parse_object_ids},
};

#[repository(name = "group", collection = "groups")]
pub struct GroupRepository {
    db: Arc<Database>,
}

impl GroupRepository {
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Group>, AppError> {
        let object_id = parse_object_id(id)?;
        self.collection::<Group>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(db_error)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Group, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Groupe introuvable : {}", id)))
    }

    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Group>, AppError> {
        let object_ids = parse_object_ids(ids);
        if object_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_many(doc! { "_id": { "$in": object_ids } }).await
    }

    /// 보관되지 않은 그룹
    pub async fn find_active(&self) -> Result<Vec<Group>, AppError> {
        self.find_many(doc! { "archived": false }).await
    }

    pub async fn find_by_student(&self, student_id: &str) -> Result<Vec<Group>, AppError> {
        self.find_many(doc! { "student_ids": student_id, "archived": false })
            .await
    }

    pub async fn find_by_project(&self, project_id: &str) -> Result<Vec<Group>, AppError> {
        self.find_many(doc! { "project_ids": project_id }).await
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<Group>, AppError> {
        self.collection::<Group>()
            .find(filter)
            .sort(doc! { "name": 1 })
            .await
            .map_err(db_error)?
            .try_collect()
            .await
            .map_err(db_error)
    }

    pub async fn create(&self, mut group: Group) -> Result<Group, AppError> {
        let result = self
            .collection::<Group>()
            .insert_one(&group)
            .await
            .map_err(db_error)?;
        group.id = Some(inserted_object_id(&result)?);
        Ok(group)
    }

    pub async fn save(&self, group: &Group) -> Result<(), AppError> {
        let id = group
            .id
            .ok_or_else(|| AppError::InternalError("ID 없는 그룹은 저장할 수 없습니다".to_string()))?;

        let result = self
            .collection::<Group>()
            .replace_one(doc! { "_id": id }, group)
            .await
            .map_err(db_error)?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Groupe introuvable : {}", id.to_hex())));
        }
        Ok(())
    }

    pub async fn count(&self, filter: Document) -> Result<u64, AppError> {
        self.collection::<Group>()
            .count_documents(filter)
            .await
            .map_err(db_error)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let student_index = IndexModel::builder()
            .keys(doc! { "student_ids": 1 })
            .options(IndexOptions::builder().name("student_ids".to_string()).build())
            .build();

        let project_index = IndexModel::builder()
            .keys(doc! { "project_ids": 1 })
            .options(IndexOptions::builder().name("project_ids".to_string()).build())
            .build();

        self.collection::<Group>()
            .create_indexes([student_index, project_index])
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
