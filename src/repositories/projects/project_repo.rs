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
    domain::entities::projects::{Project, ProjectStatus},
    errors::AppError,
    repositories::{db_error, inserted_object_id, parse_object_id, parse_object_ids},
};

#[repository(name = "project", collection = "projects")]
pub struct ProjectRepository {
    db: Arc<Database>,
}

impl ProjectRepository {
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Project>, AppError> {
        let object_id = parse_object_id(id)?;
        self.collection::<Project>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(db_error)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Project, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Projet introuvable : {}", id)))
    }

    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Project>, AppError> {
        let object_ids = parse_object_ids(ids);
        if object_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_many(doc! { "_id": { "$in": object_ids } }).await
    }

    pub async fn find_all(&self) -> Result<Vec<Project>, AppError> {
        self.find_many(doc! {}).await
    }

    pub async fn find_by_teacher(&self, teacher_id: &str, archived: bool) -> Result<Vec<Project>, AppError> {
        self.find_many(doc! { "teacher_id": teacher_id, "archived": archived })
            .await
    }

    /// 종료일이 지났는데 끝나지 않은 보관되지 않은 프로젝트
    pub async fn find_late(&self, now: DateTime) -> Result<Vec<Project>, AppError> {
        self.find_many(doc! {
            "archived": false,
            "end_date": { "$lt": now },
            "status": { "$ne": ProjectStatus::Termine.as_str() },
        })
        .await
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<Project>, AppError> {
        self.collection::<Project>()
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(db_error)?
            .try_collect()
            .await
            .map_err(db_error)
    }

    pub async fn create(&self, mut project: Project) -> Result<Project, AppError> {
        let result = self
            .collection::<Project>()
            .insert_one(&project)
            .await
            .map_err(db_error)?;
        project.id = Some(inserted_object_id(&result)?);
        Ok(project)
    }

    pub async fn save(&self, project: &Project) -> Result<(), AppError> {
        let id = project
            .id
            .ok_or_else(|| AppError::InternalError("ID 없는 프로젝트는 저장할 수 없습니다".to_string()))?;

        let result = self
            .collection::<Project>()
            .replace_one(doc! { "_id": id }, project)
            .await
            .map_err(db_error)?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Projet introuvable : {}", id.to_hex())));
        }
        Ok(())
    }

    /// 태스크 변경 후 진행률만 갱신
    pub async fn update_progress(&self, id: &str, progress: f64) -> Result<(), AppError> {
        let object_id = parse_object_id(id)?;
        self.collection::<Project>()
            .update_one(doc! { "_id": object_id }, doc! { "$set": { "progress": progress } })
            .await
            .map_err(db_error)?;
        Ok(())
    }

    pub async fn count(&self, filter: Document) -> Result<u64, AppError> {
        self.collection::<Project>()
            .count_documents(filter)
            .await
            .map_err(db_error)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let teacher_index = IndexModel::builder()
            .keys(doc! { "teacher_id": 1, "archived": 1 })
            .options(IndexOptions::builder().name("teacher_archived".to_string()).build())
            .build();

        let end_date_index = IndexModel::builder()
            .keys(doc! { "end_date": 1 })
            .options(IndexOptions::builder().name("end_date".to_string()).build())
            .build();

        self.collection::<Project>()
            .create_indexes([teacher_index, end_date_index])
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
