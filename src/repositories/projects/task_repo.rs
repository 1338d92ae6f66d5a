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
    domain::entities::projects::{Task, TaskStatus},
    errors::AppError,
    repositories::{db_error, inserted_object_id, parse_object_id},
};

/// 태스크는 프로젝트 문서에 내장하지 않고 `project_id`로 참조
#[repository(name = "task", collection = "tasks")]
pub struct TaskRepository {
    db: Arc<Database>,
}

impl TaskRepository {
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Task>, AppError> {
        let object_id = parse_object_id(id)?;
        self.collection::<Task>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(db_error)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Task, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tâche introuvable : {}", id)))
    }

    pub async fn find_by_project(&self, project_id: &str) -> Result<Vec<Task>, AppError> {
        self.find_many(doc! { "project_id": project_id }).await
    }

    pub async fn find_by_projects(&self, project_ids: &[String]) -> Result<Vec<Task>, AppError> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_many(doc! { "project_id": { "$in": project_ids } }).await
    }

    pub async fn find_by_project_and_status(
        &self,
        project_id: &str,
        status: TaskStatus,
    ) -> Result<Vec<Task>, AppError> {
        self.find_many(doc! { "project_id": project_id, "status": status.as_str() })
            .await
    }

    pub async fn find_by_assignee(&self, student_id: &str) -> Result<Vec<Task>, AppError> {
        self.find_many(doc! { "assignee_ids": student_id }).await
    }

    pub async fn find_late(&self, now: DateTime) -> Result<Vec<Task>, AppError> {
        self.find_many(doc! {
            "due_date": { "$lt": now },
            "status": { "$ne": TaskStatus::Terminee.as_str() },
        })
        .await
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<Task>, AppError> {
        self.collection::<Task>()
            .find(filter)
            .sort(doc! { "due_date": 1, "start_date": 1 })
            .await
            .map_err(db_error)?
            .try_collect()
            .await
            .map_err(db_error)
    }

    pub async fn create(&self, mut task: Task) -> Result<Task, AppError> {
        let result = self
            .collection::<Task>()
            .insert_one(&task)
            .await
            .map_err(db_error)?;
        task.id = Some(inserted_object_id(&result)?);
        Ok(task)
    }

    pub async fn save(&self, task: &Task) -> Result<(), AppError> {
        let id = task
            .id
            .ok_or_else(|| AppError::InternalError("ID 없는 태스크는 저장할 수 없습니다".to_string()))?;

        let result = self
            .collection::<Task>()
            .replace_one(doc! { "_id": id }, task)
            .await
            .map_err(db_error)?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Tâche introuvable : {}", id.to_hex())));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let object_id = parse_object_id(id)?;
        let result = self
            .collection::<Task>()
            .delete_one(doc! { "_id": object_id })
            .await
            .map_err(db_error)?;
        Ok(result.deleted_count > 0)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let project_index = IndexModel::builder()
            .keys(doc! { "project_id": 1, "status": 1 })
            .options(IndexOptions::builder().name("project_status".to_string()).build())
            .build();

        let assignee_index = IndexModel::builder()
            .keys(doc! { "assignee_ids": 1 })
            .options(IndexOptions::builder().name("assignee_ids".to_string()).build())
            .build();

        self.collection::<Task>()
            .create_indexes([project_index, assignee_index])
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
