use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::entities::projects::{Priority, ProjectStatus, TaskStatus};
use crate::utils::string_utils::deserialize_optional_string;

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_project_dates"))]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "Le nom du projet est obligatoire"))]
    pub name: String,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,

    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub group_ids: Vec<String>,
}

fn validate_project_dates(req: &CreateProjectRequest) -> Result<(), ValidationError> {
    check_date_order(req.start_date, req.end_date)
}

/// 시작일과 종료일이 모두 있으면 종료일이 시작일보다 앞설 수 없음
fn check_date_order(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(ValidationError::new("invalid_dates")
                .with_message("La date de fin doit être postérieure à la date de début".into()));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_update_dates"))]
pub struct UpdateProjectRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 200, message = "Le nom du projet est trop long"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,

    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: Option<ProjectStatus>,
}

fn validate_update_dates(req: &UpdateProjectRequest) -> Result<(), ValidationError> {
    check_date_order(req.start_date, req.end_date)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeProjectStatusRequest {
    pub status: ProjectStatus,
}

/// `/api/taches`로 만들 때는 `project_id`가 필수, `/api/projets/{id}/taches`는 경로 값 사용
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Le titre de la tâche est obligatoire"))]
    pub title: String,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,

    #[serde(default)]
    pub priority: Option<Priority>,

    #[serde(default)]
    pub status: Option<TaskStatus>,

    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub project_id: Option<String>,

    #[serde(default)]
    pub assignee_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 200, message = "Le titre de la tâche est trop long"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,

    #[serde(default)]
    pub priority: Option<Priority>,

    #[serde(default)]
    pub status: Option<TaskStatus>,

    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeTaskStatusRequest {
    pub status: TaskStatus,
}

/// 학생 태스크 정렬: `date`(마감일 오름차순) 또는 `priorite`(HAUTE 먼저)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskSort {
    #[default]
    Date,
    Priorite,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskSortQuery {
    #[serde(default)]
    pub sort: Option<TaskSort>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_dates_must_be_ordered() {
        let request: CreateProjectRequest = serde_json::from_value(json!({
            "name": "Compilateur",
            "start_date": "2025-03-01T00:00:00Z",
            "end_date": "2025-02-01T00:00:00Z",
        }))
        .unwrap();
        assert!(request.validate().is_err());

        let request: CreateProjectRequest = serde_json::from_value(json!({
            "name": "Compilateur",
            "start_date": "2025-02-01T00:00:00Z",
            "end_date": "2025-03-01T00:00:00Z",
        }))
        .unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_task_request_uses_french_tags() {
        let request: CreateTaskRequest = serde_json::from_value(json!({
            "title": "Analyse",
            "priority": "HAUTE",
            "status": "EN_COURS",
            "project_id": "p1",
        }))
        .unwrap();
        assert_eq!(request.priority, Some(Priority::Haute));
        assert_eq!(request.status, Some(TaskStatus::EnCours));
        assert!(request.validate().is_ok());

        let empty_title: CreateTaskRequest =
            serde_json::from_value(json!({ "title": "" })).unwrap();
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_sort_query() {
        let query: TaskSortQuery = serde_json::from_value(json!({ "sort": "priorite" })).unwrap();
        assert_eq!(query.sort, Some(TaskSort::Priorite));
        assert_eq!(TaskSortQuery::default().sort.unwrap_or_default(), TaskSort::Date);
    }
}
