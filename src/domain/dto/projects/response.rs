use chrono::{DateTime, Utc};
use mongodb::bson;
use serde::Serialize;

use crate::domain::entities::projects::{Priority, Project, ProjectStats, ProjectStatus, Task, TaskStatus};
use crate::utils::time_utils::{opt_to_chrono, to_chrono};

#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub start_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub assignee_ids: Vec<String>,
    pub project_id: String,
    pub late: bool,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        let late = task.is_late(bson::DateTime::now());
        Self {
            id: task.id_string().unwrap_or_default(),
            title: task.title,
            description: task.description,
            priority: task.priority,
            status: task.status,
            start_date: to_chrono(task.start_date),
            due_date: opt_to_chrono(task.due_date),
            completed_at: opt_to_chrono(task.completed_at),
            assignee_ids: task.assignee_ids,
            project_id: task.project_id,
            late,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: ProjectStatus,
    pub progress: f64,
    pub teacher_id: String,
    pub archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub group_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub late: bool,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        let late = project.is_late(bson::DateTime::now());
        Self {
            id: project.id_string().unwrap_or_default(),
            name: project.name,
            description: project.description,
            start_date: opt_to_chrono(project.start_date),
            end_date: opt_to_chrono(project.end_date),
            status: project.status,
            progress: project.progress,
            teacher_id: project.teacher_id,
            archived: project.archived,
            archived_at: opt_to_chrono(project.archived_at),
            group_ids: project.group_ids,
            created_at: to_chrono(project.created_at),
            late,
        }
    }
}

/// 태스크와 통계를 포함한 프로젝트 상세
#[derive(Debug, Serialize)]
pub struct ProjectDetailResponse {
    #[serde(flatten)]
    pub project: ProjectResponse,
    pub tasks: Vec<TaskResponse>,
    pub stats: ProjectStats,
}

#[derive(Debug, Serialize)]
pub struct ProjectStatsResponse {
    pub project_id: String,
    pub name: String,
    pub teacher_id: String,
    #[serde(flatten)]
    pub stats: ProjectStats,
}

/// 학생 캘린더 항목 (프로젝트 기간)
#[derive(Debug, Serialize)]
pub struct CalendarEntry {
    pub project_id: String,
    pub title: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub status: ProjectStatus,
}

impl From<&Project> for CalendarEntry {
    fn from(project: &Project) -> Self {
        Self {
            project_id: project.id_string().unwrap_or_default(),
            title: project.name.clone(),
            start: opt_to_chrono(project.start_date),
            end: opt_to_chrono(project.end_date),
            status: project.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_flattens_project_fields() {
        let project = Project::new("Compilateur".into(), "prof".into());
        let detail = ProjectDetailResponse {
            project: project.into(),
            tasks: Vec::new(),
            stats: Project::stats(&[], bson::DateTime::now()),
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["name"], "Compilateur");
        assert_eq!(json["status"], "PLANIFIE");
        assert_eq!(json["stats"]["total_tasks"], 0);
        assert_eq!(json["late"], false);
    }

    #[test]
    fn test_task_response_flags_lateness() {
        let mut task = Task::new("Analyse".into(), "p1".into());
        task.due_date = Some(bson::DateTime::from_millis(0));

        let response = TaskResponse::from(task);
        assert!(response.late);
        assert_eq!(response.status, TaskStatus::AFaire);
    }
}
