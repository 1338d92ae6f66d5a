//! 프로젝트 엔티티
//!
//! 태스크는 `tasks` 컬렉션에 `project_id`로 연결되며, 진행률(`progress`)은
//! 태스크가 바뀔 때마다 다시 계산해 프로젝트 문서에 저장합니다.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use super::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Planifie,
    EnAttente,
    EnCours,
    Termine,
    Annule,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planifie => "PLANIFIE",
            ProjectStatus::EnAttente => "EN_ATTENTE",
            ProjectStatus::EnCours => "EN_COURS",
            ProjectStatus::Termine => "TERMINE",
            ProjectStatus::Annule => "ANNULE",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "PLANIFIE" => Some(ProjectStatus::Planifie),
            "EN_ATTENTE" => Some(ProjectStatus::EnAttente),
            "EN_COURS" => Some(ProjectStatus::EnCours),
            "TERMINE" => Some(ProjectStatus::Termine),
            "ANNULE" => Some(ProjectStatus::Annule),
            _ => None,
        }
    }
}

/// 프로젝트 태스크 통계
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub late_tasks: usize,
    pub progress: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<DateTime>,
    pub end_date: Option<DateTime>,
    pub status: ProjectStatus,
    /// 0 ~ 100
    pub progress: f64,
    /// 소유 교수
    pub teacher_id: String,
    pub archived: bool,
    pub archived_at: Option<DateTime>,
    #[serde(default)]
    pub group_ids: Vec<String>,
    pub created_at: DateTime,
}

impl Project {
    pub fn new(name: String, teacher_id: String) -> Self {
        Self {
            id: None,
            name,
            description: None,
            start_date: None,
            end_date: None,
            status: ProjectStatus::Planifie,
            progress: 0.0,
            teacher_id,
            archived: false,
            archived_at: None,
            group_ids: Vec::new(),
            created_at: DateTime::now(),
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.teacher_id == user_id
    }

    /// 종료일이 지났는데 `TERMINE`가 아님
    pub fn is_late(&self, now: DateTime) -> bool {
        match self.end_date {
            Some(end) => end < now && self.status != ProjectStatus::Termine,
            None => false,
        }
    }

    /// 완료 태스크 비율(%). 태스크가 없으면 0
    pub fn compute_progress(tasks: &[Task]) -> f64 {
        if tasks.is_empty() {
            return 0.0;
        }
        let completed = tasks.iter().filter(|t| t.is_completed()).count();
        completed as f64 / tasks.len() as f64 * 100.0
    }

    pub fn late_tasks<'a>(tasks: &'a [Task], now: DateTime) -> Vec<&'a Task> {
        tasks.iter().filter(|t| t.is_late(now)).collect()
    }

    pub fn stats(tasks: &[Task], now: DateTime) -> ProjectStats {
        ProjectStats {
            total_tasks: tasks.len(),
            completed_tasks: tasks.iter().filter(|t| t.is_completed()).count(),
            late_tasks: Self::late_tasks(tasks, now).len(),
            progress: Self::compute_progress(tasks),
        }
    }

    pub fn set_archived(&mut self, archived: bool, now: DateTime) {
        self.archived = archived;
        self.archived_at = archived.then_some(now);
    }

    /// 이미 연결된 그룹이면 `false`
    pub fn link_group(&mut self, group_id: &str) -> bool {
        if self.group_ids.iter().any(|id| id == group_id) {
            return false;
        }
        self.group_ids.push(group_id.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::projects::task::TaskStatus;

    fn at(millis: i64) -> DateTime {
        DateTime::from_millis(millis)
    }

    fn task(status: TaskStatus, due: Option<i64>) -> Task {
        let mut task = Task::new("t".into(), "p".into());
        task.status = status;
        task.due_date = due.map(at);
        task
    }

    #[test]
    fn test_new_project_defaults() {
        let project = Project::new("Compilateur".into(), "prof-1".into());
        assert_eq!(project.status, ProjectStatus::Planifie);
        assert_eq!(project.progress, 0.0);
        assert!(!project.archived);
        assert!(project.is_owned_by("prof-1"));
    }

    #[test]
    fn test_progress_without_tasks_is_zero() {
        assert_eq!(Project::compute_progress(&[]), 0.0);
    }

    #[test]
    fn test_progress_ratio() {
        let tasks = vec![
            task(TaskStatus::Terminee, None),
            task(TaskStatus::EnCours, None),
            task(TaskStatus::AFaire, None),
            task(TaskStatus::Terminee, None),
        ];
        assert_eq!(Project::compute_progress(&tasks), 50.0);
    }

    #[test]
    fn test_stats_count_late_tasks() {
        let tasks = vec![
            task(TaskStatus::AFaire, Some(1_000)),
            task(TaskStatus::Terminee, Some(1_000)),
            task(TaskStatus::EnCours, Some(9_000)),
        ];
        let stats = Project::stats(&tasks, at(5_000));
        assert_eq!(stats.total_tasks, 3);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.late_tasks, 1);
    }

    #[test]
    fn test_project_lateness() {
        let mut project = Project::new("P".into(), "t".into());
        assert!(!project.is_late(at(10)));

        project.end_date = Some(at(5));
        assert!(project.is_late(at(10)));

        project.status = ProjectStatus::Termine;
        assert!(!project.is_late(at(10)));
    }

    #[test]
    fn test_archive_sets_and_clears_timestamp() {
        let mut project = Project::new("P".into(), "t".into());
        project.set_archived(true, at(42));
        assert_eq!(project.archived_at, Some(at(42)));
        project.set_archived(false, at(43));
        assert!(project.archived_at.is_none());
    }

    #[test]
    fn test_link_group_is_idempotent() {
        let mut project = Project::new("P".into(), "t".into());
        assert!(project.link_group("g1"));
        assert!(!project.link_group("g1"));
        assert_eq!(project.group_ids.len(), 1);
    }
}
