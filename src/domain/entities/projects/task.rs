use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    AFaire,
    EnCours,
    Terminee,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::AFaire
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::AFaire => "A_FAIRE",
            TaskStatus::EnCours => "EN_COURS",
            TaskStatus::Terminee => "TERMINEE",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "A_FAIRE" => Some(TaskStatus::AFaire),
            "EN_COURS" => Some(TaskStatus::EnCours),
            "TERMINEE" => Some(TaskStatus::Terminee),
            _ => None,
        }
    }
}

/// 우선순위. 정렬 시 `HAUTE`가 먼저 오도록 `rank()` 사용
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Basse,
    Moyenne,
    Haute,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Moyenne
    }
}

impl Priority {
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Haute => 0,
            Priority::Moyenne => 1,
            Priority::Basse => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    pub start_date: DateTime,
    pub due_date: Option<DateTime>,
    /// `TERMINEE`가 된 시각
    pub completed_at: Option<DateTime>,
    #[serde(default)]
    pub assignee_ids: Vec<String>,
    pub project_id: String,
}

impl Task {
    pub fn new(title: String, project_id: String) -> Self {
        Self {
            id: None,
            title,
            description: None,
            priority: Priority::default(),
            status: TaskStatus::default(),
            start_date: DateTime::now(),
            due_date: None,
            completed_at: None,
            assignee_ids: Vec::new(),
            project_id,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Terminee
    }

    /// 마감일이 지났고 아직 완료되지 않음
    pub fn is_late(&self, now: DateTime) -> bool {
        match self.due_date {
            Some(due) => now > due && !self.is_completed(),
            None => false,
        }
    }

    /// 상태 변경. `TERMINEE`로 바뀔 때 완료 시각이 없으면 기록
    pub fn change_status(&mut self, status: TaskStatus, now: DateTime) {
        self.status = status;
        if status == TaskStatus::Terminee && self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
    }

    /// 이미 배정되어 있으면 `false`
    pub fn assign(&mut self, student_id: &str) -> bool {
        if self.assignee_ids.iter().any(|id| id == student_id) {
            return false;
        }
        self.assignee_ids.push(student_id.to_string());
        true
    }

    pub fn unassign(&mut self, student_id: &str) -> bool {
        let before = self.assignee_ids.len();
        self.assignee_ids.retain(|id| id != student_id);
        self.assignee_ids.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(millis: i64) -> DateTime {
        DateTime::from_millis(millis)
    }

    #[test]
    fn test_defaults() {
        let task = Task::new("Maquette".into(), "p1".into());
        assert_eq!(task.priority, Priority::Moyenne);
        assert_eq!(task.status, TaskStatus::AFaire);
        assert!(task.assignee_ids.is_empty());
    }

    #[test]
    fn test_lateness() {
        let mut task = Task::new("Rapport".into(), "p1".into());
        assert!(!task.is_late(at(10_000)));

        task.due_date = Some(at(5_000));
        assert!(task.is_late(at(10_000)));
        assert!(!task.is_late(at(1_000)));

        task.change_status(TaskStatus::Terminee, at(10_000));
        assert!(!task.is_late(at(20_000)));
    }

    #[test]
    fn test_completion_time_is_set_once() {
        let mut task = Task::new("Tests".into(), "p1".into());
        task.change_status(TaskStatus::EnCours, at(1_000));
        assert!(task.completed_at.is_none());

        task.change_status(TaskStatus::Terminee, at(2_000));
        task.change_status(TaskStatus::Terminee, at(3_000));
        assert_eq!(task.completed_at, Some(at(2_000)));
    }

    #[test]
    fn test_assignment_is_idempotent() {
        let mut task = Task::new("Code".into(), "p1".into());
        assert!(task.assign("s1"));
        assert!(!task.assign("s1"));
        assert_eq!(task.assignee_ids, vec!["s1".to_string()]);

        assert!(task.unassign("s1"));
        assert!(!task.unassign("s1"));
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&TaskStatus::AFaire).unwrap(), "\"A_FAIRE\"");
        assert_eq!(TaskStatus::from_str("terminee"), Some(TaskStatus::Terminee));
        assert!(Priority::Haute.rank() < Priority::Basse.rank());
    }
}
