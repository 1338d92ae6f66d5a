use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::domain::entities::projects::Project;

/// 학생 그룹. 학생과 프로젝트는 ID 참조로만 보관
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: Option<String>,
    pub progress: f64,
    pub created_at: DateTime,
    pub archived: bool,
    #[serde(default)]
    pub student_ids: Vec<String>,
    #[serde(default)]
    pub project_ids: Vec<String>,
}

impl Group {
    pub fn new(name: String, description: Option<String>) -> Self {
        Self {
            id: None,
            name,
            description,
            progress: 0.0,
            created_at: DateTime::now(),
            archived: false,
            student_ids: Vec::new(),
            project_ids: Vec::new(),
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn has_student(&self, student_id: &str) -> bool {
        self.student_ids.iter().any(|id| id == student_id)
    }

    pub fn add_student(&mut self, student_id: &str) -> bool {
        if self.has_student(student_id) {
            return false;
        }
        self.student_ids.push(student_id.to_string());
        true
    }

    pub fn remove_student(&mut self, student_id: &str) -> bool {
        let before = self.student_ids.len();
        self.student_ids.retain(|id| id != student_id);
        before != self.student_ids.len()
    }

    pub fn add_project(&mut self, project_id: &str) -> bool {
        if self.project_ids.iter().any(|id| id == project_id) {
            return false;
        }
        self.project_ids.push(project_id.to_string());
        true
    }

    /// 연결된 프로젝트 진행률의 평균. 프로젝트가 없으면 0
    pub fn compute_progress(projects: &[Project]) -> f64 {
        if projects.is_empty() {
            return 0.0;
        }
        projects.iter().map(|p| p.progress).sum::<f64>() / projects.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_with_progress(progress: f64) -> Project {
        let mut project = Project::new("p".into(), "t".into());
        project.progress = progress;
        project
    }

    #[test]
    fn test_new_group_defaults() {
        let group = Group::new("G1".into(), None);
        assert_eq!(group.progress, 0.0);
        assert!(!group.archived);
    }

    #[test]
    fn test_membership_is_idempotent() {
        let mut group = Group::new("G1".into(), None);
        assert!(group.add_student("s1"));
        assert!(!group.add_student("s1"));
        assert!(group.has_student("s1"));
        assert!(group.remove_student("s1"));
        assert!(!group.remove_student("s1"));

        assert!(group.add_project("p1"));
        assert!(!group.add_project("p1"));
        assert_eq!(group.project_ids.len(), 1);
    }

    #[test]
    fn test_progress_is_average_of_projects() {
        assert_eq!(Group::compute_progress(&[]), 0.0);
        let projects = vec![project_with_progress(100.0), project_with_progress(50.0)];
        assert_eq!(Group::compute_progress(&projects), 75.0);
    }
}
