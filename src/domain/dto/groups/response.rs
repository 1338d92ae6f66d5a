use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::groups::Group;
use crate::utils::time_utils::to_chrono;

#[derive(Debug, Clone, Serialize)]
pub struct GroupResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub progress: f64,
    pub created_at: DateTime<Utc>,
    pub archived: bool,
    pub student_ids: Vec<String>,
    pub project_ids: Vec<String>,
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            id: group.id_string().unwrap_or_default(),
            name: group.name,
            description: group.description,
            progress: group.progress,
            created_at: to_chrono(group.created_at),
            archived: group.archived,
            student_ids: group.student_ids,
            project_ids: group.project_ids,
        }
    }
}
