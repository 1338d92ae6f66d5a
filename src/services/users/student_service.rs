//! 학생 본인 기준 조회와 작업
//!
//! 학생의 프로젝트는 직접 연결되지 않고 소속 그룹을 통해 결정됩니다.

use std::sync::Arc;

use singleton_macro::service;

use crate::{
    domain::{
        dto::{
            deliverables::{DeliverableCommentsResponse, DeliverableResponse},
            notifications::NotificationResponse,
            projects::{CalendarEntry, ProjectResponse, TaskResponse, TaskSort},
        },
        entities::{groups::Group, projects::{Project, TaskStatus}},
        models::AuthenticatedUser,
    },
    errors::AppError,
    repositories::{groups::GroupRepository, projects::ProjectRepository},
    services::{
        deliverables::DeliverableService, notifications::NotificationService,
        projects::TaskService,
    },
};

#[service(name = "student")]
pub struct StudentService {
    group_repo: Arc<GroupRepository>,
    project_repo: Arc<ProjectRepository>,
    task_service: Arc<TaskService>,
    deliverable_service: Arc<DeliverableService>,
    notification_service: Arc<NotificationService>,
}

/// 그룹들에 연결된 프로젝트 ID (중복 제거)
fn group_project_ids(groups: &[Group]) -> Vec<String> {
    let mut ids: Vec<String> = groups
        .iter()
        .flat_map(|g| g.project_ids.iter().cloned())
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

impl StudentService {
    /// 보관된 프로젝트는 제외
    async fn projects_of(&self, student_id: &str) -> Result<Vec<Project>, AppError> {
        let groups = self.group_repo.find_by_student(student_id).await?;
        let projects = self
            .project_repo
            .find_by_ids(&group_project_ids(&groups))
            .await?;
        Ok(projects.into_iter().filter(|p| !p.archived).collect())
    }

    pub async fn my_projects(&self, student_id: &str) -> Result<Vec<ProjectResponse>, AppError> {
        let projects = self.projects_of(student_id).await?;
        Ok(projects.into_iter().map(ProjectResponse::from).collect())
    }

    pub async fn my_tasks(&self, student_id: &str, sort: TaskSort) -> Result<Vec<TaskResponse>, AppError> {
        self.task_service.by_student(student_id, sort).await
    }

    /// 배정되지 않은 태스크는 `AuthorizationError`
    pub async fn change_task_status(
        &self,
        caller: &AuthenticatedUser,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<TaskResponse, AppError> {
        self.task_service.change_status(caller, task_id, status).await
    }

    pub async fn submit_deliverable(
        &self,
        caller: &AuthenticatedUser,
        deliverable_id: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<DeliverableResponse, AppError> {
        self.deliverable_service
            .submit(caller, deliverable_id, original_name, bytes)
            .await
    }

    pub async fn deliverable_comments(
        &self,
        student_id: &str,
        deliverable_id: &str,
    ) -> Result<DeliverableCommentsResponse, AppError> {
        self.deliverable_service
            .comments_for_student(student_id, deliverable_id)
            .await
    }

    /// 프로젝트 기간을 시작일 순으로 (시작일 없는 항목은 뒤로)
    pub async fn calendar(&self, student_id: &str) -> Result<Vec<CalendarEntry>, AppError> {
        let mut projects = self.projects_of(student_id).await?;
        projects.sort_by_key(|p| (p.start_date.is_none(), p.start_date));
        Ok(projects.iter().map(CalendarEntry::from).collect())
    }

    pub async fn notifications(&self, student_id: &str) -> Result<Vec<NotificationResponse>, AppError> {
        self.notification_service.list_for(student_id).await
    }

    pub async fn mark_notification_read(&self, student_id: &str, id: &str) -> Result<(), AppError> {
        self.notification_service.mark_read(id, student_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_project_ids_are_distinct() {
        let mut a = Group::new("A".into(), None);
        a.add_project("p2");
        a.add_project("p1");
        let mut b = Group::new("B".into(), None);
        b.add_project("p1");
        b.add_project("p3");

        assert_eq!(group_project_ids(&[a, b]), vec!["p1", "p2", "p3"]);
        assert!(group_project_ids(&[]).is_empty());
    }
}
