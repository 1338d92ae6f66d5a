use std::sync::Arc;

use singleton_macro::service;

use crate::{
    domain::{
        dto::{
            groups::{CreateGroupRequest, GroupResponse, UpdateGroupRequest},
            projects::ProjectResponse,
            users::UserResponse,
        },
        entities::{groups::Group, users::Role},
        models::AuthenticatedUser,
    },
    errors::AppError,
    repositories::{groups::GroupRepository, projects::ProjectRepository, users::UserRepository},
    utils::string_utils::require_text,
};

/// 학생 그룹 관리. 변경은 교수/관리자만 가능
#[service(name = "group")]
pub struct GroupService {
    group_repo: Arc<GroupRepository>,
    project_repo: Arc<ProjectRepository>,
    user_repo: Arc<UserRepository>,
}

fn ensure_staff(caller: &AuthenticatedUser) -> Result<(), AppError> {
    caller.require_any(&[Role::Enseignant, Role::Admin])
}

impl GroupService {
    async fn ensure_student(&self, student_id: &str) -> Result<(), AppError> {
        let user = self.user_repo.get_by_id(student_id).await?;
        if user.role != Role::Etudiant {
            return Err(AppError::ValidationError(format!(
                "Seul un étudiant peut faire partie d'un groupe : {}",
                student_id
            )));
        }
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<GroupResponse>, AppError> {
        let groups = self.group_repo.find_active().await?;
        Ok(groups.into_iter().map(GroupResponse::from).collect())
    }

    pub async fn get(&self, id: &str) -> Result<GroupResponse, AppError> {
        Ok(self.group_repo.get_by_id(id).await?.into())
    }

    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        request: CreateGroupRequest,
    ) -> Result<GroupResponse, AppError> {
        ensure_staff(caller)?;

        let mut group = Group::new(require_text(&request.name, "nom")?, request.description);
        for student_id in &request.student_ids {
            self.ensure_student(student_id).await?;
            group.add_student(student_id);
        }

        let group = self.group_repo.create(group).await?;
        log::info!("그룹 생성 - name: {}, 학생 {}명", group.name, group.student_ids.len());
        Ok(group.into())
    }

    pub async fn update(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        request: UpdateGroupRequest,
    ) -> Result<GroupResponse, AppError> {
        ensure_staff(caller)?;
        let mut group = self.group_repo.get_by_id(id).await?;

        if let Some(name) = request.name {
            group.name = name;
        }
        if request.description.is_some() {
            group.description = request.description;
        }

        self.group_repo.save(&group).await?;
        Ok(group.into())
    }

    /// 삭제 요청은 보관 상태를 뒤집음
    pub async fn toggle_archive(&self, caller: &AuthenticatedUser, id: &str) -> Result<GroupResponse, AppError> {
        ensure_staff(caller)?;
        let mut group = self.group_repo.get_by_id(id).await?;

        group.archived = !group.archived;
        self.group_repo.save(&group).await?;

        log::info!("그룹 보관 상태 변경 - id: {}, archived: {}", id, group.archived);
        Ok(group.into())
    }

    pub async fn add_student(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        student_id: &str,
    ) -> Result<GroupResponse, AppError> {
        ensure_staff(caller)?;
        let mut group = self.group_repo.get_by_id(id).await?;
        self.ensure_student(student_id).await?;

        if group.add_student(student_id) {
            self.group_repo.save(&group).await?;
            log::info!("그룹에 학생 추가 - group_id: {}, student_id: {}", id, student_id);
        }
        Ok(group.into())
    }

    pub async fn remove_student(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        student_id: &str,
    ) -> Result<GroupResponse, AppError> {
        ensure_staff(caller)?;
        let mut group = self.group_repo.get_by_id(id).await?;

        if !group.remove_student(student_id) {
            return Err(AppError::NotFound(format!(
                "L'étudiant {} ne fait pas partie de ce groupe",
                student_id
            )));
        }
        self.group_repo.save(&group).await?;

        Ok(group.into())
    }

    /// 그룹과 프로젝트 양쪽에 연결
    pub async fn add_project(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        project_id: &str,
    ) -> Result<GroupResponse, AppError> {
        ensure_staff(caller)?;
        let mut group = self.group_repo.get_by_id(id).await?;
        let mut project = self.project_repo.get_by_id(project_id).await?;

        if group.add_project(project_id) {
            self.group_repo.save(&group).await?;
        }
        if project.link_group(id) {
            self.project_repo.save(&project).await?;
        }

        Ok(group.into())
    }

    pub async fn students(&self, id: &str) -> Result<Vec<UserResponse>, AppError> {
        let group = self.group_repo.get_by_id(id).await?;
        let students = self.user_repo.find_by_ids(&group.student_ids).await?;
        Ok(students.into_iter().map(UserResponse::from).collect())
    }

    pub async fn projects(&self, id: &str) -> Result<Vec<ProjectResponse>, AppError> {
        let group = self.group_repo.get_by_id(id).await?;
        let projects = self.project_repo.find_by_ids(&group.project_ids).await?;
        Ok(projects.into_iter().map(ProjectResponse::from).collect())
    }

    /// 연결된 프로젝트 진행률 평균으로 갱신
    pub async fn recompute_progress(&self, id: &str) -> Result<GroupResponse, AppError> {
        let mut group = self.group_repo.get_by_id(id).await?;
        let projects = self.project_repo.find_by_ids(&group.project_ids).await?;

        group.progress = Group::compute_progress(&projects);
        self.group_repo.save(&group).await?;

        log::debug!("그룹 진행률 갱신 - id: {}, progress: {:.1}", id, group.progress);
        Ok(group.into())
    }
}
