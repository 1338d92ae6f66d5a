use std::sync::Arc;

use mongodb::bson::{DateTime, doc};
use singleton_macro::service;

use crate::{
    domain::{
        dto::projects::{
            CreateProjectRequest, CreateTaskRequest, ProjectDetailResponse, ProjectResponse,
            ProjectStatsResponse, TaskResponse, UpdateProjectRequest,
        },
        entities::{
            projects::{Project, ProjectStatus},
            users::{Role, UserProfile},
        },
        models::AuthenticatedUser,
    },
    errors::AppError,
    repositories::{
        groups::GroupRepository,
        projects::{ProjectRepository, TaskRepository},
        users::UserRepository,
    },
    services::projects::TaskService,
    utils::{string_utils::require_text, time_utils::from_chrono},
};

/// 프로젝트 수정 권한: 소유 교수 또는 관리자
pub(crate) fn ensure_can_manage(project: &Project, caller: &AuthenticatedUser) -> Result<(), AppError> {
    if caller.is_admin() || project.is_owned_by(&caller.user_id) {
        return Ok(());
    }
    Err(AppError::AuthorizationError(
        "Seul l'enseignant responsable du projet peut effectuer cette action".to_string(),
    ))
}

fn apply_update(project: &mut Project, request: UpdateProjectRequest) -> Result<(), AppError> {
    if let Some(name) = request.name {
        project.name = name;
    }
    if request.description.is_some() {
        project.description = request.description;
    }
    if let Some(start_date) = request.start_date {
        project.start_date = Some(from_chrono(start_date));
    }
    if let Some(end_date) = request.end_date {
        project.end_date = Some(from_chrono(end_date));
    }
    if let Some(status) = request.status {
        project.status = status;
    }

    // 한쪽만 바뀐 경우에도 기간 순서를 유지
    if let (Some(start), Some(end)) = (project.start_date, project.end_date) {
        if end < start {
            return Err(AppError::ValidationError(
                "La date de fin doit être postérieure à la date de début".to_string(),
            ));
        }
    }
    Ok(())
}

fn to_responses(projects: Vec<Project>) -> Vec<ProjectResponse> {
    projects.into_iter().map(ProjectResponse::from).collect()
}

/// 프로젝트 관리와 통계
#[service(name = "project")]
pub struct ProjectService {
    project_repo: Arc<ProjectRepository>,
    task_repo: Arc<TaskRepository>,
    group_repo: Arc<GroupRepository>,
    user_repo: Arc<UserRepository>,
    task_service: Arc<TaskService>,
}

impl ProjectService {
    async fn managed(&self, caller: &AuthenticatedUser, id: &str) -> Result<Project, AppError> {
        let project = self.project_repo.get_by_id(id).await?;
        ensure_can_manage(&project, caller)?;
        Ok(project)
    }

    /// 교수 프로필의 담당 프로젝트 목록에 추가
    async fn record_supervision(&self, teacher_id: &str, project_id: &str) -> Result<(), AppError> {
        let mut teacher = self.user_repo.get_by_id(teacher_id).await?;
        if let UserProfile::Teacher {
            supervised_project_ids,
            ..
        } = &mut teacher.profile
        {
            if !supervised_project_ids.iter().any(|id| id == project_id) {
                supervised_project_ids.push(project_id.to_string());
                self.user_repo.save(&teacher).await?;
            }
        }
        Ok(())
    }

    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        request: CreateProjectRequest,
    ) -> Result<ProjectResponse, AppError> {
        if !caller.is(Role::Enseignant) {
            return Err(AppError::AuthorizationError(
                "Seul un enseignant peut créer un projet".to_string(),
            ));
        }

        let mut project = Project::new(require_text(&request.name, "nom")?, caller.user_id.clone());
        project.description = request.description;
        project.start_date = request.start_date.map(from_chrono);
        project.end_date = request.end_date.map(from_chrono);

        let mut group_ids = request.group_ids;
        group_ids.sort();
        group_ids.dedup();

        let groups = self.group_repo.find_by_ids(&group_ids).await?;
        if groups.len() != group_ids.len() {
            return Err(AppError::NotFound("Un ou plusieurs groupes sont introuvables".to_string()));
        }
        for group_id in &group_ids {
            project.link_group(group_id);
        }

        let project = self.project_repo.create(project).await?;
        let project_id = project
            .id_string()
            .ok_or_else(|| AppError::InternalError("프로젝트 ID가 없습니다".to_string()))?;

        for mut group in groups {
            if group.add_project(&project_id) {
                self.group_repo.save(&group).await?;
            }
        }
        self.record_supervision(&caller.user_id, &project_id).await?;

        log::info!("프로젝트 생성 - id: {}, teacher: {}", project_id, caller.user_id);
        Ok(project.into())
    }

    pub async fn get(&self, id: &str) -> Result<ProjectDetailResponse, AppError> {
        let project = self.project_repo.get_by_id(id).await?;
        let tasks = self.task_repo.find_by_project(id).await?;
        let stats = Project::stats(&tasks, DateTime::now());

        Ok(ProjectDetailResponse {
            project: project.into(),
            tasks: tasks.into_iter().map(TaskResponse::from).collect(),
            stats,
        })
    }

    pub async fn update(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        request: UpdateProjectRequest,
    ) -> Result<ProjectResponse, AppError> {
        let mut project = self.managed(caller, id).await?;
        apply_update(&mut project, request)?;
        self.project_repo.save(&project).await?;
        Ok(project.into())
    }

    async fn set_archived(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        archived: Option<bool>,
    ) -> Result<ProjectResponse, AppError> {
        let mut project = self.managed(caller, id).await?;
        let archived = archived.unwrap_or(!project.archived);

        project.set_archived(archived, DateTime::now());
        self.project_repo.save(&project).await?;

        log::info!("프로젝트 보관 상태 변경 - id: {}, archived: {}", id, archived);
        Ok(project.into())
    }

    /// 삭제 요청은 보관 상태를 뒤집음
    pub async fn toggle_archive(&self, caller: &AuthenticatedUser, id: &str) -> Result<ProjectResponse, AppError> {
        self.set_archived(caller, id, None).await
    }

    pub async fn archive(&self, caller: &AuthenticatedUser, id: &str) -> Result<ProjectResponse, AppError> {
        self.set_archived(caller, id, Some(true)).await
    }

    pub async fn restore(&self, caller: &AuthenticatedUser, id: &str) -> Result<ProjectResponse, AppError> {
        self.set_archived(caller, id, Some(false)).await
    }

    pub async fn change_status(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        status: ProjectStatus,
    ) -> Result<ProjectResponse, AppError> {
        let mut project = self.managed(caller, id).await?;
        project.status = status;
        self.project_repo.save(&project).await?;

        log::info!("프로젝트 상태 변경 - id: {}, status: {}", id, status.as_str());
        Ok(project.into())
    }

    /// 프로젝트와 그룹 양쪽에 연결 (이미 연결돼 있으면 그대로)
    pub async fn assign_group(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        group_id: &str,
    ) -> Result<ProjectResponse, AppError> {
        let mut project = self.managed(caller, id).await?;
        let mut group = self.group_repo.get_by_id(group_id).await?;

        if project.link_group(group_id) {
            self.project_repo.save(&project).await?;
        }
        if group.add_project(id) {
            self.group_repo.save(&group).await?;
        }

        log::info!("프로젝트에 그룹 배정 - project_id: {}, group_id: {}", id, group_id);
        Ok(project.into())
    }

    pub async fn tasks(&self, id: &str) -> Result<Vec<TaskResponse>, AppError> {
        self.task_service.by_project(id).await
    }

    pub async fn add_task(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        request: CreateTaskRequest,
    ) -> Result<TaskResponse, AppError> {
        self.task_service.create(caller, request, Some(id)).await
    }

    pub async fn late(&self) -> Result<Vec<ProjectResponse>, AppError> {
        Ok(to_responses(self.project_repo.find_late(DateTime::now()).await?))
    }

    pub async fn by_teacher(&self, teacher_id: &str, archived: bool) -> Result<Vec<ProjectResponse>, AppError> {
        Ok(to_responses(
            self.project_repo.find_by_teacher(teacher_id, archived).await?,
        ))
    }

    async fn stats_for(&self, projects: Vec<Project>) -> Result<Vec<ProjectStatsResponse>, AppError> {
        let ids: Vec<String> = projects.iter().filter_map(Project::id_string).collect();
        let tasks = self.task_repo.find_by_projects(&ids).await?;
        let now = DateTime::now();

        Ok(projects
            .into_iter()
            .map(|project| {
                let project_id = project.id_string().unwrap_or_default();
                let own: Vec<_> = tasks
                    .iter()
                    .filter(|t| t.project_id == project_id)
                    .cloned()
                    .collect();
                ProjectStatsResponse {
                    project_id,
                    name: project.name,
                    teacher_id: project.teacher_id,
                    stats: Project::stats(&own, now),
                }
            })
            .collect())
    }

    pub async fn stats_all(&self) -> Result<Vec<ProjectStatsResponse>, AppError> {
        let projects = self.project_repo.find_all().await?;
        self.stats_for(projects).await
    }

    pub async fn stats_for_teacher(&self, teacher_id: &str) -> Result<Vec<ProjectStatsResponse>, AppError> {
        let projects = self.project_repo.find_by_teacher(teacher_id, false).await?;
        self.stats_for(projects).await
    }

    pub async fn count_all(&self) -> Result<u64, AppError> {
        self.project_repo.count(doc! {}).await
    }

    pub async fn count_active(&self) -> Result<u64, AppError> {
        self.project_repo
            .count(doc! {
                "archived": false,
                "status": { "$in": [ProjectStatus::Planifie.as_str(), ProjectStatus::EnAttente.as_str(), ProjectStatus::EnCours.as_str()] },
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthProvider;
    use chrono::{TimeZone, Utc};

    fn caller(user_id: &str, role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: user_id.into(),
            email: "x@univ.fr".into(),
            auth_provider: AuthProvider::Local,
            roles: vec![role.as_str().to_string()],
            access_token: String::new(),
            expires_at: 0,
        }
    }

    #[test]
    fn test_only_owner_or_admin_can_manage() {
        let project = Project::new("P".into(), "prof-1".into());
        assert!(ensure_can_manage(&project, &caller("prof-1", Role::Enseignant)).is_ok());
        assert!(ensure_can_manage(&project, &caller("admin", Role::Admin)).is_ok());
        assert!(matches!(
            ensure_can_manage(&project, &caller("prof-2", Role::Enseignant)),
            Err(AppError::AuthorizationError(_))
        ));
        assert!(ensure_can_manage(&project, &caller("s1", Role::Etudiant)).is_err());
    }

    #[test]
    fn test_partial_update_keeps_date_order() {
        let mut project = Project::new("P".into(), "t".into());
        let march = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let june = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        apply_update(
            &mut project,
            UpdateProjectRequest {
                start_date: Some(march),
                end_date: Some(june),
                status: Some(ProjectStatus::EnCours),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(project.status, ProjectStatus::EnCours);

        let result = apply_update(
            &mut project,
            UpdateProjectRequest {
                start_date: Some(Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
