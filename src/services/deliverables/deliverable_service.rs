//! 산출물 제출/평가 흐름
//!
//! 상태 전이 규칙은 [`Deliverable`] 엔티티가 검사하고, 이 서비스는 권한 확인과
//! 파일 저장, 알림 메일을 담당합니다.

use std::sync::Arc;

use chrono::Duration;
use mongodb::bson::DateTime;
use singleton_macro::service;

use crate::{
    domain::{
        dto::deliverables::{
            CreateDeliverableRequest, DeliverableCommentsResponse, DeliverableResponse,
            EvaluateDeliverableRequest,
        },
        entities::{
            deliverables::{Deliverable, Evaluation},
            projects::Project,
            users::Role,
        },
        models::AuthenticatedUser,
    },
    errors::AppError,
    repositories::{
        deliverables::DeliverableRepository, groups::GroupRepository, projects::ProjectRepository,
        users::UserRepository,
    },
    services::{
        files::FileStorageService,
        notifications::{EmailService, EmailTemplate},
        projects::project_service::ensure_can_manage,
    },
    utils::{
        string_utils::require_text,
        time_utils::{add_duration, from_chrono, to_chrono},
    },
};

const DEFAULT_DUE_DAYS: i64 = 7;

#[service(name = "deliverable")]
pub struct DeliverableService {
    deliverable_repo: Arc<DeliverableRepository>,
    project_repo: Arc<ProjectRepository>,
    group_repo: Arc<GroupRepository>,
    user_repo: Arc<UserRepository>,
    file_storage: Arc<FileStorageService>,
    email_service: Arc<EmailService>,
}

/// 평가/정정/거절은 프로젝트 담당 교수만
fn ensure_project_teacher(project: &Project, caller: &AuthenticatedUser) -> Result<(), AppError> {
    if caller.is(Role::Enseignant) && project.is_owned_by(&caller.user_id) {
        return Ok(());
    }
    Err(AppError::AuthorizationError(
        "Seul l'enseignant responsable du projet peut évaluer ce livrable".to_string(),
    ))
}

fn to_responses(deliverables: Vec<Deliverable>) -> Vec<DeliverableResponse> {
    deliverables.into_iter().map(DeliverableResponse::from).collect()
}

impl DeliverableService {
    /// 산출물과 소속 프로젝트를 함께 조회
    async fn load(&self, id: &str) -> Result<(Deliverable, Project), AppError> {
        let deliverable = self.deliverable_repo.get_by_id(id).await?;
        let project = self.project_repo.get_by_id(&deliverable.project_id).await?;
        Ok((deliverable, project))
    }

    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        request: CreateDeliverableRequest,
    ) -> Result<DeliverableResponse, AppError> {
        let mut project = self.project_repo.get_by_id(&request.project_id).await?;
        ensure_can_manage(&project, caller)?;
        let mut group = self.group_repo.get_by_id(&request.group_id).await?;

        // 아직 연결되지 않은 그룹이면 프로젝트에 함께 연결
        if project.link_group(&request.group_id) {
            self.project_repo.save(&project).await?;
        }
        if group.add_project(&request.project_id) {
            self.group_repo.save(&group).await?;
        }

        let due_date = request
            .due_date
            .map(from_chrono)
            .unwrap_or_else(|| add_duration(DateTime::now(), Duration::days(DEFAULT_DUE_DAYS)));

        let mut deliverable = Deliverable::new(
            require_text(&request.name, "nom")?,
            request.project_id,
            request.group_id,
            due_date,
        );
        deliverable.description = request.description;

        let deliverable = self.deliverable_repo.create(deliverable).await?;
        log::info!(
            "산출물 생성 - name: {}, project_id: {}, group_id: {}",
            deliverable.name,
            deliverable.project_id,
            deliverable.group_id
        );
        Ok(deliverable.into())
    }

    pub async fn get(&self, id: &str) -> Result<DeliverableResponse, AppError> {
        Ok(self.deliverable_repo.get_by_id(id).await?.into())
    }

    /// 그룹 구성원만 제출 가능. 전이가 거부되면 방금 저장한 파일을 지움
    pub async fn submit(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<DeliverableResponse, AppError> {
        let (mut deliverable, project) = self.load(id).await?;
        let group = self.group_repo.get_by_id(&deliverable.group_id).await?;

        if !group.has_student(&caller.user_id) {
            return Err(AppError::AuthorizationError(
                "Seuls les membres du groupe peuvent déposer ce livrable".to_string(),
            ));
        }

        let stored = self.file_storage.store(original_name, bytes).await?;
        let stored_url = stored.url.clone();
        let now = DateTime::now();

        let previous = match deliverable.submit(stored, now) {
            Ok(previous) => previous,
            Err(e) => {
                if let Err(cleanup) = self.file_storage.delete_by_url(&stored_url).await {
                    log::warn!("거부된 제출 파일 정리 실패 - {}: {}", stored_url, cleanup);
                }
                return Err(e.into());
            }
        };

        self.deliverable_repo.save(&deliverable).await?;

        if let Some(previous) = previous {
            if let Err(e) = self.file_storage.delete_by_url(&previous.url).await {
                log::warn!("이전 제출 파일 삭제 실패 - {}: {}", previous.url, e);
            }
        }

        log::info!("산출물 제출 - id: {}, group: {}, by: {}", id, group.name, caller.user_id);

        match self.user_repo.find_by_id(&project.teacher_id).await {
            Ok(Some(teacher)) => {
                let submitted_at = to_chrono(now).format("%d/%m/%Y %H:%M").to_string();
                self.email_service
                    .send_logged(
                        &teacher.email,
                        &EmailTemplate::DeliverableSubmitted {
                            teacher_first_name: &teacher.first_name,
                            deliverable_name: &deliverable.name,
                            project_name: &project.name,
                            group_name: &group.name,
                            submitted_at,
                        },
                    )
                    .await;
            }
            Ok(None) => log::warn!("프로젝트 담당 교수 없음 - project_id: {}", project.teacher_id),
            Err(e) => log::error!("담당 교수 조회 실패 - {}: {}", project.teacher_id, e),
        }

        Ok(deliverable.into())
    }

    /// 평가 후 그룹 학생 전원에게 메일 (수신자별 실패는 로그만)
    pub async fn evaluate(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        request: EvaluateDeliverableRequest,
    ) -> Result<DeliverableResponse, AppError> {
        let (mut deliverable, project) = self.load(id).await?;
        ensure_project_teacher(&project, caller)?;

        let evaluation = Evaluation::new(request.note, request.comments, caller.user_id.clone());
        deliverable.evaluate(evaluation.clone())?;
        self.deliverable_repo.save(&deliverable).await?;

        log::info!("산출물 평가 - id: {}, note: {:?}", id, evaluation.note);

        let group = self.group_repo.get_by_id(&deliverable.group_id).await?;
        let students = self.user_repo.find_by_ids(&group.student_ids).await?;
        for student in &students {
            self.email_service
                .send_logged(
                    &student.email,
                    &EmailTemplate::DeliverableEvaluated {
                        first_name: &student.first_name,
                        deliverable_id: id,
                        deliverable_name: &deliverable.name,
                        note: evaluation.note,
                        appreciation: evaluation.appreciation(),
                        comments: evaluation.comments.as_deref(),
                    },
                )
                .await;
        }

        Ok(deliverable.into())
    }

    pub async fn start_correction(&self, caller: &AuthenticatedUser, id: &str) -> Result<DeliverableResponse, AppError> {
        let (mut deliverable, project) = self.load(id).await?;
        ensure_project_teacher(&project, caller)?;

        deliverable.start_correction()?;
        self.deliverable_repo.save(&deliverable).await?;
        Ok(deliverable.into())
    }

    pub async fn mark_corrected(&self, caller: &AuthenticatedUser, id: &str) -> Result<DeliverableResponse, AppError> {
        let (mut deliverable, project) = self.load(id).await?;
        ensure_project_teacher(&project, caller)?;

        deliverable.mark_corrected()?;
        self.deliverable_repo.save(&deliverable).await?;
        Ok(deliverable.into())
    }

    /// 거절 시 제출 파일도 디스크에서 삭제
    pub async fn reject(&self, caller: &AuthenticatedUser, id: &str) -> Result<DeliverableResponse, AppError> {
        let (mut deliverable, project) = self.load(id).await?;
        ensure_project_teacher(&project, caller)?;

        let removed = deliverable.reject();
        self.deliverable_repo.save(&deliverable).await?;

        if let Some(file) = removed {
            if let Err(e) = self.file_storage.delete_by_url(&file.url).await {
                log::warn!("거절된 제출 파일 삭제 실패 - {}: {}", file.url, e);
            }
        }

        log::info!("산출물 거절 - id: {}", id);
        Ok(deliverable.into())
    }

    pub async fn by_project(&self, project_id: &str) -> Result<Vec<DeliverableResponse>, AppError> {
        Ok(to_responses(self.deliverable_repo.find_by_project(project_id).await?))
    }

    pub async fn by_group(&self, group_id: &str) -> Result<Vec<DeliverableResponse>, AppError> {
        Ok(to_responses(self.deliverable_repo.find_by_group(group_id).await?))
    }

    pub async fn late(&self) -> Result<Vec<DeliverableResponse>, AppError> {
        Ok(to_responses(self.deliverable_repo.find_late(DateTime::now()).await?))
    }

    /// 보관되지 않은 담당 프로젝트의 산출물
    pub async fn for_teacher(&self, teacher_id: &str) -> Result<Vec<DeliverableResponse>, AppError> {
        let projects = self.project_repo.find_by_teacher(teacher_id, false).await?;
        let ids: Vec<String> = projects.iter().filter_map(Project::id_string).collect();
        Ok(to_responses(self.deliverable_repo.find_by_projects(&ids).await?))
    }

    /// 학생은 자기 그룹 산출물의 평가만 볼 수 있음
    pub async fn comments_for_student(
        &self,
        student_id: &str,
        id: &str,
    ) -> Result<DeliverableCommentsResponse, AppError> {
        let deliverable = self.deliverable_repo.get_by_id(id).await?;
        let group = self.group_repo.get_by_id(&deliverable.group_id).await?;

        if !group.has_student(student_id) {
            return Err(AppError::AuthorizationError(
                "Ce livrable n'appartient pas à l'un de vos groupes".to_string(),
            ));
        }
        Ok(deliverable.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthProvider;

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
    fn test_only_owning_teacher_evaluates() {
        let project = Project::new("P".into(), "prof-1".into());
        assert!(ensure_project_teacher(&project, &caller("prof-1", Role::Enseignant)).is_ok());
        assert!(ensure_project_teacher(&project, &caller("prof-2", Role::Enseignant)).is_err());
        assert!(matches!(
            ensure_project_teacher(&project, &caller("admin", Role::Admin)),
            Err(AppError::AuthorizationError(_))
        ));
    }
}
