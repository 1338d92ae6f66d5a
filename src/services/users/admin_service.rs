use std::sync::Arc;

use mongodb::bson::{DateTime, doc};
use singleton_macro::service;

use crate::{
    domain::{
        dto::{auth::RegisterRequest, projects::ProjectStatsResponse, users::DashboardStats},
        entities::users::{Role, User},
    },
    errors::AppError,
    repositories::{
        deliverables::DeliverableRepository, groups::GroupRepository, users::UserRepository,
    },
    services::{projects::ProjectService, users::UserService},
};

/// 관리자 전용 기능
///
/// 단순 조회/수정은 [`UserService`]를 그대로 쓰고, 여기에는 관리자만의
/// 계정 생성 규칙과 대시보드 집계만 둡니다.
#[service(name = "admin")]
pub struct AdminService {
    user_repo: Arc<UserRepository>,
    group_repo: Arc<GroupRepository>,
    deliverable_repo: Arc<DeliverableRepository>,
    user_service: Arc<UserService>,
    project_service: Arc<ProjectService>,
}

/// 요청에 역할이 없으면 회원가입과 같이 `ENSEIGNANT`
fn requested_role(request: &RegisterRequest) -> Role {
    request
        .role
        .as_deref()
        .and_then(Role::from_str)
        .unwrap_or(Role::Enseignant)
}

impl AdminService {
    /// 관리자가 만든 계정은 이메일 인증을 거치지 않음
    pub async fn create_user(&self, request: RegisterRequest) -> Result<User, AppError> {
        let role = requested_role(&request);
        let mut user = self.user_service.create_user(request, role).await?;

        user.email_verified = true;
        self.user_repo.save(&user).await?;

        log::info!("관리자 계정 생성 - email: {}, role: {}", user.email, role);
        Ok(user)
    }

    pub async fn toggle_status(&self, id: &str) -> Result<User, AppError> {
        let user = self.user_service.get_user(id).await?;
        self.user_service.set_active(id, !user.is_active).await
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, AppError> {
        let stats = DashboardStats {
            total_users: self.user_repo.count(doc! {}).await?,
            students: self.user_repo.count_by_role(Role::Etudiant).await?,
            teachers: self.user_repo.count_by_role(Role::Enseignant).await?,
            admins: self.user_repo.count_by_role(Role::Admin).await?,
            active_users: self.user_repo.count(doc! { "is_active": true }).await?,
            total_projects: self.project_service.count_all().await?,
            active_projects: self.project_service.count_active().await?,
            total_groups: self.group_repo.count(doc! { "archived": false }).await?,
            late_deliverables: self.deliverable_repo.count_late(DateTime::now()).await?,
        };

        log::debug!("대시보드 통계 - {:?}", stats);
        Ok(stats)
    }

    pub async fn project_stats(&self) -> Result<Vec<ProjectStatsResponse>, AppError> {
        self.project_service.stats_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register(role: Option<&str>) -> RegisterRequest {
        serde_json::from_value(json!({
            "last_name": "Ndiaye",
            "first_name": "Moussa",
            "email": "moussa@univ.fr",
            "password": "motdepasse",
            "role": role,
        }))
        .unwrap()
    }

    #[test]
    fn test_requested_role_defaults_to_teacher() {
        assert_eq!(requested_role(&register(None)), Role::Enseignant);
        assert_eq!(requested_role(&register(Some("ETUDIANT"))), Role::Etudiant);
        assert_eq!(requested_role(&register(Some("ROLE_ADMIN"))), Role::Admin);
    }
}
