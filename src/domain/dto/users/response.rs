use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::AuthProvider;
use crate::domain::entities::users::{Role, User, UserProfile};
use crate::utils::time_utils::{opt_to_chrono, to_chrono};

/// 사용자 응답 (비밀번호 해시 제외)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub last_name: String,
    pub first_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub profile_photo_url: Option<String>,
    pub role: Role,
    pub profile: UserProfile,
    pub is_active: bool,
    pub faculty: Option<String>,
    pub departments: Vec<String>,
    pub auth_provider: AuthProvider,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let full_name = user.full_name();
        let User {
            id,
            last_name,
            first_name,
            email,
            phone,
            profile_photo_url,
            role,
            profile,
            is_active,
            faculty,
            departments,
            auth_provider,
            email_verified,
            created_at,
            updated_at,
            last_login_at,
            ..
        } = user;

        Self {
            id: id.map(|id| id.to_hex()).unwrap_or_default(),
            last_name,
            first_name,
            full_name,
            email,
            phone,
            profile_photo_url,
            role,
            profile,
            is_active,
            faculty,
            departments,
            auth_provider,
            email_verified,
            created_at: to_chrono(created_at),
            updated_at: to_chrono(updated_at),
            last_login_at: opt_to_chrono(last_login_at),
        }
    }
}

/// 그룹 상세/대화방에서 쓰는 간략 정보
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_string().unwrap_or_default(),
            full_name: user.full_name(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfilePhotoResponse {
    pub profile_photo_url: String,
}

/// 관리자 대시보드 통계
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStats {
    pub total_users: u64,
    pub students: u64,
    pub teachers: u64,
    pub admins: u64,
    pub active_users: u64,
    pub total_projects: u64,
    pub active_projects: u64,
    pub total_groups: u64,
    pub late_deliverables: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_hides_password() {
        let mut user = User::new_local(
            "Diallo".into(),
            "Awa".into(),
            "awa@univ.fr".into(),
            "$2b$hash".into(),
            Role::Etudiant,
        );
        user.id = Some(mongodb::bson::oid::ObjectId::new());

        let response = UserResponse::from(user);
        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["full_name"], "Awa Diallo");
        assert_eq!(json["role"], "ETUDIANT");
        assert_eq!(json["profile"]["kind"], "student");
        assert_eq!(response.id.len(), 24);
    }
}
